use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use watermark_overlay::{Compositor, Position};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The watermark image to stamp onto each input.
    #[clap(long, short)]
    watermark: PathBuf,

    /// Anchor position for the watermark.
    #[clap(long, short, value_enum, default_value = "center")]
    position: Anchor,

    /// Overwrite each input instead of writing a sibling file.
    #[clap(long, action)]
    in_place: bool,

    /// Output file, only valid with a single input.
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// The files to operate on.
    #[clap(action, required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Anchor {
    RightTop,
    RightBottom,
    LeftTop,
    LeftBottom,
    Center,
    Tiled,
}

impl From<Anchor> for Position {
    fn from(anchor: Anchor) -> Position {
        match anchor {
            Anchor::RightTop => Position::RightTop,
            Anchor::RightBottom => Position::RightBottom,
            Anchor::LeftTop => Position::LeftTop,
            Anchor::LeftBottom => Position::LeftBottom,
            Anchor::Center => Position::Center,
            Anchor::Tiled => Position::Tiled,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.output.is_some() && cli.inputs.len() != 1 {
        bail!("--output requires exactly one input");
    }
    if cli.output.is_some() && cli.in_place {
        bail!("--output and --in-place are mutually exclusive");
    }

    let compositor = Compositor::new(&cli.watermark, cli.position.into())
        .context("configuring the compositor")?;

    for input in &cli.inputs {
        if cli.in_place {
            compositor
                .apply_in_place(input)
                .with_context(|| format!("processing {}", input.display()))?;
            println!("{} (in place)", input.display());
        } else {
            let bytes = compositor
                .apply(input)
                .with_context(|| format!("processing {}", input.display()))?;
            let output = cli
                .output
                .clone()
                .unwrap_or_else(|| watermarked_path(input));
            std::fs::write(&output, bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{} => {}", input.display(), output.display());
        }
    }

    Ok(())
}

/// Sibling output path: `photo.jpg` becomes `photo_watermarked.jpg`.
fn watermarked_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = match input.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}_watermarked.{ext}"),
        None => format!("{stem}_watermarked"),
    };
    input.with_file_name(name)
}
