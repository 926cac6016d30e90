//! The compositor pipeline: configure once, stamp any number of targets.
//!
//! Each [`Compositor::apply`] call is a pure pipeline over two freshly
//! decoded buffers:
//! - resolve and sniff both the target and the watermark,
//! - decode each with its format's decoder,
//! - compute the placement offsets for the active [`Position`],
//! - copy the watermark rectangle onto the base at every offset,
//! - re-encode with the *target's* original format.
//!
//! No state is shared between calls beyond the immutable configuration, so a
//! compositor can be used from several threads at once.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops;
use image::RgbaImage;
use tracing::debug;

use crate::error::OverlayError;
use crate::format::{SourceFormat, WHITE_LIST};
use crate::placement::Position;

/// Resolves a caller-supplied path to an existing file.
///
/// Injected into the compositor so embedders can route lookups through their
/// own search paths; [`FsResolver`] is the plain filesystem default.
pub trait PathResolver: Send + Sync {
    /// Resolve `path` to an absolute path, or `None` if no file exists there.
    fn resolve(&self, path: &Path) -> Option<PathBuf>;
}

/// Filesystem-backed [`PathResolver`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsResolver;

impl PathResolver for FsResolver {
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        fs::canonicalize(path).ok().filter(|p| p.is_file())
    }
}

/// Construction-time options for [`Compositor::with_config`].
pub struct CompositorConfig {
    /// Anchor mode for the watermark.
    pub position: Position,
    /// MIME whitelist applied to both the watermark and every target.
    pub allowed_types: Vec<String>,
    /// Path lookup used for the watermark and every target.
    pub resolver: Box<dyn PathResolver>,
}

impl Default for CompositorConfig {
    /// Center placement, the standard whitelist, plain filesystem lookups.
    fn default() -> Self {
        CompositorConfig {
            position: Position::Center,
            allowed_types: WHITE_LIST.iter().map(|s| s.to_string()).collect(),
            resolver: Box::new(FsResolver),
        }
    }
}

/// An image decoded for one `apply` call, with its re-encode target.
struct Decoded {
    pixels: RgbaImage,
    format: SourceFormat,
}

/// Composites a configured watermark image onto target images.
pub struct Compositor {
    watermark: PathBuf,
    position: Position,
    allowed: Vec<String>,
    resolver: Box<dyn PathResolver>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("watermark", &self.watermark)
            .field("position", &self.position)
            .field("allowed", &self.allowed)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Create a compositor with the default whitelist and filesystem lookups.
    ///
    /// Fails with [`OverlayError::InvalidConfig`] when the watermark path
    /// does not resolve. The watermark's format is checked on `apply`, like
    /// the target's.
    pub fn new<P: AsRef<Path>>(watermark: P, position: Position) -> Result<Self, OverlayError> {
        Self::with_config(
            watermark,
            CompositorConfig {
                position,
                ..CompositorConfig::default()
            },
        )
    }

    /// Create a compositor from explicit configuration.
    pub fn with_config<P: AsRef<Path>>(
        watermark: P,
        config: CompositorConfig,
    ) -> Result<Self, OverlayError> {
        let CompositorConfig {
            position,
            allowed_types,
            resolver,
        } = config;
        let watermark = resolve_watermark(resolver.as_ref(), watermark.as_ref())?;
        Ok(Compositor {
            watermark,
            position,
            allowed: allowed_types,
            resolver,
        })
    }

    /// Replace the watermark image, re-validating the path.
    pub fn set_watermark<P: AsRef<Path>>(
        &mut self,
        watermark: P,
    ) -> Result<&mut Self, OverlayError> {
        self.watermark = resolve_watermark(self.resolver.as_ref(), watermark.as_ref())?;
        Ok(self)
    }

    /// Replace the anchor mode.
    pub fn set_position(&mut self, position: Position) -> &mut Self {
        self.position = position;
        self
    }

    /// Replace the MIME whitelist applied to both inputs.
    pub fn set_allowed_types(&mut self, types: Vec<String>) -> &mut Self {
        self.allowed = types;
        self
    }

    /// The resolved watermark path.
    pub fn watermark(&self) -> &Path {
        &self.watermark
    }

    /// The active anchor mode.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Stamp the watermark onto `target` and return the re-encoded bytes.
    ///
    /// The output uses the target's own sniffed format; JPEG re-encodes at
    /// quality 100. The copy is an opaque rectangle per offset, no alpha
    /// blending, and clips silently wherever the watermark overhangs the
    /// base.
    pub fn apply<P: AsRef<Path>>(&self, target: P) -> Result<Vec<u8>, OverlayError> {
        let target = target.as_ref();
        let target = self
            .resolver
            .resolve(target)
            .ok_or_else(|| OverlayError::InvalidTarget(target.to_path_buf()))?;

        let base = self.load(&target)?;
        let mark = self.load(&self.watermark)?;

        let composited = self.composite(base.pixels, &mark.pixels);
        let bytes = base.format.encode(&composited)?;
        debug!(
            format = base.format.mime(),
            bytes = bytes.len(),
            "encoded composited image"
        );
        Ok(bytes)
    }

    /// Stamp the watermark onto `target`, overwriting the file in place.
    pub fn apply_in_place<P: AsRef<Path>>(&self, target: P) -> Result<(), OverlayError> {
        let target = target.as_ref();
        let resolved = self
            .resolver
            .resolve(target)
            .ok_or_else(|| OverlayError::InvalidTarget(target.to_path_buf()))?;
        let bytes = self.apply(&resolved)?;
        fs::write(&resolved, bytes)?;
        Ok(())
    }

    /// Decode one input, sniffing its type against the whitelist.
    fn load(&self, path: &Path) -> Result<Decoded, OverlayError> {
        let bytes = fs::read(path)?;
        let mime = SourceFormat::sniff_mime(&bytes);
        if !self.allowed.iter().any(|allowed| allowed == mime) {
            return Err(OverlayError::UnsupportedFormat {
                found: mime.to_string(),
                allowed: self.allowed.join(", "),
            });
        }
        let format = SourceFormat::from_mime(mime);
        let pixels = format.decode(&bytes)?;
        debug!(
            path = %path.display(),
            mime = mime,
            width = pixels.width(),
            height = pixels.height(),
            "decoded image"
        );
        Ok(Decoded { pixels, format })
    }

    /// Copy the watermark rectangle onto the base at every computed offset.
    fn composite(&self, mut base: RgbaImage, mark: &RgbaImage) -> RgbaImage {
        let offsets = self
            .position
            .offsets(base.width(), base.height(), mark.width(), mark.height());
        debug!(position = ?self.position, count = offsets.len(), "placing watermark");
        for (x, y) in offsets {
            imageops::replace(&mut base, mark, x, y);
        }
        base
    }
}

fn resolve_watermark(
    resolver: &dyn PathResolver,
    watermark: &Path,
) -> Result<PathBuf, OverlayError> {
    resolver.resolve(watermark).ok_or_else(|| {
        OverlayError::InvalidConfig(format!(
            "watermark file \"{}\" doesn't exist",
            watermark.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_resolver_missing_file() {
        assert!(FsResolver
            .resolve(Path::new("/definitely/not/here.png"))
            .is_none());
    }

    #[test]
    fn test_fs_resolver_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsResolver.resolve(dir.path()).is_none());
    }

    #[test]
    fn test_fs_resolver_finds_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.png");
        std::fs::write(&path, b"stub").unwrap();
        let resolved = FsResolver.resolve(&path).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("mark.png"));
    }
}
