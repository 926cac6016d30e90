use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the compositor.
///
/// Categorised by the failing precondition so callers can tell a bad
/// configuration from a bad target without matching on message strings.
/// Every variant is terminal for the call that raised it; there is no retry
/// or partial result.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The compositor configuration is unusable: the watermark file does not
    /// resolve, or a position code is outside the recognised range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The target path does not resolve to an existing file.
    #[error("image \"{}\" doesn't exist", .0.display())]
    InvalidTarget(PathBuf),

    /// The sniffed type of an input is outside the configured whitelist.
    #[error("{found} not allowed, allowed types: {allowed}")]
    UnsupportedFormat { found: String, allowed: String },

    /// Decode or encode failure from the underlying codec.
    #[error(transparent)]
    Codec(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
