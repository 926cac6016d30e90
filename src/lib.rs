//! Overlay a watermark image onto photos at a fixed anchor position.
//!
//! A [`Compositor`] is configured once with a watermark image and a
//! [`Position`], then stamps any number of targets. Each target is decoded,
//! the watermark rectangle is copied on at the computed offsets, and the
//! result is re-encoded in the target's own source format.

pub mod compositor;
pub mod error;
pub mod format;
pub mod placement;

// expose the resolver seam in the prelude.
pub mod prelude {
    pub use crate::compositor::PathResolver;
}
// Export the public components from the pipeline here.
pub use compositor::{Compositor, CompositorConfig};
pub use compositor::{FsResolver, PathResolver};
pub use error::OverlayError;
pub use format::{SourceFormat, WHITE_LIST};
pub use placement::{Position, MARGIN};
