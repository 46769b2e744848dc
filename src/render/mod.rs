//! Drawing primitives.
//!
//! All primitives are methods on [`FrameBuffer`] and reduce to its per-pixel
//! depth-test/blend rule:
//! - `line`: plan-based and Bresenham line walks, thick outlines
//! - `rect`: clipped rectangle fill
//! - `blit`: composited and raw surface copies

mod blit;
mod framebuffer;
mod line;
mod rect;

pub(crate) use framebuffer::index_of;
pub use framebuffer::FrameBuffer;
pub use line::{Axis, LinePlan, LineShape};
