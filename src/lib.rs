//! A CPU-based 2D rasterization and compositing engine.
//!
//! A [`Surface`] owns a color buffer and a parallel depth buffer. Drawing goes
//! through a [`FrameBuffer`] view, borrowed once per frame, which provides
//! pixel writes, lines, rectangles and surface blits under one
//! depth-test-and-alpha-blend rule. Out-of-bounds drawing is clipped silently.
//!
//! # Quick Start
//!
//! ```
//! use drawsurf::prelude::*;
//!
//! let mut surface = Surface::blank(64, 48)?;
//! let mut frame = surface.as_framebuffer();
//! frame.fill_rect(4, 4, 20, 12, 0.0, colors::BLUE);
//! frame.draw_line(0, 0, 63, 47, 0.0, colors::RED);
//! frame.draw_thick_line(10, 40, 50, 30, 0.0, 3, colors::GREEN)?;
//! # Ok::<(), drawsurf::SurfaceError>(())
//! ```

// Public API - exposed to library consumers
pub mod colors;
pub mod error;
pub mod surface;

// Internal modules - used within the crate only
pub(crate) mod render;

// Re-export commonly needed types at crate root for convenience
pub use error::SurfaceError;
pub use render::{Axis, FrameBuffer, LinePlan, LineShape};
pub use surface::{Surface, CLEAR_COLOR, CLEAR_DEPTH};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use drawsurf::prelude::*;
/// ```
pub mod prelude {
    pub use crate::colors;
    pub use crate::error::SurfaceError;
    pub use crate::render::{FrameBuffer, LinePlan};
    pub use crate::surface::{Surface, CLEAR_COLOR, CLEAR_DEPTH};
}
