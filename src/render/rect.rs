//! Clipped axis-aligned rectangle fill.

use super::framebuffer::FrameBuffer;

/// A region already clipped to a buffer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClipRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Intersect the half-open region `[min_x, max_x) x [min_y, max_y)` with a
/// `width` x `height` buffer. Returns None when nothing is left.
pub(crate) fn clip(
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
    width: u32,
    height: u32,
) -> Option<ClipRect> {
    let x_start = min_x.max(0);
    let y_start = min_y.max(0);
    let x_end = max_x.min(width as i64);
    let y_end = max_y.min(height as i64);

    if x_start >= x_end || y_start >= y_end {
        return None;
    }

    Some(ClipRect {
        x: x_start as usize,
        y: y_start as usize,
        w: (x_end - x_start) as usize,
        h: (y_end - y_start) as usize,
    })
}

impl FrameBuffer<'_> {
    /// Fill the half-open rectangle spanned by two corners.
    ///
    /// The corners may be given in any order. Equal corners paint exactly one
    /// pixel; otherwise a zero-width or zero-height rectangle paints nothing.
    /// Only the part inside the buffer is walked.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, depth: f64, color: u32) {
        if x0 == x1 && y0 == y1 {
            self.draw_pixel_xy(x0, y0, depth, color);
            return;
        }

        self.fill_region(
            x0.min(x1) as i64,
            y0.min(y1) as i64,
            x0.max(x1) as i64,
            y0.max(y1) as i64,
            depth,
            color,
        );
    }

    /// Fill `[min_x, max_x) x [min_y, max_y)`, already normalized.
    pub(crate) fn fill_region(
        &mut self,
        min_x: i64,
        min_y: i64,
        max_x: i64,
        max_y: i64,
        depth: f64,
        color: u32,
    ) {
        let Some(r) = clip(min_x, min_y, max_x, max_y, self.width(), self.height()) else {
            return;
        };

        // Indices are derived once from the clipped region, then stepped.
        let stride = self.width() as usize;
        let mut row_start = r.y * stride + r.x;
        for _ in 0..r.h {
            for i in row_start..row_start + r.w {
                self.composite(i, depth, color);
            }
            row_start += stride;
        }
    }
}
