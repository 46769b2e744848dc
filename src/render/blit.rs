//! Copying one surface onto another.
//!
//! [`FrameBuffer::blit`] composites through the depth test; the paste
//! variants overwrite color and depth directly.

use log::warn;

use super::framebuffer::FrameBuffer;
use super::rect::clip;
use crate::surface::Surface;

impl FrameBuffer<'_> {
    /// Composite `source` with its top-left corner at (x, y).
    ///
    /// Each source pixel goes through [`draw_pixel`](Self::draw_pixel) with its
    /// own depth. Only the part overlapping this buffer is walked; offsets may
    /// be negative.
    pub fn blit(&mut self, source: &Surface, x: i32, y: i32) {
        let (x, y) = (x as i64, y as i64);
        let Some(r) = clip(
            x,
            y,
            x + source.width() as i64,
            y + source.height() as i64,
            self.width(),
            self.height(),
        ) else {
            return;
        };

        let dst_stride = self.width() as usize;
        let src_stride = source.width() as usize;
        let src_colors = source.color_buffer();
        let src_depths = source.depth_buffer();

        let mut dst_row = r.y * dst_stride + r.x;
        let mut src_row = (r.y as i64 - y) as usize * src_stride + (r.x as i64 - x) as usize;
        for _ in 0..r.h {
            for k in 0..r.w {
                let s = src_row + k;
                self.composite(dst_row + k, src_depths[s], src_colors[s]);
            }
            dst_row += dst_stride;
            src_row += src_stride;
        }
    }

    /// Overwrite this buffer with `source`, bypassing depth test and blending.
    ///
    /// If the sizes differ only the overlapping top-left region is copied.
    pub fn paste(&mut self, source: &Surface) {
        if source.width() == self.width() && source.height() == self.height() {
            let (colors, depths) = self.buffers_mut();
            colors.copy_from_slice(source.color_buffer());
            depths.copy_from_slice(source.depth_buffer());
            return;
        }

        warn!(
            "pasting {}x{} surface onto {}x{} buffer, copying the overlap only",
            source.width(),
            source.height(),
            self.width(),
            self.height()
        );
        let w = source.width().min(self.width()) as i64;
        let h = source.height().min(self.height()) as i64;
        self.copy_region(source, 0, 0, w, h);
    }

    /// Overwrite the half-open region spanned by two corners with the same
    /// region of `source`. Clipped to both surfaces.
    pub fn paste_region(&mut self, source: &Surface, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.copy_region(
            source,
            x0.min(x1) as i64,
            y0.min(y1) as i64,
            x0.max(x1) as i64,
            y0.max(y1) as i64,
        );
    }

    fn copy_region(&mut self, source: &Surface, min_x: i64, min_y: i64, max_x: i64, max_y: i64) {
        let Some(r) = clip(
            min_x,
            min_y,
            max_x.min(source.width() as i64),
            max_y.min(source.height() as i64),
            self.width(),
            self.height(),
        ) else {
            return;
        };

        let dst_stride = self.width() as usize;
        let src_stride = source.width() as usize;
        let (colors, depths) = self.buffers_mut();

        for row in r.y..r.y + r.h {
            let dst = row * dst_stride + r.x;
            let src = row * src_stride + r.x;
            colors[dst..dst + r.w].copy_from_slice(&source.color_buffer()[src..src + r.w]);
            depths[dst..dst + r.w].copy_from_slice(&source.depth_buffer()[src..src + r.w]);
        }
    }
}
