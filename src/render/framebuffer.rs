//! Frame buffer view and the per-pixel depth-test/blend rule.
//!
//! Every primitive in this crate reduces to [`FrameBuffer::draw_pixel`] or
//! [`FrameBuffer::set_pixel`]. Both ignore indices outside `[0, size)`, which
//! is how partially visible geometry gets clipped.

use crate::colors::{self, mix};
use crate::surface::{CLEAR_COLOR, CLEAR_DEPTH};

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata. This is a borrowed view, not
/// an owning type: obtain one from [`Surface::as_framebuffer`] for the
/// duration of a frame and issue draw calls on it.
///
/// # Depth Buffer
///
/// Smaller depth values are nearer the viewer. [`CLEAR_DEPTH`] is the one
/// exception: it ranks behind every other depth, whether it is the stored
/// value or the fragment's. A cleared pixel accepts any fragment, and a
/// fragment at [`CLEAR_DEPTH`] (such as a pixel of a freshly decoded image)
/// only lands on pixels that are themselves cleared or translucent.
///
/// [`Surface::as_framebuffer`]: crate::Surface::as_framebuffer
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f64],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    pub(crate) fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f64],
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(
            color_buffer.len(),
            width as usize * height as usize,
            "Color buffer size doesn't match dimensions"
        );
        debug_assert_eq!(
            depth_buffer.len(),
            color_buffer.len(),
            "Depth buffer size doesn't match color buffer"
        );
        Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> usize {
        self.color_buffer.len()
    }

    pub fn color_buffer(&self) -> &[u32] {
        &*self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f64] {
        &*self.depth_buffer
    }

    pub fn clear(&mut self) {
        self.color_buffer.fill(CLEAR_COLOR);
        self.depth_buffer.fill(CLEAR_DEPTH);
    }

    /// Linear index of (x, y), or None if either coordinate is outside the buffer.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        index_of(x, y, self.width, self.height)
    }

    #[inline]
    fn checked_index(&self, index: i64) -> Option<usize> {
        if index >= 0 && (index as u64) < self.color_buffer.len() as u64 {
            Some(index as usize)
        } else {
            None
        }
    }

    /// Overwrite color and depth at `index` without testing or blending.
    /// Silently ignores out-of-bounds indices.
    #[inline]
    pub fn set_pixel(&mut self, index: i64, depth: f64, color: u32) {
        if let Some(i) = self.checked_index(index) {
            self.color_buffer[i] = color;
            self.depth_buffer[i] = depth;
        }
    }

    /// Draw a fragment at `index` with depth testing and alpha blending.
    ///
    /// Silently ignores out-of-bounds indices.
    ///
    /// - An opaque pixel nearer than the fragment is left alone.
    /// - A translucent pixel nearer than the fragment stays in front: the
    ///   fragment is blended beneath it and the stored depth is kept.
    /// - Otherwise the fragment is blended over the pixel and its depth stored.
    #[inline]
    pub fn draw_pixel(&mut self, index: i64, depth: f64, color: u32) {
        if let Some(i) = self.checked_index(index) {
            self.composite(i, depth, color);
        }
    }

    /// [`draw_pixel`](Self::draw_pixel) addressed by coordinates.
    ///
    /// Clips x and y separately, so a coordinate past the right edge never
    /// wraps onto the next row.
    #[inline]
    pub fn draw_pixel_xy(&mut self, x: i32, y: i32, depth: f64, color: u32) {
        if let Some(i) = self.index_of(x, y) {
            self.composite(i, depth, color);
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index_of(x, y).map(|i| self.color_buffer[i])
    }

    /// Get the depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f64> {
        self.index_of(x, y).map(|i| self.depth_buffer[i])
    }

    /// Depth test and blend at an index already known to be in bounds.
    #[inline]
    pub(crate) fn composite(&mut self, i: usize, depth: f64, color: u32) {
        let existing = self.color_buffer[i];
        let occluded = depth_key(self.depth_buffer[i]) < depth_key(depth);

        if occluded {
            if colors::is_opaque(existing) {
                return;
            }
            self.color_buffer[i] = mix(existing, color);
        } else {
            self.color_buffer[i] = mix(color, existing);
            self.depth_buffer[i] = depth;
        }
    }

    pub(crate) fn buffers_mut(&mut self) -> (&mut [u32], &mut [f64]) {
        (&mut *self.color_buffer, &mut *self.depth_buffer)
    }
}

/// Ordering key for the depth test: [`CLEAR_DEPTH`] sorts behind everything.
#[inline]
fn depth_key(depth: f64) -> f64 {
    if depth == CLEAR_DEPTH {
        f64::INFINITY
    } else {
        depth
    }
}

/// Linear index of (x, y) in a `width` x `height` buffer, or None if either
/// coordinate is outside it.
#[inline]
pub(crate) fn index_of(x: i32, y: i32, width: u32, height: u32) -> Option<usize> {
    if x >= 0 && (x as u32) < width && y >= 0 && (y as u32) < height {
        Some(y as usize * width as usize + x as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::colors::{BLUE, GREEN, RED};
    use crate::surface::{Surface, CLEAR_COLOR, CLEAR_DEPTH};
    use approx::assert_relative_eq;

    #[test]
    fn farther_opaque_write_is_rejected() {
        let mut s = Surface::blank(4, 4).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(5, 0.0, RED);
        fb.draw_pixel(5, 1.0, GREEN);

        assert_eq!(fb.color_buffer()[5], RED);
        assert_relative_eq!(fb.depth_buffer()[5], 0.0);
    }

    #[test]
    fn nearer_opaque_write_wins() {
        let mut s = Surface::blank(4, 4).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(2, 3.0, RED);
        fb.draw_pixel(2, 1.0, GREEN);

        assert_eq!(fb.color_buffer()[2], GREEN);
        assert_relative_eq!(fb.depth_buffer()[2], 1.0);
    }

    #[test]
    fn farther_fragment_blends_beneath_translucent_pixel() {
        let mut s = Surface::blank(1, 1).unwrap();
        let mut fb = s.as_framebuffer();
        fb.set_pixel(0, 1.0, 0x80FF0000);
        fb.draw_pixel(0, 5.0, BLUE);

        assert_eq!(fb.color_buffer()[0], 0xFF80007F);
        assert_relative_eq!(fb.depth_buffer()[0], 1.0);
    }

    #[test]
    fn opaque_draw_is_idempotent() {
        let mut s = Surface::blank(3, 3).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(4, 0.5, GREEN);
        let once = (fb.color_buffer().to_vec(), fb.depth_buffer().to_vec());
        fb.draw_pixel(4, 0.5, GREEN);
        assert_eq!(fb.color_buffer(), once.0.as_slice());
        assert_eq!(fb.depth_buffer(), once.1.as_slice());
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut s = Surface::blank(2, 2).unwrap();
        let before = s.clone();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(-1, 0.0, RED);
        fb.draw_pixel(4, 0.0, RED);
        fb.set_pixel(-7, 0.0, RED);
        fb.set_pixel(i64::MAX, 0.0, RED);
        fb.draw_pixel_xy(2, 0, 0.0, RED);
        fb.draw_pixel_xy(0, -1, 0.0, RED);
        assert_eq!(s, before);
    }

    #[test]
    fn set_pixel_overwrites_unconditionally() {
        let mut s = Surface::blank(2, 2).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(1, 0.0, RED);
        fb.set_pixel(1, 9.0, 0x10203040);
        assert_eq!(fb.color_buffer()[1], 0x10203040);
        assert_relative_eq!(fb.depth_buffer()[1], 9.0);
    }

    #[test]
    fn xy_addressing_does_not_wrap_rows() {
        let mut s = Surface::blank(3, 2).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel_xy(3, 0, 0.0, RED);
        assert!(fb.color_buffer().iter().all(|&c| c == CLEAR_COLOR));

        fb.draw_pixel_xy(1, 1, 0.0, RED);
        assert_eq!(fb.index_of(1, 1), Some(4));
        assert_eq!(fb.get_pixel(1, 1), Some(RED));
    }

    #[test]
    fn cleared_depth_fragment_does_not_replace_drawn_pixel() {
        let mut s = Surface::blank(1, 1).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(0, 0.0, RED);
        fb.draw_pixel(0, CLEAR_DEPTH, GREEN);

        assert_eq!(fb.get_pixel(0, 0), Some(RED));
        assert_relative_eq!(fb.get_depth(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn cleared_depth_ranks_behind_every_drawn_depth() {
        // -1 then 3: the later draw is nearer than the cleared-depth one.
        let mut s = Surface::blank(1, 1).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(0, CLEAR_DEPTH, RED);
        assert_eq!(fb.get_pixel(0, 0), Some(RED));
        fb.draw_pixel(0, 3.0, GREEN);

        assert_eq!(fb.get_pixel(0, 0), Some(GREEN));
        assert_relative_eq!(fb.get_depth(0, 0).unwrap(), 3.0);
    }

    #[test]
    fn cleared_depth_fragment_blends_beneath_translucent_pixel() {
        let mut s = Surface::blank(1, 1).unwrap();
        let mut fb = s.as_framebuffer();
        fb.set_pixel(0, 1.0, 0x80FF0000);
        fb.draw_pixel(0, CLEAR_DEPTH, BLUE);

        assert_eq!(fb.get_pixel(0, 0), Some(0xFF80007F));
        assert_relative_eq!(fb.get_depth(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn shared_index_matches_view_index() {
        let mut s = Surface::blank(5, 3).unwrap();
        let fb = s.as_framebuffer();
        for y in -1..4 {
            for x in -1..6 {
                assert_eq!(super::index_of(x, y, 5, 3), fb.index_of(x, y));
            }
        }
        assert_eq!(super::index_of(4, 2, 5, 3), Some(14));
        assert_eq!(super::index_of(0, 0, 0, 0), None);
    }

    #[test]
    fn clear_resets_view() {
        let mut s = Surface::blank(2, 1).unwrap();
        let mut fb = s.as_framebuffer();
        fb.draw_pixel(0, 2.0, RED);
        fb.clear();
        assert_eq!(fb.get_pixel(0, 0), Some(CLEAR_COLOR));
        assert_relative_eq!(fb.get_depth(0, 0).unwrap(), CLEAR_DEPTH);
    }
}
