//! Owned pixel storage: a color buffer and a parallel depth buffer.
//!
//! A [`Surface`] never changes size after construction. Drawing goes through
//! the [`FrameBuffer`] view returned by [`Surface::as_framebuffer`], which is
//! meant to be borrowed once per frame.

use std::path::Path;

use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;

use crate::colors;
use crate::error::SurfaceError;
use crate::render::{index_of, FrameBuffer};

/// Color written by [`Surface::clear`] (opaque black).
pub const CLEAR_COLOR: u32 = 0xFF000000;

/// Depth written by [`Surface::clear`], meaning "nothing drawn yet".
///
/// The depth test ranks it behind every other depth in both roles: a cleared
/// pixel never occludes a fragment, and a fragment at this depth never
/// replaces a drawn opaque pixel.
pub const CLEAR_DEPTH: f64 = -1.0;

/// A fixed-size pair of ARGB color and depth buffers.
///
/// Pixel `(x, y)` lives at linear index `y * width + x` in both buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f64>,
    width: u32,
    height: u32,
}

impl Surface {
    /// Allocate a surface with every pixel set to `color` at depth `depth`.
    pub fn new(width: u32, height: u32, color: u32, depth: f64) -> Result<Self, SurfaceError> {
        let size = pixel_count(width, height)?;
        debug!("allocating {}x{} surface", width, height);
        Ok(Self {
            color_buffer: vec![color; size],
            depth_buffer: vec![depth; size],
            width,
            height,
        })
    }

    /// Allocate a cleared surface ([`CLEAR_COLOR`] at [`CLEAR_DEPTH`]).
    pub fn blank(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Self::new(width, height, CLEAR_COLOR, CLEAR_DEPTH)
    }

    /// Wrap an existing ARGB pixel array. The depth buffer starts cleared.
    pub fn from_pixels(pixels: Vec<u32>, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let size = pixel_count(width, height)?;
        if pixels.len() != size {
            return Err(SurfaceError::BufferSizeMismatch {
                expected: size,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            color_buffer: pixels,
            depth_buffer: vec![CLEAR_DEPTH; size],
            width,
            height,
        })
    }

    /// Copy the pixels of a decoded RGBA image.
    pub fn from_image(img: &RgbaImage) -> Result<Self, SurfaceError> {
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                colors::argb(a, r, g, b)
            })
            .collect();

        Self::from_pixels(data, width, height)
    }

    pub fn from_dynamic_image(img: &DynamicImage) -> Result<Self, SurfaceError> {
        Self::from_image(&img.to_rgba8())
    }

    /// Load a surface from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SurfaceError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(SurfaceError::ImageDecode)?;
        let surface = Self::from_dynamic_image(&img)?;
        debug!(
            "loaded {}x{} surface from {}",
            surface.width,
            surface.height,
            path.display()
        );
        Ok(surface)
    }

    /// Convert the color buffer to an RGBA image. Depth is dropped.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.color_buffer[(y * self.width + x) as usize];
            Rgba([colors::red(c), colors::green(c), colors::blue(c), colors::alpha(c)])
        })
    }

    /// Encode the color buffer to `path`; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SurfaceError> {
        let path = path.as_ref();
        self.to_rgba_image()
            .save(path)
            .map_err(SurfaceError::ImageEncode)?;
        debug!("saved {}x{} surface to {}", self.width, self.height, path.display());
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn size(&self) -> usize {
        self.color_buffer.len()
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f64] {
        &self.depth_buffer
    }

    /// Reset to [`CLEAR_COLOR`] / [`CLEAR_DEPTH`].
    pub fn clear(&mut self) {
        self.fill(CLEAR_DEPTH, CLEAR_COLOR);
    }

    pub fn fill(&mut self, depth: f64, color: u32) {
        self.fill_depth(depth);
        self.fill_color(color);
    }

    pub fn fill_color(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    pub fn fill_depth(&mut self, depth: f64) {
        self.depth_buffer.fill(depth);
    }

    /// Get the color at (x, y), or None if out of bounds.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        index_of(x, y, self.width, self.height).map(|i| self.color_buffer[i])
    }

    /// Get the depth at (x, y), or None if out of bounds.
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f64> {
        index_of(x, y, self.width, self.height).map(|i| self.depth_buffer[i])
    }

    /// Raw bytes of the color buffer in native endianness, for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        // u32 has no padding and u8 has alignment 1, so the reinterpretation is sound.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, SurfaceError> {
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(SurfaceError::InvalidDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(SurfaceError::InvalidDimension { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn blank_surface_is_cleared() {
        let s = Surface::blank(4, 3).unwrap();
        assert_eq!(s.size(), 12);
        assert_eq!(s.color_buffer().len(), s.depth_buffer().len());
        assert!(s.color_buffer().iter().all(|&c| c == CLEAR_COLOR));
        assert!(s.depth_buffer().iter().all(|&z| z == CLEAR_DEPTH));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Surface::blank(0, 5),
            Err(SurfaceError::InvalidDimension { width: 0, height: 5 })
        ));
        assert!(matches!(
            Surface::new(5, 0, 0, 0.0),
            Err(SurfaceError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn from_pixels_checks_length() {
        let err = Surface::from_pixels(vec![0; 5], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::BufferSizeMismatch { expected: 4, actual: 5 }
        ));

        let s = Surface::from_pixels(vec![1, 2, 3, 4], 2, 2).unwrap();
        assert_eq!(s.get_pixel(1, 1), Some(4));
        assert_relative_eq!(s.get_depth(0, 1).unwrap(), CLEAR_DEPTH);
    }

    #[test]
    fn fill_and_clear() {
        let mut s = Surface::new(2, 2, 0x11223344, 3.5).unwrap();
        s.fill(7.0, colors::RED);
        assert_eq!(s.get_pixel(1, 0), Some(colors::RED));
        assert_relative_eq!(s.get_depth(1, 0).unwrap(), 7.0);

        s.clear();
        assert_eq!(s.get_pixel(1, 0), Some(CLEAR_COLOR));
        assert_relative_eq!(s.get_depth(1, 0).unwrap(), CLEAR_DEPTH);
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let s = Surface::blank(2, 2).unwrap();
        assert_eq!(s.get_pixel(2, 0), None);
        assert_eq!(s.get_pixel(0, -1), None);
        assert_eq!(s.get_depth(-1, 0), None);
    }

    #[test]
    fn image_conversion_keeps_channels() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0x10, 0x20, 0x30, 0x40]));
        img.put_pixel(1, 0, Rgba([0xFF, 0x00, 0x00, 0xFF]));

        let s = Surface::from_image(&img).unwrap();
        assert_eq!(s.color_buffer(), &[0x40102030, colors::RED]);
        assert_eq!(s.to_rgba_image(), img);
    }

    #[test]
    fn as_bytes_covers_color_buffer() {
        let s = Surface::new(3, 2, colors::WHITE, 0.0).unwrap();
        assert_eq!(s.as_bytes().len(), 24);
        assert!(s.as_bytes().iter().all(|&b| b == 0xFF));
    }
}
