use thiserror::Error;

/// Errors raised while building surfaces or issuing draw calls.
///
/// Out-of-bounds drawing is not an error: every primitive clips silently.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    ImageEncode(#[source] image::ImageError),
    #[error("invalid line size {0}")]
    InvalidSize(i32),
}
