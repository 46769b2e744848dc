//! Line rasterization.
//!
//! [`LinePlan::classify`] turns a segment into a compact description of its
//! pixel walk without touching any buffer. [`FrameBuffer::draw_line`] walks
//! that plan; [`FrameBuffer::draw_line_bresenham`] is the classic error
//! accumulator and must touch exactly the same pixels.
//!
//! # Run-length plan
//!
//! For general slopes the major axis is whichever of `|dx|`, `|dy|` is larger
//! (ties go to x). The walk is stored as runs: each run is a number of pixels
//! that share a minor coordinate, laid out one major step apart. Consecutive
//! runs are joined by a diagonal step. The run lengths come from the same
//! integer error term Bresenham uses, so both walks agree pixel for pixel.

use log::trace;

use super::framebuffer::FrameBuffer;
use crate::error::SurfaceError;

/// Axis a walk advances along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    /// Both endpoints coincide.
    Point,
    /// Horizontal (`Axis::X`) or vertical (`Axis::Y`) run of `len` pixels.
    Straight { axis: Axis, len: u64 },
    /// Exact 45 degree diagonal of `len` pixels.
    Diagonal { len: u64 },
    /// General slope, see the module docs.
    Runs { major: Axis, runs: Vec<u64> },
}

/// Pixel walk of a line segment, relative to its start point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePlan {
    /// x direction of the walk, `1` or `-1`.
    pub step_x: i32,
    /// y direction of the walk, `1` or `-1`.
    pub step_y: i32,
    pub shape: LineShape,
}

impl LinePlan {
    /// Classify the segment (x0, y0) -> (x1, y1). Deltas are taken in `i64`,
    /// so any pair of `i32` endpoints is accepted.
    pub fn classify(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let dx = x1 as i64 - x0 as i64;
        let dy = y1 as i64 - y0 as i64;
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };

        let adx = dx.unsigned_abs();
        let ady = dy.unsigned_abs();

        let shape = if dx == 0 && dy == 0 {
            LineShape::Point
        } else if dy == 0 {
            LineShape::Straight {
                axis: Axis::X,
                len: adx + 1,
            }
        } else if dx == 0 {
            LineShape::Straight {
                axis: Axis::Y,
                len: ady + 1,
            }
        } else if adx == ady {
            LineShape::Diagonal { len: adx + 1 }
        } else {
            let major = if adx >= ady { Axis::X } else { Axis::Y };
            LineShape::Runs {
                major,
                runs: bresenham_runs(dx, dy, major),
            }
        };

        Self {
            step_x,
            step_y,
            shape,
        }
    }

    /// Number of pixels on the walk.
    pub fn pixel_count(&self) -> u64 {
        match &self.shape {
            LineShape::Point => 1,
            LineShape::Straight { len, .. } | LineShape::Diagonal { len } => *len,
            LineShape::Runs { runs, .. } => runs.iter().sum(),
        }
    }

    /// Visit every pixel of the walk starting at (x0, y0), in order.
    pub fn walk<F: FnMut(i32, i32)>(&self, x0: i32, y0: i32, mut plot: F) {
        let (sx, sy) = (self.step_x as i64, self.step_y as i64);
        // Stepping past the far endpoint stays representable in i64.
        let (mut x, mut y) = (x0 as i64, y0 as i64);

        match &self.shape {
            LineShape::Point => plot(x0, y0),
            LineShape::Straight { axis, len } => {
                let (ix, iy) = match axis {
                    Axis::X => (sx, 0),
                    Axis::Y => (0, sy),
                };
                for _ in 0..*len {
                    plot(x as i32, y as i32);
                    x += ix;
                    y += iy;
                }
            }
            LineShape::Diagonal { len } => {
                for _ in 0..*len {
                    plot(x as i32, y as i32);
                    x += sx;
                    y += sy;
                }
            }
            LineShape::Runs { major, runs } => {
                let (ix, iy) = match major {
                    Axis::X => (sx, 0),
                    Axis::Y => (0, sy),
                };
                for (i, &run) in runs.iter().enumerate() {
                    if i > 0 {
                        x += sx;
                        y += sy;
                    }
                    for k in 0..run {
                        if k > 0 {
                            x += ix;
                            y += iy;
                        }
                        plot(x as i32, y as i32);
                    }
                }
            }
        }
    }
}

/// Run lengths along the major axis, from the Bresenham error term.
///
/// The error update is the one in [`FrameBuffer::draw_line_bresenham`]. On a
/// line whose major axis is `major`, every iteration steps the major axis, so
/// a minor step ends the current run.
fn bresenham_runs(dx: i64, dy: i64, major: Axis) -> Vec<u64> {
    let a = dx.abs();
    let b = -dy.abs();
    let steps = a.max(-b);

    let mut err = a + b;
    let mut runs = Vec::new();
    let mut run = 1;

    for _ in 0..steps {
        let e2 = 2 * err;
        let step_x = e2 > b;
        let step_y = e2 < a;
        if step_x {
            err += b;
        }
        if step_y {
            err += a;
        }

        let minor_stepped = match major {
            Axis::X => step_y,
            Axis::Y => step_x,
        };
        if minor_stepped {
            runs.push(run);
            run = 1;
        } else {
            run += 1;
        }
    }
    runs.push(run);
    runs
}

impl FrameBuffer<'_> {
    /// True when the segment's bounding box lies entirely outside the buffer.
    fn misses(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        x0.max(x1) < 0
            || y0.max(y1) < 0
            || x0.min(x1) as i64 >= self.width() as i64
            || y0.min(y1) as i64 >= self.height() as i64
    }

    /// Draw a one pixel wide line at constant depth, endpoints included.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, depth: f64, color: u32) {
        if self.misses(x0, y0, x1, y1) {
            return;
        }
        LinePlan::classify(x0, y0, x1, y1).walk(x0, y0, |x, y| {
            self.draw_pixel_xy(x, y, depth, color);
        });
    }

    /// Draws a line between two points using Bresenham's line algorithm.
    ///
    /// Reference walk for [`draw_line`](Self::draw_line): same pixels, but
    /// the error term is updated per pixel instead of being precomputed.
    pub fn draw_line_bresenham(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        depth: f64,
        color: u32,
    ) {
        if self.misses(x0, y0, x1, y1) {
            return;
        }

        let (x1, y1) = (x1 as i64, y1 as i64);
        let mut x = x0 as i64;
        let mut y = y0 as i64;

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();

        let x_incr_direction = if x < x1 { 1 } else { -1 };
        let y_incr_direction = if y < y1 { 1 } else { -1 };

        let mut err = dx + dy;

        loop {
            self.draw_pixel_xy(x as i32, y as i32, depth, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;

            // Both conditions can hold, giving a diagonal step.
            if e2 > dy {
                err += dy;
                x += x_incr_direction;
            }
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    /// Draw a line `size` pixels wide.
    ///
    /// This is an outline, not a filled polygon: the centerline plus the four
    /// edges of the quad obtained by offsetting both endpoints by
    /// `floor(size / 2)` and `round(size / 2)` along the perpendicular.
    /// Axis-aligned lines are drawn as rectangles of the same extent.
    ///
    /// `size == 0` draws nothing, `size == 1` is [`draw_line`](Self::draw_line).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_thick_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        depth: f64,
        size: i32,
        color: u32,
    ) -> Result<(), SurfaceError> {
        if size < 0 {
            trace!("rejecting thick line with size {}", size);
            return Err(SurfaceError::InvalidSize(size));
        }
        if size == 0 {
            return Ok(());
        }
        if size == 1 {
            self.draw_line(x0, y0, x1, y1, depth, color);
            return Ok(());
        }

        let dx = x1 as f64 - x0 as f64;
        let dy = y1 as f64 - y0 as f64;

        if dx == 0.0 && dy == 0.0 {
            self.draw_pixel_xy(x0, y0, depth, color);
            return Ok(());
        }

        let near = (size as f64 / 2.0).floor() as i64;
        let far = (size as f64 / 2.0).round() as i64;

        if dx == 0.0 {
            let (x0, x1) = (x0 as i64, x1 as i64);
            let (top, bottom) = (y0.min(y1) as i64, y0.max(y1) as i64);
            self.fill_region(x0 - near, top, x1 + far, bottom, depth, color);
            return Ok(());
        }
        if dy == 0.0 {
            let (y0, y1) = (y0 as i64, y1 as i64);
            let (left, right) = (x0.min(x1) as i64, x0.max(x1) as i64);
            self.fill_region(left, y0 - near, right, y1 + far, depth, color);
            return Ok(());
        }

        let theta = (-dx / dy).atan();
        let (vx, vy) = (theta.cos(), theta.sin());
        // `as` saturates, so corners far off the buffer stay representable.
        let offset = |x: i32, y: i32, d: f64| {
            (
                (x as f64 + vx * d).round() as i32,
                (y as f64 + vy * d).round() as i32,
            )
        };

        let p0 = offset(x0, y0, near as f64);
        let p1 = offset(x1, y1, near as f64);
        let p2 = offset(x0, y0, -(far as f64));
        let p3 = offset(x1, y1, -(far as f64));

        self.draw_line(x0, y0, x1, y1, depth, color);
        self.draw_line(p0.0, p0.1, p1.0, p1.1, depth, color);
        self.draw_line(p2.0, p2.1, p3.0, p3.1, depth, color);
        self.draw_line(p0.0, p0.1, p2.0, p2.1, depth, color);
        self.draw_line(p1.0, p1.1, p3.0, p3.1, depth, color);
        Ok(())
    }
}
