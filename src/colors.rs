//! Packed ARGB colors and the "draw-over" compositor.
//!
//! Colors are plain `u32` values in ARGB8888 layout (alpha in the top byte),
//! not premultiplied. An alpha of `0xFF` is fully opaque, `0x00` fully
//! transparent.

// Colors in ARGB8888 format
pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const RED: u32 = 0xFFFF0000;
pub const GREEN: u32 = 0xFF00FF00;
pub const BLUE: u32 = 0xFF0000FF;
pub const MAGENTA: u32 = 0xFFFF00FF;
pub const TRANSPARENT: u32 = 0x00000000;

pub const OPAQUE: u8 = 0xFF;

/// Pack four channels into an ARGB value.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

#[inline]
pub const fn red(color: u32) -> u8 {
    (color >> 16) as u8
}

#[inline]
pub const fn green(color: u32) -> u8 {
    (color >> 8) as u8
}

#[inline]
pub const fn blue(color: u32) -> u8 {
    color as u8
}

#[inline]
pub const fn is_opaque(color: u32) -> bool {
    alpha(color) == OPAQUE
}

/// Composite `src` over `dst`.
///
/// Each color channel is `src * a + dst * (1 - a)` with `a = src.alpha / 255`,
/// rounded to the nearest integer. The output alpha is
/// `src.alpha + dst.alpha * (1 - a)`, clamped to 255.
///
/// Opaque sources are returned unchanged and fully transparent sources leave
/// `dst` untouched.
#[inline]
pub fn mix(src: u32, dst: u32) -> u32 {
    let src_a = alpha(src) as u32;
    if src_a == 0xFF {
        return src;
    }
    if src_a == 0 {
        return dst;
    }

    let inv_src_a = 255 - src_a;
    let channel = |s: u8, d: u8| ((s as u32 * src_a + d as u32 * inv_src_a + 127) / 255) as u8;
    let out_a = (src_a + (alpha(dst) as u32 * inv_src_a + 127) / 255).min(255) as u8;

    argb(
        out_a,
        channel(red(src), red(dst)),
        channel(green(src), green(dst)),
        channel(blue(src), blue(dst)),
    )
}
