//! Debug-draw callback protocol and colour helpers.
//!
//! Colours are packed RGBA, one byte per channel, red in the low byte.

use crate::mesh::WALKABLE_AREA;

/// Primitive kinds a [`DebugDraw`] implementation must accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugDrawPrimitive {
    Points,
    Lines,
    Tris,
    Quads,
}

/// Receiver for immediate-mode debug geometry.
///
/// Every primitive batch is bracketed by [`begin`](Self::begin) and
/// [`end`](Self::end); vertices in between are grouped into primitives of
/// the kind passed to `begin`.
pub trait DebugDraw {
    /// Enable or disable depth writes for the following batches.
    fn depth_mask(&mut self, state: bool);

    /// Enable or disable texturing for the following batches.
    fn texture(&mut self, state: bool);

    /// Start a batch of `prim`. `size` is a line width or point size.
    fn begin(&mut self, prim: DebugDrawPrimitive, size: f32);

    fn vertex(&mut self, pos: [f32; 3], color: u32);

    fn vertex_uv(&mut self, pos: [f32; 3], color: u32, uv: [f32; 2]);

    fn end(&mut self);

    /// Colour for an area id.
    fn area_to_col(&self, area: u8) -> u32 {
        area_to_col(area)
    }
}

pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    r as u32 | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
}

pub fn rgbaf(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    rgba(byte(r), byte(g), byte(b), byte(a))
}

/// A distinct colour per integer, for tiles and areas.
pub fn int_to_col(i: u32, a: u8) -> u32 {
    let bit = |b: u32| ((i >> b) & 1) as u8;
    let r = bit(1) + bit(3) * 2 + 1;
    let g = bit(2) + bit(4) * 2 + 1;
    let b = bit(0) + bit(5) * 2 + 1;
    rgba(r * 63, g * 63, b * 63, a)
}

pub fn area_to_col(area: u8) -> u32 {
    if area == WALKABLE_AREA || area == 0 {
        rgba(0, 192, 255, 255)
    } else {
        int_to_col(area as u32, 255)
    }
}

/// Replace the alpha channel.
pub const fn trans_col(color: u32, a: u8) -> u32 {
    (a as u32) << 24 | (color & 0x00ff_ffff)
}

/// Halve the colour channels, keeping alpha.
pub const fn dark_col(color: u32) -> u32 {
    ((color >> 1) & 0x007f_7f7f) | (color & 0xff00_0000)
}

/// Scale the colour channels by `d / 256`, keeping alpha.
pub const fn mult_col(color: u32, d: u32) -> u32 {
    let r = color & 0xff;
    let g = (color >> 8) & 0xff;
    let b = (color >> 16) & 0xff;
    let a = color >> 24;
    rgba(
        ((r * d) >> 8) as u8,
        ((g * d) >> 8) as u8,
        ((b * d) >> 8) as u8,
        a as u8,
    )
}

/// Face colours for [`append_box`](crate::draw::append_box): top, bottom, then sides.
pub const fn box_colors(top: u32, side: u32) -> [u32; 6] {
    [
        mult_col(top, 250),
        mult_col(side, 140),
        mult_col(side, 165),
        mult_col(side, 217),
        mult_col(side, 165),
        mult_col(side, 217),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_packing() {
        assert_eq!(rgba(0x11, 0x22, 0x33, 0x44), 0x4433_2211);
        assert_eq!(rgbaf(1.0, 0.0, 0.0, 1.0), 0xff00_00ff);
    }

    #[test]
    fn test_int_to_col() {
        assert_eq!(int_to_col(0, 128), rgba(63, 63, 63, 128));
        assert_eq!(int_to_col(1, 255), rgba(63, 63, 126, 255));
    }

    #[test]
    fn test_alpha_helpers() {
        let c = rgba(200, 100, 50, 255);
        assert_eq!(trans_col(c, 64), rgba(200, 100, 50, 64));
        assert_eq!(dark_col(c), rgba(100, 50, 25, 255));
        assert_eq!(mult_col(c, 128), rgba(100, 50, 25, 255));
    }
}
