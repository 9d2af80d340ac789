//! Core types for the rasterizer

use std::ops::BitOr;

use super::math::Vec3;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert a float color (0.0-255.0 per channel) to bytes, clamping out-of-range values
    pub fn from_vec3(c: Vec3) -> Self {
        let to_byte = |v: f32| if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 };
        Self::new(to_byte(c.x), to_byte(c.y), to_byte(c.z))
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Primitive kinds understood by the draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Line,
    Triangle,
}

/// Mask selecting which buffers `clear` resets.
/// Combine with `|`: `Buffers::COLOR | Buffers::DEPTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buffers(u8);

impl Buffers {
    pub const COLOR: Buffers = Buffers(0b01);
    pub const DEPTH: Buffers = Buffers(0b10);

    pub fn contains(self, other: Buffers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Buffers {
    type Output = Buffers;
    fn bitor(self, other: Buffers) -> Buffers {
        Buffers(self.0 | other.0)
    }
}
