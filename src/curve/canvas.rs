//! 8-bit RGBA pixel buffer the curve is plotted into

use crate::rasterizer::Color;

/// Color channel index into an RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
}

/// RGBA canvas, 4 bytes per pixel, row-major with a top-left origin
#[derive(Debug, Clone)]
pub struct Canvas {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let mut canvas = Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        };
        canvas.clear(Color::BLACK);
        canvas
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Byte offset of pixel (x, y), or `None` when outside the canvas
    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some((y as usize * self.width + x as usize) * 4)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        self.offset(x, y).map(|i| Color {
            r: self.pixels[i],
            g: self.pixels[i + 1],
            b: self.pixels[i + 2],
            a: self.pixels[i + 3],
        })
    }

    pub fn channel(&self, x: i64, y: i64, channel: Channel) -> Option<u8> {
        self.offset(x, y).map(|i| self.pixels[i + channel as usize])
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Raise one channel to at least `value`. Never darkens.
    /// Returns false when (x, y) is outside the canvas.
    pub fn raise_channel(&mut self, x: i64, y: i64, channel: Channel, value: u8) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                let c = &mut self.pixels[i + channel as usize];
                *c = (*c).max(value);
                true
            }
            None => false,
        }
    }

    /// Draw a filled circle at (cx, cy) with given radius and color
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for y in (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.set_pixel(x as i64, y as i64, color);
                }
            }
        }
    }
}
