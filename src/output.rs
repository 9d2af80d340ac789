//! Float-to-byte conversion and PNG output

use std::path::Path;
use thiserror::Error;

use crate::curve::Canvas;
use crate::rasterizer::{Color, Rasterizer, Vec3};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{len} bytes do not make a {width}x{height} RGBA image")]
    Dimensions { width: usize, height: usize, len: usize },
}

/// Clamp each 0.0-255.0 channel to a byte and emit opaque RGBA
pub fn to_rgba8(frame: &[Vec3]) -> Vec<u8> {
    frame
        .iter()
        .flat_map(|c| Color::from_vec3(*c).to_bytes())
        .collect()
}

/// Write RGBA bytes as a PNG (format chosen from the file extension)
pub fn save_rgba<P: AsRef<Path>>(path: P, width: usize, height: usize, rgba: Vec<u8>) -> Result<(), OutputError> {
    let len = rgba.len();
    let dims = || OutputError::Dimensions { width, height, len };
    let w = u32::try_from(width).map_err(|_| dims())?;
    let h = u32::try_from(height).map_err(|_| dims())?;
    let img = image::RgbaImage::from_raw(w, h, rgba).ok_or_else(dims)?;
    img.save(path.as_ref())?;
    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Save the rasterizer's color buffer
pub fn save_frame<P: AsRef<Path>>(r: &Rasterizer, path: P) -> Result<(), OutputError> {
    save_rgba(path, r.width(), r.height(), to_rgba8(r.frame_buffer()))
}

pub fn save_canvas<P: AsRef<Path>>(canvas: &Canvas, path: P) -> Result<(), OutputError> {
    save_rgba(path, canvas.width, canvas.height, canvas.pixels.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tinyraster-{}-{}.png", name, std::process::id()))
    }

    #[test]
    fn test_to_rgba8_clamps_and_is_opaque() {
        let bytes = to_rgba8(&[Vec3::new(300.0, -1.0, 12.9), Vec3::ZERO]);
        assert_eq!(bytes, vec![255, 0, 12, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_wrong_size_rejected() {
        let err = save_rgba(temp_png("bad"), 4, 4, vec![0; 10]).unwrap_err();
        assert!(matches!(err, OutputError::Dimensions { len: 10, .. }));
    }

    #[test]
    fn test_canvas_png_round_trip() {
        let mut canvas = Canvas::new(5, 3);
        canvas.set_pixel(4, 2, Color::new(10, 20, 30));
        let path = temp_png("canvas");
        save_canvas(&canvas, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(4, 2).0, [10, 20, 30, 255]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_save_frame() {
        let mut r = Rasterizer::new(4, 2);
        r.set_background(Vec3::new(0.0, 128.0, 255.0));
        r.clear(crate::rasterizer::Buffers::COLOR);
        let path = temp_png("frame");
        save_frame(&r, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(3, 1).0, [0, 128, 255, 255]);
        let _ = std::fs::remove_file(path);
    }
}
