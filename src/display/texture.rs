use std::path::Path;

use super::canvas::Rgba;
use crate::error::Error;

/// Decoded RGBA image kept in memory for nearest-neighbour sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Texture {
    /// Build a texture from raw pixels (row-major).
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self, Error> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(Error::Draw(format!(
                "texture is {}x{} but got {} pixels",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Texture {
            width,
            height,
            pixels,
        })
    }

    /// Single-colour texture; handy for tests and placeholders.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Texture {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let image = image::open(path).map_err(|e| Error::ResourceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Rgba::new(r, g, b, a)
            })
            .collect();
        Ok(Texture {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, clamped to the texture edges.
    pub fn sample(&self, x: u32, y: u32) -> Rgba {
        if self.pixels.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}
