// src/color/raster.rs

//! Bild-Modus: ein auf Zellauflösung verkleinertes Rasterbild liefert pro Zelle die Farbe.

use image::DynamicImage;
use image::imageops::FilterType;

use super::model::Rgba;
use crate::math::error::{MathError, MathResult};

/// RGBA-Raster in Zellauflösung (eine Zelle = ein Pixel).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRaster {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl ImageRaster {
    /// Übernimmt rohe RGBA8-Daten, Länge muss `width * height * 4` sein.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> MathResult<Self> {
        if width == 0 || height == 0 {
            return Err(MathError::InvalidConfiguration {
                message: format!("Image raster must not be empty ({width}x{height})"),
            });
        }
        if data.len() != width * height * 4 {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Image raster {width}x{height} needs {} bytes, got {}",
                    width * height * 4,
                    data.len()
                ),
            });
        }

        let pixels = data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Skaliert ein dekodiertes Bild auf `columns x rows` Zellen herunter.
    pub fn from_image(image: &DynamicImage, columns: usize, rows: usize) -> MathResult<Self> {
        let columns = u32::try_from(columns.max(1)).map_err(|_| MathError::InvalidConfiguration {
            message: format!("Too many image columns: {columns}"),
        })?;
        let rows = u32::try_from(rows.max(1)).map_err(|_| MathError::InvalidConfiguration {
            message: format!("Too many image rows: {rows}"),
        })?;

        let resized = image.resize_exact(columns, rows, FilterType::Triangle).to_rgba8();
        Self::from_rgba8(columns as usize, rows as usize, resized.as_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel an einer (gebrochenen) Zellposition; gerundet und auf den Rand geklemmt.
    pub fn sample(&self, column: f64, row: f64) -> Rgba {
        let col = Self::to_index(column, self.width);
        let row = Self::to_index(row, self.height);
        let [r, g, b, a] = self.pixels[row * self.width + col];
        Rgba::new(f64::from(r), f64::from(g), f64::from(b), f64::from(a) / 255.0)
    }

    fn to_index(position: f64, len: usize) -> usize {
        let max = (len - 1) as f64;
        let rounded = position.round();
        if rounded.is_nan() || rounded <= 0.0 {
            0
        } else if rounded >= max {
            len - 1
        } else {
            rounded as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba as ImageRgba};

    fn checker() -> ImageRaster {
        // 2x2: rot, grün / blau, weiß
        let data = [
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 128,
        ];
        ImageRaster::from_rgba8(2, 2, &data).unwrap()
    }

    #[test]
    fn test_sample_rounds_and_clamps() {
        let raster = checker();
        assert_eq!(raster.sample(0.2, 0.4), Rgba::opaque(255.0, 0.0, 0.0));
        assert_eq!(raster.sample(0.6, -3.0), Rgba::opaque(0.0, 255.0, 0.0));
        assert_eq!(raster.sample(-1.0, 9.0), Rgba::opaque(0.0, 0.0, 255.0));
        let last = raster.sample(f64::INFINITY, 1.0);
        assert_eq!(last.r, 255.0);
        assert_eq!(last.a, 128.0 / 255.0);
        assert_eq!(raster.sample(f64::NAN, f64::NAN), raster.sample(0.0, 0.0));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(ImageRaster::from_rgba8(0, 1, &[]).is_err());
        assert!(ImageRaster::from_rgba8(2, 2, &[0; 15]).is_err());
    }

    #[test]
    fn test_downsample_uniform_image() {
        let buffer = ImageBuffer::from_pixel(64, 32, ImageRgba([10u8, 20, 30, 255]));
        let raster = ImageRaster::from_image(&DynamicImage::ImageRgba8(buffer), 4, 2).unwrap();
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.sample(3.0, 1.0), Rgba::opaque(10.0, 20.0, 30.0));
    }
}
