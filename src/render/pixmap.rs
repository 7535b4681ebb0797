// src/render/pixmap.rs

//! Pixel-Backend auf Basis von tiny-skia.

use std::path::Path;

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::surface::{PolygonPaint, PolygonSurface, RenderError, RenderResult};
use crate::color::model::Rgba;
use crate::math::types::Point2D;

pub struct PixmapSurface {
    pixmap: Pixmap,
    anti_alias: bool,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSurface { width, height })?;
        Ok(Self {
            pixmap,
            anti_alias: true,
        })
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encoding(e.to_string()))
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn paint_for(&self, color: Rgba) -> Paint<'static> {
        let [r, g, b, a] = color.to_u8();
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(r, g, b, a));
        paint.anti_alias = self.anti_alias;
        paint
    }
}

impl PolygonSurface for PixmapSurface {
    fn fill_background(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_u8();
        self.pixmap.fill(Color::from_rgba8(r, g, b, a));
    }

    fn draw_polygon(&mut self, points: &[Point2D], paint: &PolygonPaint) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        let mut builder = PathBuilder::new();
        builder.move_to(first.x as f32, first.y as f32);
        for p in rest {
            builder.line_to(p.x as f32, p.y as f32);
        }
        let Some(open_path) = builder.clone().finish() else {
            return;
        };
        builder.close();
        let Some(closed_path) = builder.finish() else {
            return;
        };

        if let Some(fill) = paint.fill {
            let fill_paint = self.paint_for(fill.to_rgba());
            self.pixmap.fill_path(
                &closed_path,
                &fill_paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }

        let stroke_paint = self.paint_for(paint.stroke.to_rgba());
        let stroke = Stroke {
            width: paint.stroke_width as f32,
            ..Stroke::default()
        };
        let outline = if paint.close_path { &closed_path } else { &open_path };
        self.pixmap
            .stroke_path(outline, &stroke_paint, &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::model::Hsla;

    fn square() -> Vec<Point2D> {
        vec![
            Point2D::new(2.0, 2.0),
            Point2D::new(18.0, 2.0),
            Point2D::new(18.0, 18.0),
            Point2D::new(2.0, 18.0),
        ]
    }

    #[test]
    fn test_invalid_size() {
        assert!(PixmapSurface::new(0, 10).is_err());
    }

    #[test]
    fn test_fill_and_background() {
        let mut surface = PixmapSurface::new(20, 20).unwrap().with_anti_alias(false);
        surface.fill_background(Rgba::WHITE);
        let red = Hsla::new(0.0, 100.0, 50.0, 1.0);
        surface.draw_polygon(
            &square(),
            &PolygonPaint {
                fill: Some(red),
                stroke: red,
                stroke_width: 1.0,
                close_path: true,
            },
        );

        let inside = surface.pixmap().pixel(10, 10).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue()), (255, 0, 0));
        let corner = surface.pixmap().pixel(0, 0).unwrap();
        assert_eq!((corner.red(), corner.green(), corner.blue()), (255, 255, 255));
    }

    #[test]
    fn test_stroke_only() {
        let mut surface = PixmapSurface::new(20, 20).unwrap().with_anti_alias(false);
        let blue = Hsla::new(240.0, 100.0, 50.0, 1.0);
        surface.draw_polygon(
            &square(),
            &PolygonPaint {
                fill: None,
                stroke: blue,
                stroke_width: 2.0,
                close_path: true,
            },
        );
        let center = surface.pixmap().pixel(10, 10).unwrap();
        assert_eq!(center.alpha(), 0);
        let edge = surface.pixmap().pixel(10, 2).unwrap();
        assert_eq!(edge.blue(), 255);
    }

    #[test]
    fn test_png_encoding() {
        let surface = PixmapSurface::new(4, 4).unwrap();
        let bytes = surface.encode_png().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
