// src/render/vector.rs

//! Vektor-Backend: schreibt die Polygone in ein SVG-Dokument.

use std::path::Path;

use svg::Document;
use svg::Node;
use svg::node::element::{Polygon, Polyline, Rectangle};

use super::surface::{PolygonPaint, PolygonSurface, RenderResult};
use crate::color::model::Rgba;
use crate::math::types::Point2D;

pub struct SvgSurface {
    document: Document,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height));
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        svg::save(path, &self.document)?;
        Ok(())
    }
}

fn points_attribute(points: &[Point2D]) -> String {
    points
        .iter()
        .map(|p| format!("{:.3},{:.3}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rgba_string(color: Rgba) -> String {
    let [r, g, b, _] = color.to_u8();
    format!("rgba({r}, {g}, {b}, {})", color.a)
}

impl PolygonSurface for SvgSurface {
    fn fill_background(&mut self, color: Rgba) {
        let rect = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", rgba_string(color));
        self.document.append(rect);
    }

    fn draw_polygon(&mut self, points: &[Point2D], paint: &PolygonPaint) {
        if points.len() < 2 {
            return;
        }
        let coords = points_attribute(points);
        let fill = paint
            .fill
            .map_or_else(|| "none".to_string(), |c| c.to_string());

        if paint.close_path {
            let polygon = Polygon::new()
                .set("points", coords)
                .set("fill", fill)
                .set("stroke", paint.stroke.to_string())
                .set("stroke-width", paint.stroke_width)
                .set("stroke-linejoin", "round");
            self.document.append(polygon);
            return;
        }

        // Offene Kontur: Fläche und Linie als getrennte Elemente
        if paint.fill.is_some() {
            let body = Polygon::new()
                .set("points", coords.clone())
                .set("fill", fill)
                .set("stroke", "none");
            self.document.append(body);
        }
        let outline = Polyline::new()
            .set("points", coords)
            .set("fill", "none")
            .set("stroke", paint.stroke.to_string())
            .set("stroke-width", paint.stroke_width)
            .set("stroke-linejoin", "round");
        self.document.append(outline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::model::Hsla;

    fn triangle() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(5.0, 8.5),
        ]
    }

    fn paint(close_path: bool) -> PolygonPaint {
        let color = Hsla::new(400.0, 50.0, 50.0, 1.0);
        PolygonPaint {
            fill: Some(color),
            stroke: color,
            stroke_width: 1.0,
            close_path,
        }
    }

    #[test]
    fn test_closed_polygon_element() {
        let mut surface = SvgSurface::new(10, 10);
        surface.draw_polygon(&triangle(), &paint(true));
        let text = surface.document().to_string();
        assert!(text.contains("<polygon"));
        assert!(!text.contains("<polyline"));
        assert!(text.contains("hsla(400, 50%, 50%, 1)"));
        assert!(text.contains("0.000,0.000 10.000,0.000 5.000,8.500"));
    }

    #[test]
    fn test_open_outline_is_polyline() {
        let mut surface = SvgSurface::new(10, 10);
        surface.fill_background(Rgba::WHITE);
        surface.draw_polygon(&triangle(), &paint(false));
        let text = surface.document().to_string();
        assert!(text.contains("<rect"));
        assert!(text.contains("rgba(255, 255, 255, 1)"));
        assert!(text.contains("<polygon"));
        assert!(text.contains("<polyline"));
    }
}
