// src/render/rasterizer.rs

//! Läuft einen [`PolygonBuffer`] ab und zeichnet jedes Polygon auf eine [`PolygonSurface`].

use bevy::log::debug;

use super::surface::{PolygonPaint, PolygonSurface};
use crate::generator::buffer::PolygonBuffer;
use crate::generator::scene::{GridType, Scene};
use crate::math::types::Point2D;

/// Zeichenoptionen, die sich aus der Szene ableiten, aber pro Aufruf überschreibbar sind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub close_path: bool,
    pub fill_body: bool,
}

impl RasterOptions {
    /// Dreiecke schließen die Kontur nicht, sonst überlappen die Spitzen sichtbar.
    pub fn for_scene(scene: &Scene) -> Self {
        Self {
            close_path: scene.grid.grid_type != GridType::Triangles,
            fill_body: !scene.colors.no_fill,
        }
    }

    pub fn with_close_path(mut self, close_path: bool) -> Self {
        self.close_path = close_path;
        self
    }

    pub fn with_fill_body(mut self, fill_body: bool) -> Self {
        self.fill_body = fill_body;
        self
    }
}

/// Zeichnet `buffer` mit den Rand-Einstellungen aus `scene`. Liefert die Anzahl
/// gezeichneter Polygone; voll transparente werden übersprungen.
///
/// Wurde der Buffer für eine andere Canvas-Größe erzeugt als `scene` jetzt hat,
/// werden die Koordinaten beim Zeichnen entsprechend skaliert.
pub fn rasterize<S>(
    buffer: &PolygonBuffer,
    scene: &Scene,
    options: RasterOptions,
    surface: &mut S,
) -> usize
where
    S: PolygonSurface + ?Sized,
{
    if let Some(background) = scene.colors.background {
        surface.fill_background(background);
    }

    let scale = canvas_scale(buffer, scene);
    let border_width = scene.cell.border_width;
    let stroke_width = border_width.max(1.0);
    let border_color = (!scene.colors.use_body_color && border_width != 0.0)
        .then(|| scene.colors.border.to_hsla());

    let mut points: Vec<Point2D> = Vec::new();
    let mut drawn = 0;
    for polygon in buffer.polygons() {
        if polygon.color.is_transparent() {
            continue;
        }

        points.clear();
        points.extend(polygon.points().map(|p| p * scale));

        let paint = PolygonPaint {
            fill: options.fill_body.then_some(polygon.color),
            stroke: border_color.unwrap_or(polygon.color),
            stroke_width,
            close_path: options.close_path,
        };
        surface.draw_polygon(&points, &paint);
        drawn += 1;
    }

    debug!(
        "Rasterized {drawn} of {} polygons (scale {scale})",
        buffer.polygon_count()
    );
    drawn
}

fn canvas_scale(buffer: &PolygonBuffer, scene: &Scene) -> Point2D {
    let from = buffer.canvas_size();
    let to = scene.canvas_size;
    let axis = |target: u32, source: u32| {
        if source == 0 || target == source {
            1.0
        } else {
            f64::from(target) / f64::from(source)
        }
    };
    Point2D::new(axis(to.width, from.width), axis(to.height, from.height))
}
