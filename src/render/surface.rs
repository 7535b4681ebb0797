// src/render/surface.rs

use thiserror::Error;

use crate::color::model::{Hsla, Rgba};
use crate::math::types::Point2D;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} surface")]
    InvalidSurface { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Wie ein einzelnes Polygon gezeichnet wird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonPaint {
    /// Füllfarbe, `None` = nur Kontur.
    pub fill: Option<Hsla>,
    pub stroke: Hsla,
    pub stroke_width: f64,
    /// Kontur vom letzten zurück zum ersten Punkt schließen.
    pub close_path: bool,
}

/// Zeichenziel des Rasterizers (Pixel oder Vektordokument).
pub trait PolygonSurface {
    /// Füllt die gesamte Fläche, vor allen Polygonen.
    fn fill_background(&mut self, color: Rgba);

    fn draw_polygon(&mut self, points: &[Point2D], paint: &PolygonPaint);
}
