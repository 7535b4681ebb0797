// src/generator/buffer.rs

//! Flacher Polygon-Buffer: zwei parallele `f32`-Arrays (Eckpunkte, Füllfarben).
//!
//! Hexagone und Dreiecke belegen eine feste Anzahl Werte pro Polygon, Voronoi-Zellen
//! stellen ihrer Koordinatenliste die Anzahl der folgenden Werte voran. Pro Polygon
//! folgen immer genau vier Farbwerte `h, s, l, a`.

use serde::{Deserialize, Serialize};

use super::scene::{CanvasSize, GridType};
use crate::color::model::Hsla;
use crate::math::error::{MathError, MathResult};
use crate::math::types::Point2D;

/// Farbwerte pro Polygon.
pub const COLOR_STRIDE: usize = 4;

/// Anordnung der Eckpunkt-Werte im Buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexLayout {
    /// Jedes Polygon belegt genau `stride` Werte (x/y-Paare).
    FixedStride { stride: usize },
    /// Jedes Polygon beginnt mit der Anzahl der folgenden Koordinatenwerte.
    LengthPrefixed,
}

impl VertexLayout {
    pub fn for_grid(grid: GridType) -> Self {
        match grid {
            GridType::Hexagons => VertexLayout::FixedStride { stride: 12 },
            GridType::Triangles => VertexLayout::FixedStride { stride: 6 },
            GridType::Voronoi => VertexLayout::LengthPrefixed,
        }
    }
}

/// Ergebnis einer Generierung. Nach dem Erzeugen unveränderlich.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonBuffer {
    #[serde(rename = "type")]
    grid: GridType,
    /// Canvas-Größe, für die die Koordinaten berechnet wurden.
    canvas: CanvasSize,
    vertices: Vec<f32>,
    fill_colors: Vec<f32>,
}

impl PolygonBuffer {
    /// Wohlgeformter, leerer Buffer.
    pub fn empty(grid: GridType, canvas: CanvasSize) -> Self {
        Self {
            grid,
            canvas,
            vertices: Vec::new(),
            fill_colors: Vec::new(),
        }
    }

    pub fn builder(grid: GridType, canvas: CanvasSize) -> PolygonBufferBuilder {
        PolygonBufferBuilder {
            buffer: Self::empty(grid, canvas),
        }
    }

    /// Übernimmt rohe Arrays (z.B. nach einem Thread-Wechsel) und prüft ihre Struktur.
    pub fn from_raw_parts(
        grid: GridType,
        canvas: CanvasSize,
        vertices: Vec<f32>,
        fill_colors: Vec<f32>,
    ) -> MathResult<Self> {
        let buffer = Self {
            grid,
            canvas,
            vertices,
            fill_colors,
        };
        buffer.check_layout()?;
        Ok(buffer)
    }

    pub fn grid_type(&self) -> GridType {
        self.grid
    }

    pub fn layout(&self) -> VertexLayout {
        VertexLayout::for_grid(self.grid)
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn fill_colors(&self) -> &[f32] {
        &self.fill_colors
    }

    pub fn polygon_count(&self) -> usize {
        self.fill_colors.len() / COLOR_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.fill_colors.is_empty()
    }

    /// Läuft beide Arrays im Gleichschritt ab.
    pub fn polygons(&self) -> PolygonIter<'_> {
        PolygonIter {
            layout: self.layout(),
            vertices: &self.vertices,
            fill_colors: &self.fill_colors,
            vertex_cursor: 0,
            color_cursor: 0,
        }
    }

    /// Prüft, dass der Durchlauf beide Arrays exakt aufbraucht.
    pub fn check_layout(&self) -> MathResult<()> {
        if self.fill_colors.len() % COLOR_STRIDE != 0 {
            return Err(MathError::GeometricFailure {
                operation: format!(
                    "fill color buffer length {} is not a multiple of {COLOR_STRIDE}",
                    self.fill_colors.len()
                ),
            });
        }

        let mut iter = self.polygons();
        let walked = iter.by_ref().count();
        if walked != self.polygon_count() || iter.vertex_cursor != self.vertices.len() {
            return Err(MathError::GeometricFailure {
                operation: format!(
                    "buffer walk consumed {walked} polygons / {} values, expected {} / {}",
                    iter.vertex_cursor,
                    self.polygon_count(),
                    self.vertices.len()
                ),
            });
        }
        Ok(())
    }
}

/// Baut einen [`PolygonBuffer`] Polygon für Polygon auf.
#[derive(Debug)]
pub struct PolygonBufferBuilder {
    buffer: PolygonBuffer,
}

impl PolygonBufferBuilder {
    pub fn push(&mut self, points: &[Point2D], color: Hsla) -> MathResult<()> {
        let coords = points.len() * 2;
        match self.buffer.layout() {
            VertexLayout::FixedStride { stride } if stride != coords => {
                return Err(MathError::GeometricFailure {
                    operation: format!("polygon with {coords} values in a stride-{stride} buffer"),
                });
            }
            VertexLayout::FixedStride { .. } => {}
            VertexLayout::LengthPrefixed => self.buffer.vertices.push(coords as f32),
        }

        for p in points {
            self.buffer.vertices.push(p.x as f32);
            self.buffer.vertices.push(p.y as f32);
        }
        self.buffer.fill_colors.extend_from_slice(&[
            color.h as f32,
            color.s as f32,
            color.l as f32,
            color.a as f32,
        ]);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.polygon_count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn finish(self) -> PolygonBuffer {
        self.buffer
    }
}

/// Ein Polygon beim Durchlauf: flache Koordinaten plus Farbe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonView<'a> {
    pub coords: &'a [f32],
    pub color: Hsla,
}

impl PolygonView<'_> {
    pub fn points(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.coords
            .chunks_exact(2)
            .map(|xy| Point2D::new(f64::from(xy[0]), f64::from(xy[1])))
    }

    pub fn vertex_count(&self) -> usize {
        self.coords.len() / 2
    }
}

/// Iterator über beide Layouts. Stoppt, sobald einer der Buffer nicht mehr reicht.
#[derive(Debug, Clone)]
pub struct PolygonIter<'a> {
    layout: VertexLayout,
    vertices: &'a [f32],
    fill_colors: &'a [f32],
    vertex_cursor: usize,
    color_cursor: usize,
}

impl PolygonIter<'_> {
    /// Anzahl bisher gelesener Eckpunkt-Werte (inklusive Längenpräfixe).
    pub fn vertices_consumed(&self) -> usize {
        self.vertex_cursor
    }
}

impl<'a> Iterator for PolygonIter<'a> {
    type Item = PolygonView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let color = self
            .fill_colors
            .get(self.color_cursor..self.color_cursor + COLOR_STRIDE)?;

        let (start, len) = match self.layout {
            VertexLayout::FixedStride { stride } => (self.vertex_cursor, stride),
            VertexLayout::LengthPrefixed => {
                let prefix = *self.vertices.get(self.vertex_cursor)?;
                if !(prefix >= 0.0) || prefix.fract() != 0.0 {
                    return None;
                }
                (self.vertex_cursor + 1, prefix as usize)
            }
        };
        let coords = self.vertices.get(start..start + len)?;

        self.vertex_cursor = start + len;
        self.color_cursor += COLOR_STRIDE;

        Some(PolygonView {
            coords,
            color: Hsla::new(
                f64::from(color[0]),
                f64::from(color[1]),
                f64::from(color[2]),
                f64::from(color[3]),
            ),
        })
    }
}
