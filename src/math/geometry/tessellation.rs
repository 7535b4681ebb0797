// src/math/geometry/tessellation.rs

use spade::handles::{DirectedEdgeHandle, VertexHandle};
use spade::{DelaunayTriangulation, Triangulation};

use super::clipping::{clip_polygon_to_bounds, dedup_ring};
use crate::math::{error::*, types::*};

type Edge<'a> = DirectedEdgeHandle<'a, SpadePoint, (), (), ()>;
type Vertex<'a> = VertexHandle<'a, SpadePoint, (), (), ()>;

/// Delaunay-Triangulation einer Punktmenge und das dazu duale Voronoi-Diagramm.
pub struct Tessellation {
    triangulation: DelaunayTriangulation<SpadePoint>,
}

/// Eine geclippte Voronoi-Zelle.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    pub generator: Point2D,
    pub vertices: Vec<Point2D>,
}

impl VoronoiCell {
    /// Arithmetisches Mittel der Eckpunkte.
    pub fn centroid(&self) -> Point2D {
        vertex_mean(&self.vertices)
    }
}

impl Tessellation {
    /// Trianguliert die Punkte. Die Reihenfolge der Eingabe bleibt für die
    /// Iteration über Vertices erhalten, Duplikate werden zusammengefasst.
    pub fn new(points: &[Point2D]) -> MathResult<Self> {
        if points.len() < 3 {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: points.len(),
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(MathError::TriangulationFailed {
                reason: "non-finite input point".to_string(),
            });
        }

        let triangulation = DelaunayTriangulation::<SpadePoint>::bulk_load_stable(
            to_spade_points(points),
        )
        .map_err(|e| MathError::TriangulationFailed {
            reason: format!("{e:?}"),
        })?;

        Ok(Self { triangulation })
    }

    pub fn num_vertices(&self) -> usize {
        self.triangulation.num_vertices()
    }

    /// Alle inneren Dreiecke, jeweils gegen den Uhrzeigersinn.
    pub fn triangles(&self) -> Vec<[Point2D; 3]> {
        self.triangulation
            .inner_faces()
            .map(|face| face.positions().map(from_spade_point))
            .collect()
    }

    /// Voronoi-Zellen aller Generatoren, geclippt auf `clip`.
    ///
    /// Zellen von Hüllpunkten sind unbeschränkt. Für jede Hüllkante wird vom
    /// Umkreismittelpunkt des angrenzenden Dreiecks ein Strahl nach außen verlängert,
    /// bis er sicher außerhalb von `clip` liegt, und erst dann geclippt.
    /// Zellen mit weniger als drei Ecken nach dem Clipping entfallen.
    pub fn voronoi_cells(&self, clip: &Bounds2D) -> Vec<VoronoiCell> {
        let far_distance = clip.size().length() * 4.0 + 1.0;
        let mut cells = Vec::with_capacity(self.triangulation.num_vertices());

        for vertex in self.triangulation.vertices() {
            let generator = from_spade_point(vertex.position());
            let mut ring = self.cell_ring(vertex, clip, far_distance);
            if ring.len() < 3 {
                continue;
            }

            ring.sort_by(|a, b| {
                let angle_a = (a.y - generator.y).atan2(a.x - generator.x);
                let angle_b = (b.y - generator.y).atan2(b.x - generator.x);
                angle_a.total_cmp(&angle_b)
            });
            dedup_ring(&mut ring);

            let vertices = clip_polygon_to_bounds(&ring, clip);
            if vertices.len() >= 3 {
                cells.push(VoronoiCell {
                    generator,
                    vertices,
                });
            }
        }

        cells
    }

    /// Umkreismittelpunkte der angrenzenden Dreiecke plus Fernpunkte auf Hüllkanten.
    fn cell_ring(&self, vertex: Vertex<'_>, clip: &Bounds2D, far_distance: f64) -> Vec<Point2D> {
        let mut ring = Vec::new();
        for edge in vertex.out_edges() {
            if let Some(face) = edge.face().as_inner() {
                ring.push(from_spade_point(face.circumcenter()));
            }
            if let Some(far) = Self::hull_ray_point(edge, clip, far_distance) {
                ring.push(far);
            }
        }
        ring
    }

    /// Fernpunkt des unbeschränkten Voronoi-Strahls einer Hüllkante, sonst `None`.
    fn hull_ray_point(edge: Edge<'_>, clip: &Bounds2D, far_distance: f64) -> Option<Point2D> {
        let left = edge.face();
        let right = edge.rev().face();
        let inner = match (left.is_outer(), right.is_outer()) {
            (true, false) => right.as_inner()?,
            (false, true) => left.as_inner()?,
            _ => return None,
        };

        let a = from_spade_point(edge.from().position());
        let b = from_spade_point(edge.to().position());
        let opposite = inner
            .positions()
            .map(from_spade_point)
            .into_iter()
            .find(|p| *p != a && *p != b)?;

        let mid = (a + b) * 0.5;
        let mut normal = (b - a).perp().normalize_or_zero();
        if normal == Point2D::ZERO {
            return None;
        }
        if normal.dot(opposite - mid) > 0.0 {
            normal = -normal;
        }

        let center = from_spade_point(inner.circumcenter());
        let reach = far_distance + center.distance(clip.center());
        Some(center + normal * reach)
    }
}

/// Arithmetisches Mittel einer Punktliste, `ZERO` für leere Listen.
pub fn vertex_mean(points: &[Point2D]) -> Point2D {
    if points.is_empty() {
        return Point2D::ZERO;
    }
    points.iter().copied().sum::<Point2D>() / points.len() as f64
}
