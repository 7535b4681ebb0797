// src/math/geometry/clipping.rs

use crate::math::types::{Bounds2D, Point2D};
use crate::math::utils::constants::EPSILON;

/// Eine der vier Halbebenen eines achsenparallelen Rechtecks.
#[derive(Debug, Clone, Copy)]
enum ClipEdge {
    Left(f64),
    Right(f64),
    Top(f64),
    Bottom(f64),
}

impl ClipEdge {
    fn is_inside(self, p: Point2D) -> bool {
        match self {
            ClipEdge::Left(x) => p.x >= x,
            ClipEdge::Right(x) => p.x <= x,
            ClipEdge::Top(y) => p.y >= y,
            ClipEdge::Bottom(y) => p.y <= y,
        }
    }

    /// Schnittpunkt der Strecke `s -> e` mit der Kante. Nur aufrufen, wenn die
    /// Endpunkte auf verschiedenen Seiten liegen.
    fn intersect(self, s: Point2D, e: Point2D) -> Point2D {
        let d = e - s;
        match self {
            ClipEdge::Left(x) | ClipEdge::Right(x) => {
                let t = if d.x.abs() < EPSILON { 0.0 } else { (x - s.x) / d.x };
                Point2D::new(x, s.y + d.y * t)
            }
            ClipEdge::Top(y) | ClipEdge::Bottom(y) => {
                let t = if d.y.abs() < EPSILON { 0.0 } else { (y - s.y) / d.y };
                Point2D::new(s.x + d.x * t, y)
            }
        }
    }
}

/// Sutherland-Hodgman-Clipping eines Polygons gegen ein Rechteck.
///
/// Das Eingabepolygon muss konvex sein oder zumindest keine Selbstüberschneidungen
/// haben. Liegt das Polygon vollständig außerhalb, ist das Ergebnis leer.
pub fn clip_polygon_to_bounds(vertices: &[Point2D], bounds: &Bounds2D) -> Vec<Point2D> {
    let edges = [
        ClipEdge::Left(bounds.min.x),
        ClipEdge::Right(bounds.max.x),
        ClipEdge::Top(bounds.min.y),
        ClipEdge::Bottom(bounds.max.y),
    ];

    let mut clipped = vertices.to_vec();
    for edge in edges {
        if clipped.is_empty() {
            break;
        }
        let input = std::mem::take(&mut clipped);
        let mut s = input[input.len() - 1];
        for e in input {
            if edge.is_inside(e) {
                if !edge.is_inside(s) {
                    clipped.push(edge.intersect(s, e));
                }
                clipped.push(e);
            } else if edge.is_inside(s) {
                clipped.push(edge.intersect(s, e));
            }
            s = e;
        }
    }

    dedup_ring(&mut clipped);
    clipped
}

/// Entfernt aufeinanderfolgende Duplikate, inklusive Ende/Anfang des Rings.
pub fn dedup_ring(points: &mut Vec<Point2D>) {
    points.dedup_by(|a, b| a.distance_squared(*b) < EPSILON);
    while points.len() > 1 {
        let (first, last) = (points[0], points[points.len() - 1]);
        if first.distance_squared(last) < EPSILON {
            points.pop();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Bounds2D {
        Bounds2D::from_size(1.0, 1.0)
    }

    fn area(points: &[Point2D]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| {
                let (a, b) = (points[i], points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            .abs()
            / 2.0
    }

    #[test]
    fn test_inside_polygon_unchanged() {
        let square = vec![
            Point2D::new(0.25, 0.25),
            Point2D::new(0.75, 0.25),
            Point2D::new(0.75, 0.75),
            Point2D::new(0.25, 0.75),
        ];
        assert_eq!(clip_polygon_to_bounds(&square, &unit_box()), square);
    }

    #[test]
    fn test_overlapping_square_is_cut() {
        let square = vec![
            Point2D::new(0.5, 0.5),
            Point2D::new(1.5, 0.5),
            Point2D::new(1.5, 1.5),
            Point2D::new(0.5, 1.5),
        ];
        let clipped = clip_polygon_to_bounds(&square, &unit_box());
        assert_eq!(clipped.len(), 4);
        assert_relative_eq!(area(&clipped), 0.25, epsilon = 1e-12);
        for p in clipped {
            assert!(unit_box().contains_point(p));
        }
    }

    #[test]
    fn test_enclosing_polygon_becomes_bounds() {
        let huge = vec![
            Point2D::new(-10.0, -10.0),
            Point2D::new(10.0, -10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(-10.0, 10.0),
        ];
        let clipped = clip_polygon_to_bounds(&huge, &unit_box());
        assert_eq!(clipped.len(), 4);
        assert_relative_eq!(area(&clipped), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_outside_polygon_vanishes() {
        let tri = vec![
            Point2D::new(2.0, 2.0),
            Point2D::new(3.0, 2.0),
            Point2D::new(2.5, 3.0),
        ];
        assert!(clip_polygon_to_bounds(&tri, &unit_box()).is_empty());
    }

    #[test]
    fn test_dedup_ring_closes_loop() {
        let mut pts = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 0.0),
        ];
        dedup_ring(&mut pts);
        assert_eq!(pts.len(), 3);
    }
}
