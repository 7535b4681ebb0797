// src/math/geometry/lattice.rs

//! Regelmäßiges Punktgitter mit zufälliger Verschiebung, Eingabe für Delaunay/Voronoi.

use crate::math::error::{MathError, MathResult};
use crate::math::probability::seed::SeededRng;
use crate::math::types::{Bounds2D, Point2D};

/// `(columns + 1) x (rows + 1)` Gitterpunkte im Abstand `spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitteredLattice {
    pub spacing: f64,
    pub columns: usize,
    pub rows: usize,
    /// Verschiebung in Prozent einer halben Zellgröße (0..=100).
    pub variance: f64,
}

impl JitteredLattice {
    pub fn new(spacing: f64, columns: usize, rows: usize, variance: f64) -> Self {
        Self {
            spacing,
            columns,
            rows,
            variance,
        }
    }

    /// Maximale Verschiebung eines Punktes pro Achse in Pixeln.
    pub fn jitter_amplitude(&self) -> f64 {
        self.variance.max(0.0) / 100.0 * self.spacing / 2.0
    }

    /// `None`, wenn die Punktzahl nicht in `usize` passt.
    pub fn point_count(&self) -> Option<usize> {
        self.columns
            .checked_add(1)?
            .checked_mul(self.rows.checked_add(1)?)
    }

    /// Erzeugt die Punkte zeilenweise. Pro Punkt wird zuerst x, dann y gewürfelt.
    /// Bei `variance > 0` kommen die vier Ecken von `canvas` dazu, damit die
    /// Triangulation die Canvas trotz Verschiebung vollständig abdeckt.
    pub fn points(&self, rng: &mut SeededRng, canvas: &Bounds2D) -> MathResult<Vec<Point2D>> {
        let count = self
            .point_count()
            .and_then(|n| n.checked_add(4))
            .ok_or_else(|| MathError::InvalidConfiguration {
                message: format!("Lattice {}x{} is too large", self.columns, self.rows),
            })?;
        let amplitude = self.jitter_amplitude();
        let mut points = Vec::with_capacity(count);

        for row in 0..=self.rows {
            for col in 0..=self.columns {
                let dx = rng.rnd(amplitude);
                let dy = rng.rnd(amplitude);
                points.push(Point2D::new(
                    col as f64 * self.spacing + dx,
                    row as f64 * self.spacing + dy,
                ));
            }
        }

        if self.variance > 0.0 {
            points.extend(canvas.corners());
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::probability::seed::SeedResource;

    #[test]
    fn test_zero_variance_is_regular() {
        let lattice = JitteredLattice::new(10.0, 3, 2, 0.0);
        let mut rng = SeedResource::from_seed(1).stream("lattice");
        let points = lattice.points(&mut rng, &Bounds2D::from_size(30.0, 20.0)).unwrap();
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], Point2D::new(0.0, 0.0));
        assert_eq!(points[5], Point2D::new(10.0, 10.0));
        assert_eq!(points[11], Point2D::new(30.0, 20.0));
    }

    #[test]
    fn test_jitter_stays_within_amplitude() {
        let lattice = JitteredLattice::new(20.0, 5, 5, 50.0);
        assert_eq!(lattice.jitter_amplitude(), 5.0);
        let mut rng = SeedResource::from_seed(7).stream("lattice");
        let points = lattice.points(&mut rng, &Bounds2D::from_size(100.0, 100.0)).unwrap();
        assert_eq!(points.len(), lattice.point_count().unwrap() + 4);
        for (i, p) in points.iter().take(lattice.point_count().unwrap()).enumerate() {
            let expected = Point2D::new((i % 6) as f64 * 20.0, (i / 6) as f64 * 20.0);
            assert!((p.x - expected.x).abs() <= 5.0);
            assert!((p.y - expected.y).abs() <= 5.0);
        }
    }

    #[test]
    fn test_same_stream_same_points() {
        let lattice = JitteredLattice::new(8.0, 4, 4, 80.0);
        let canvas = Bounds2D::from_size(32.0, 32.0);
        let a = lattice.points(&mut SeedResource::from_seed(3).stream("x"), &canvas);
        let b = lattice.points(&mut SeedResource::from_seed(3).stream("x"), &canvas);
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_oversized_lattice_is_rejected() {
        let lattice = JitteredLattice::new(1.0, usize::MAX, 2, 0.0);
        assert_eq!(lattice.point_count(), None);
        let mut rng = SeedResource::from_seed(1).stream("lattice");
        assert!(lattice.points(&mut rng, &Bounds2D::from_size(1.0, 1.0)).is_err());
    }
}
