// src/math/types/mod.rs
pub mod bounds;

pub use bounds::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::DVec2;
pub use spade::Point2;

// Einheitliche Typen für das gesamte Modul.
// Geometrie läuft durchgehend in f64, erst der Flat-Buffer speichert f32.
pub type Point2D = DVec2;
pub type SpadePoint = Point2<f64>;

/// Konvertiert eine Liste von Punkten in Spade-Punkte für die Triangulation.
pub fn to_spade_points(points: &[Point2D]) -> Vec<SpadePoint> {
    points.iter().map(|p| SpadePoint::new(p.x, p.y)).collect()
}

/// Konvertiert einen Spade-Punkt zurück.
pub fn from_spade_point(p: SpadePoint) -> Point2D {
    Point2D::new(p.x, p.y)
}
