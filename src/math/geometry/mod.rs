// src/math/geometry/mod.rs
pub mod clipping;
pub mod hexagon;
pub mod lattice;
pub mod tessellation;

pub use clipping::clip_polygon_to_bounds;
pub use hexagon::{Axial, HexCell, HexGrid, HexLayout, HexOrientation};
pub use lattice::JitteredLattice;
pub use tessellation::{Tessellation, VoronoiCell, vertex_mean};
