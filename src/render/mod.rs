// src/render/mod.rs
pub mod pixmap;
pub mod rasterizer;
pub mod surface;
pub mod vector;

pub use pixmap::PixmapSurface;
pub use rasterizer::{RasterOptions, rasterize};
pub use surface::{PolygonPaint, PolygonSurface, RenderError, RenderResult};
pub use vector::SvgSurface;
