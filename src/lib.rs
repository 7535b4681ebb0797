// ./src/lib.rs
pub mod color;
pub mod generator;
pub mod math;
pub mod render;

pub mod prelude {
    pub use crate::color::{ColorResolver, HslJitter, Hsla, ImageRaster, Oklab, Rgba};
    pub use crate::generator::{
        CanvasSize, GeneratePattern, GridType, LatestPattern, PatternGenerated,
        PatternGeneratorPlugin, PolygonBuffer, PolygonView, Scene, Seed, VertexLayout, generate,
    };
    pub use crate::math::prelude::*;
    pub use crate::render::{
        PixmapSurface, PolygonPaint, PolygonSurface, RasterOptions, RenderError, SvgSurface,
        rasterize,
    };
}
