// src/color/mod.rs
pub mod model;
pub mod raster;
pub mod resolver;

pub use model::{Hsla, Oklab, Rgba};
pub use raster::ImageRaster;
pub use resolver::{ColorResolver, HslJitter};
