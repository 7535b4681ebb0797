// src/generator/mod.rs
pub mod buffer;
pub mod engine;
pub mod plugin;
pub mod scene;

pub use buffer::{PolygonBuffer, PolygonView, VertexLayout};
pub use engine::{generate, generate_with_noise, try_generate};
pub use plugin::{
    GeneratePattern, LatestPattern, NoiseTableCache, PatternGenerated, PatternGeneratorPlugin,
};
pub use scene::{
    BaseNoise, CanvasSize, CellSettings, ColorSettings, GridSettings, GridType, NoiseSettings,
    Scene, Seed,
};
