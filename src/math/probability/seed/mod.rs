pub mod resource;

pub use resource::{SeedResource, SeededRng};
