pub mod expression;
pub mod functions;
pub mod simplex;
pub mod source;

pub use expression::{CompiledExpression, ExpressionError};
pub use functions::BuiltinNoise;
pub use simplex::SimplexNoise;
pub use source::{NoiseField, NoiseSource};
