// src/math/error.rs
use thiserror::Error;

use crate::math::probability::noise::expression::ExpressionError;

#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Triangulation failed: {reason}")]
    TriangulationFailed { reason: String },

    #[error("Geometric calculation failed: {operation}")]
    GeometricFailure { operation: String },

    #[error("Degenerate scene: {reason}")]
    DegenerateScene { reason: String },

    #[error("Invalid noise expression: {0}")]
    InvalidExpression(#[from] ExpressionError),
}

pub type MathResult<T> = Result<T, MathError>;
