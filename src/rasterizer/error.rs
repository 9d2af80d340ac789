//! Error types for draw calls

use thiserror::Error;

use super::types::Primitive;

/// Result type for rasterizer operations
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that abort a draw call. Nothing is written to the buffers when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("invalid {kind} buffer handle {id}")]
    InvalidHandle { kind: &'static str, id: usize },

    #[error("triangle {triangle} references vertex {index}, but only {count} are loaded")]
    IndexOutOfRange { triangle: usize, index: usize, count: usize },

    #[error("color buffer has {colors} entries for {positions} positions")]
    ColorCountMismatch { colors: usize, positions: usize },

    #[error("unsupported primitive: {0:?}")]
    UnsupportedPrimitive(Primitive),
}
