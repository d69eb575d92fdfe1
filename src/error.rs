//! Errors of maze generation and traversal

use thiserror::Error;

/// Errors raised by the grid, the generator and the traversal engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Requested dimension was not an integer, or was out of range.
    ///
    /// Sessions treat this as a rejected request: nothing changes.
    #[error("Invalid maze dimension `{value}`, expected an integer in {min}..={max}")]
    InvalidDimension {
        value: String,
        min: usize,
        max: usize,
    },

    /// Dimension bounds that cannot produce a maze
    #[error("Invalid maze configuration: {0}")]
    InvalidConfig(String),

    /// Cell access outside of the grid
    #[error("Cell x={x}, y={y} is outside of the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Traversal requested before any maze was generated
    #[error("No maze has been generated yet")]
    EmptyGrid,
}
