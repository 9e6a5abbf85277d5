//! Pixel geometry primitives used by the trellis layout engine.

#![warn(missing_docs)]

/// Resize handle edge sets.
mod edges;
/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use edges::Edges;
pub use error::{Error, Result};
pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;
