//! Error types for space construction and area compilation.

use settle_core::Pos;
use std::fmt;

/// Errors arising from space construction or area queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// A coordinate is outside the bounds of the space.
    CoordOutOfBounds {
        /// The offending coordinate.
        pos: Pos,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// An area shape is invalid for this space.
    InvalidArea {
        /// What went wrong.
        reason: String,
    },
    /// Attempted to construct a space with zero tiles.
    EmptySpace,
    /// A dimension exceeds the representable coordinate range.
    DimensionTooLarge {
        /// Which dimension (`"width"` or `"height"`).
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoordOutOfBounds { pos, bounds } => {
                write!(f, "coordinate {pos} out of bounds: {bounds}")
            }
            Self::InvalidArea { reason } => write!(f, "invalid area: {reason}"),
            Self::EmptySpace => write!(f, "space must have at least one tile"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum of {max}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
