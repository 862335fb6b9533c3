//! Area shapes, compiled to tile lists by [`HexSpace::compile_area`](crate::HexSpace::compile_area).

use settle_core::Pos;

/// Specifies a set of tiles on the map.
///
/// Used by in-area searches, viewport updates and territory occupation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapArea {
    /// Every tile of the map.
    All,
    /// Hex disk: all tiles within `radius` hex distance of `center`.
    Disk {
        /// Centre tile. Must be on the map.
        center: Pos,
        /// Maximum hex distance from the centre (inclusive).
        radius: u32,
    },
    /// Axis-aligned rectangle, clipped to the map.
    ///
    /// May hang over the map edge (screen viewports routinely do) but
    /// `min` must not exceed `max` on either axis.
    Rect {
        /// Minimum corner (inclusive).
        min: Pos,
        /// Maximum corner (inclusive).
        max: Pos,
    },
    /// Explicit list of tiles. Duplicates are removed on compilation.
    Coords(Vec<Pos>),
}

impl MapArea {
    /// Hex disk around `center`.
    pub fn disk(center: Pos, radius: u32) -> Self {
        MapArea::Disk { center, radius }
    }

    /// Rectangle spanning `min..=max`.
    pub fn rect(min: Pos, max: Pos) -> Self {
        MapArea::Rect { min, max }
    }
}
