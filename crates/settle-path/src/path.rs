//! Search results.

use settle_core::{Direction, Pos};

/// Ordered tiles from source to destination, both inclusive.
///
/// Never empty: a search from a tile to itself yields a one-tile path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    tiles: Vec<Pos>,
}

impl Path {
    /// Wrap an ordered tile list.
    ///
    /// # Panics
    ///
    /// Panics if `tiles` is empty.
    pub fn new(tiles: Vec<Pos>) -> Self {
        assert!(!tiles.is_empty(), "a path holds at least its source tile");
        Self { tiles }
    }

    /// First tile.
    pub fn source(&self) -> Pos {
        self.tiles[0]
    }

    /// Last tile.
    pub fn destination(&self) -> Pos {
        self.tiles[self.tiles.len() - 1]
    }

    /// Number of tiles, including both ends.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of steps (`len() - 1`).
    pub fn step_count(&self) -> usize {
        self.tiles.len() - 1
    }

    /// The tiles in walking order.
    pub fn tiles(&self) -> &[Pos] {
        &self.tiles
    }

    /// Iterate the tiles in walking order.
    pub fn iter(&self) -> impl Iterator<Item = &Pos> {
        self.tiles.iter()
    }

    /// The direction of every step, or `None` if two consecutive tiles are
    /// not neighbours.
    pub fn directions(&self) -> Option<Vec<Direction>> {
        self.tiles
            .windows(2)
            .map(|w| w[0].direction_to(w[1]))
            .collect()
    }

    /// Consume into the tile list.
    pub fn into_tiles(self) -> Vec<Pos> {
        self.tiles
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Pos;
    type IntoIter = std::slice::Iter<'a, Pos>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
