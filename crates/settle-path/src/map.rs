//! The map capability consumed by every search.

use settle_core::{PathRequester, Pos, SearchType};
use settle_space::{HexSpace, STEP_COST};
use smallvec::SmallVec;

/// Read-only view of a map, as seen by the searches in this crate.
///
/// Implementors provide the coordinate space plus the two ownership-aware
/// queries; geometry (bounds, neighbours, costs) defaults to the space.
pub trait PathMap {
    /// The coordinate space the map is laid out in.
    fn space(&self) -> &HexSpace;

    /// Whether `requester` may not enter `pos`.
    ///
    /// Grid implementations treat a tile as blocked when it is blocked
    /// outright, or when the requester is confined to its own territory and
    /// does not own the tile.
    fn is_blocked(&self, requester: &dyn PathRequester, pos: Pos) -> bool;

    /// Whether `pos` satisfies `search_type` for `requester`.
    fn fits_search_type(
        &self,
        pos: Pos,
        search_type: SearchType,
        requester: &dyn PathRequester,
    ) -> bool;

    /// Number of columns.
    fn width(&self) -> u16 {
        self.space().width()
    }

    /// Number of rows.
    fn height(&self) -> u16 {
        self.space().height()
    }

    /// Whether `pos` is on the map.
    fn is_in_bounds(&self, pos: Pos) -> bool {
        self.space().contains(pos)
    }

    /// In-bounds neighbours of `pos` in direction order.
    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 6]> {
        self.space().neighbours(pos)
    }

    /// Admissible estimate of the cost from `from` to `to`.
    fn heuristic_cost(&self, from: Pos, to: Pos) -> u32 {
        self.space().heuristic(from, to)
    }

    /// Cost of stepping between two adjacent tiles.
    fn cost(&self, _from: Pos, _to: Pos) -> u32 {
        STEP_COST
    }
}

/// Receives open/closed-set notifications, e.g. for a debug overlay.
pub trait SearchObserver {
    /// `pos` entered (or was re-added to) the open set.
    fn mark_open(&mut self, _pos: Pos) {}

    /// `pos` was expanded.
    fn mark_closed(&mut self, _pos: Pos) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Records every notification in order. Handy for visualising a search.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    /// Tiles reported open, in order.
    pub opened: Vec<Pos>,
    /// Tiles reported closed, in order.
    pub closed: Vec<Pos>,
}

impl SearchObserver for RecordingObserver {
    fn mark_open(&mut self, pos: Pos) {
        self.opened.push(pos);
    }

    fn mark_closed(&mut self, pos: Pos) {
        self.closed.push(pos);
    }
}
