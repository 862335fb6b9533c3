//! Blocked, marked and protected flags.

use std::sync::Arc;

use settle_core::Pos;
use settle_space::HexSpace;

use crate::shared::SharedLayers;

/// Walkability and reservation flags.
///
/// `blocked` is shared with the background tasks; `marked` (reserved for a
/// construction site) and `protected` (no planting) are sim-only.
#[derive(Debug)]
pub struct BlockedGrid {
    space: HexSpace,
    shared: Arc<SharedLayers>,
    marked: Vec<bool>,
    protected: Vec<bool>,
}

impl BlockedGrid {
    /// No tile blocked, marked or protected.
    pub fn new(shared: Arc<SharedLayers>) -> Self {
        let space = *shared.space();
        let n = space.tile_count();
        Self {
            space,
            shared,
            marked: vec![false; n],
            protected: vec![false; n],
        }
    }

    /// Whether `pos` is blocked.
    pub fn is_blocked(&self, pos: Pos) -> bool {
        self.shared.is_blocked(pos)
    }

    /// Set the blocked flag of `pos`.
    pub fn set_blocked(&mut self, pos: Pos, blocked: bool) {
        self.shared.set_blocked(pos, blocked);
    }

    /// Whether any in-bounds neighbour of `pos` is blocked.
    pub fn has_blocked_neighbour(&self, pos: Pos) -> bool {
        self.space
            .neighbours(pos)
            .into_iter()
            .any(|n| self.is_blocked(n))
    }

    /// Whether `pos` is reserved for construction.
    pub fn is_marked(&self, pos: Pos) -> bool {
        self.marked[self.space.index(pos)]
    }

    /// Set the marked flag of `pos`.
    pub fn set_marked(&mut self, pos: Pos, marked: bool) {
        let i = self.space.index(pos);
        self.marked[i] = marked;
    }

    /// Whether `pos` may not receive plantings.
    pub fn is_protected(&self, pos: Pos) -> bool {
        self.protected[self.space.index(pos)]
    }

    /// Set the protected flag of `pos`.
    pub fn set_protected(&mut self, pos: Pos, protected: bool) {
        let i = self.space.index(pos);
        self.protected[i] = protected;
    }

    /// Whether any in-bounds neighbour of `pos` is protected.
    pub fn has_protected_neighbour(&self, pos: Pos) -> bool {
        self.space
            .neighbours(pos)
            .into_iter()
            .any(|n| self.is_protected(n))
    }
}
