//! Per-tile fields shared between the simulation thread and the
//! background maintenance tasks.
//!
//! Each field has exactly one writer. Owner, blocked and height are
//! written by the sim-side grids through crate-private setters. Border,
//! landmark and construction mark are written by one task each, through
//! the non-clonable handles returned alongside the layers by
//! [`SharedLayers::new`]. Everybody else only reads.
//!
//! All accesses are `Relaxed`: readers tolerate a stale value for one
//! convergence pass, and cross-field ordering comes from the task
//! channels, not from the atomics.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use settle_core::{PlayerId, Pos};
use settle_space::HexSpace;

/// Largest construction mark value; steeper footprints are unbuildable.
pub const MAX_CONSTRUCT_MARK: u8 = 7;

const NO_MARK: u8 = u8::MAX;

/// Atomic per-tile arrays, indexed by [`HexSpace::index`].
#[derive(Debug)]
pub struct SharedLayers {
    space: HexSpace,
    owner: Box<[AtomicU8]>,
    blocked: Box<[AtomicBool]>,
    height: Box<[AtomicU8]>,
    border: Box<[AtomicBool]>,
    landmark: Box<[AtomicU8]>,
    construct_mark: Box<[AtomicU8]>,
}

/// The three task-side writer handles, produced once per [`SharedLayers`].
#[derive(Debug)]
pub struct LayerWriters {
    /// Sole writer of the border flags.
    pub border: BorderWriter,
    /// Sole writer of the landmark values.
    pub landmark: LandmarkWriter,
    /// Sole writer of the construction marks.
    pub construction: ConstructionMarkWriter,
}

fn bytes(n: usize, value: u8) -> Box<[AtomicU8]> {
    (0..n).map(|_| AtomicU8::new(value)).collect()
}

fn flags(n: usize) -> Box<[AtomicBool]> {
    (0..n).map(|_| AtomicBool::new(false)).collect()
}

impl SharedLayers {
    /// Allocate all layers for `space`: unowned, unblocked, flat, no
    /// derived state. Returns the layers and their task-side writers.
    pub fn new(space: HexSpace) -> (Arc<SharedLayers>, LayerWriters) {
        let n = space.tile_count();
        let layers = Arc::new(SharedLayers {
            space,
            owner: bytes(n, PlayerId::NONE_SLOT),
            blocked: flags(n),
            height: bytes(n, 0),
            border: flags(n),
            landmark: bytes(n, PlayerId::NONE_SLOT),
            construct_mark: bytes(n, NO_MARK),
        });
        let writers = LayerWriters {
            border: BorderWriter {
                layers: Arc::clone(&layers),
            },
            landmark: LandmarkWriter {
                layers: Arc::clone(&layers),
            },
            construction: ConstructionMarkWriter {
                layers: Arc::clone(&layers),
            },
        };
        (layers, writers)
    }

    /// The map the layers cover.
    pub fn space(&self) -> &HexSpace {
        &self.space
    }

    /// Owner of `pos`, `None` if unowned.
    pub fn owner(&self, pos: Pos) -> Option<PlayerId> {
        PlayerId::from_slot(self.owner[self.space.index(pos)].load(Ordering::Relaxed))
    }

    /// Whether `pos` is blocked.
    pub fn is_blocked(&self, pos: Pos) -> bool {
        self.blocked[self.space.index(pos)].load(Ordering::Relaxed)
    }

    /// Terrain height of `pos`.
    pub fn height(&self, pos: Pos) -> u8 {
        self.height[self.space.index(pos)].load(Ordering::Relaxed)
    }

    /// Border flag of `pos`, as last written by the border task.
    pub fn is_border(&self, pos: Pos) -> bool {
        self.border[self.space.index(pos)].load(Ordering::Relaxed)
    }

    /// Player enclosing `pos`, as last written by the landmark task.
    pub fn landmark(&self, pos: Pos) -> Option<PlayerId> {
        PlayerId::from_slot(self.landmark[self.space.index(pos)].load(Ordering::Relaxed))
    }

    /// Construction mark of `pos`, as last written by the construction task.
    pub fn construction_mark(&self, pos: Pos) -> Option<u8> {
        let raw = self.construct_mark[self.space.index(pos)].load(Ordering::Relaxed);
        (raw != NO_MARK).then_some(raw)
    }

    /// Whether `pos` should be a border tile given the current owners.
    pub fn compute_border(&self, pos: Pos) -> bool {
        let own = self.owner(pos);
        self.space
            .neighbours(pos)
            .into_iter()
            .any(|n| self.owner(n) != own)
    }

    pub(crate) fn set_owner(&self, pos: Pos, owner: Option<PlayerId>) {
        self.owner[self.space.index(pos)].store(PlayerId::to_slot(owner), Ordering::Relaxed);
    }

    pub(crate) fn set_blocked(&self, pos: Pos, blocked: bool) {
        self.blocked[self.space.index(pos)].store(blocked, Ordering::Relaxed);
    }

    pub(crate) fn set_height(&self, pos: Pos, height: u8) {
        self.height[self.space.index(pos)].store(height, Ordering::Relaxed);
    }
}

/// Write access to the border flags. Not `Clone`: one per layer set.
#[derive(Debug)]
pub struct BorderWriter {
    layers: Arc<SharedLayers>,
}

impl BorderWriter {
    /// Read access to all layers.
    pub fn layers(&self) -> &SharedLayers {
        &self.layers
    }

    /// Recompute the border flag of `pos` and its neighbours.
    pub fn refresh(&self, pos: Pos) {
        self.refresh_tile(pos);
        for n in self.layers.space.neighbours(pos) {
            self.refresh_tile(n);
        }
    }

    /// Recompute every border flag from scratch.
    pub fn refresh_all(&self) {
        for pos in self.layers.space.canonical_ordering() {
            self.refresh_tile(pos);
        }
    }

    fn refresh_tile(&self, pos: Pos) {
        let value = self.layers.compute_border(pos);
        self.layers.border[self.layers.space.index(pos)].store(value, Ordering::Relaxed);
    }
}

/// Write access to the landmark values. Not `Clone`.
#[derive(Debug)]
pub struct LandmarkWriter {
    layers: Arc<SharedLayers>,
}

impl LandmarkWriter {
    /// Read access to all layers.
    pub fn layers(&self) -> &SharedLayers {
        &self.layers
    }

    /// Set or clear the enclosing player of `pos`.
    pub fn set_landmark(&self, pos: Pos, player: Option<PlayerId>) {
        self.layers.landmark[self.layers.space.index(pos)]
            .store(PlayerId::to_slot(player), Ordering::Relaxed);
    }
}

/// Write access to the construction marks. Not `Clone`.
#[derive(Debug)]
pub struct ConstructionMarkWriter {
    layers: Arc<SharedLayers>,
}

impl ConstructionMarkWriter {
    /// Read access to all layers.
    pub fn layers(&self) -> &SharedLayers {
        &self.layers
    }

    /// Set or clear the construction mark of `pos`.
    ///
    /// Values above [`MAX_CONSTRUCT_MARK`] are stored as "none".
    pub fn set_mark(&self, pos: Pos, mark: Option<u8>) {
        let raw = match mark {
            Some(v) if v <= MAX_CONSTRUCT_MARK => v,
            _ => NO_MARK,
        };
        self.layers.construct_mark[self.layers.space.index(pos)].store(raw, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers(w: u16, h: u16) -> (Arc<SharedLayers>, LayerWriters) {
        SharedLayers::new(HexSpace::new(w, h).unwrap())
    }

    #[test]
    fn fresh_layers_are_empty() {
        let (l, _) = layers(3, 3);
        let p = Pos::new(1, 1);
        assert_eq!(l.owner(p), None);
        assert!(!l.is_blocked(p));
        assert!(!l.is_border(p));
        assert_eq!(l.landmark(p), None);
        assert_eq!(l.construction_mark(p), None);
    }

    #[test]
    fn border_refresh_marks_tile_and_ring() {
        let (l, w) = layers(7, 7);
        for pos in l.space().canonical_ordering().collect::<Vec<_>>() {
            l.set_owner(pos, Some(PlayerId(0)));
        }
        let c = Pos::new(3, 3);
        l.set_owner(c, Some(PlayerId(1)));
        w.border.refresh(c);
        let borders: Vec<Pos> = l
            .space()
            .canonical_ordering()
            .filter(|p| l.is_border(*p))
            .collect();
        let mut expected = vec![c];
        expected.extend(l.space().neighbours(c));
        expected.sort_by_key(|p| (p.y, p.x));
        assert_eq!(borders, expected);
    }

    #[test]
    fn oversized_mark_reads_as_none() {
        let (l, w) = layers(2, 2);
        w.construction.set_mark(Pos::new(0, 0), Some(MAX_CONSTRUCT_MARK));
        w.construction.set_mark(Pos::new(1, 0), Some(MAX_CONSTRUCT_MARK + 1));
        assert_eq!(l.construction_mark(Pos::new(0, 0)), Some(MAX_CONSTRUCT_MARK));
        assert_eq!(l.construction_mark(Pos::new(1, 0)), None);
    }

    #[test]
    fn landmark_roundtrip() {
        let (l, w) = layers(2, 2);
        w.landmark.set_landmark(Pos::new(1, 1), Some(PlayerId(4)));
        assert_eq!(l.landmark(Pos::new(1, 1)), Some(PlayerId(4)));
        w.landmark.set_landmark(Pos::new(1, 1), None);
        assert_eq!(l.landmark(Pos::new(1, 1)), None);
    }
}
