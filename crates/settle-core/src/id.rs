//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies a player (territory owner).
///
/// Stored per tile in a `u8` slot; [`PlayerId::MAX`] is the largest id a
/// tile can hold because one value is reserved for "unowned".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Largest representable player id.
    pub const MAX: PlayerId = PlayerId(u8::MAX - 1);

    /// Raw slot value used to encode "no player" in per-tile storage.
    pub const NONE_SLOT: u8 = u8::MAX;

    /// Checked constructor: `None` for the reserved slot value.
    pub fn new(id: u8) -> Option<PlayerId> {
        Self::from_slot(id)
    }

    /// Whether a tile can hold this id, i.e. it is at most [`PlayerId::MAX`].
    pub fn is_valid(self) -> bool {
        self <= Self::MAX
    }

    /// Encode an optional player into its per-tile slot value.
    pub fn to_slot(player: Option<PlayerId>) -> u8 {
        match player {
            Some(p) => p.0,
            None => Self::NONE_SLOT,
        }
    }

    /// Decode a per-tile slot value.
    pub fn from_slot(slot: u8) -> Option<PlayerId> {
        if slot == Self::NONE_SLOT {
            None
        } else {
            Some(PlayerId(slot))
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for PlayerId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Identifies a partition: a maximal same-owner connected region.
///
/// Unowned tiles carry [`PartitionId::NONE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionId(pub u32);

impl PartitionId {
    /// Partition id of unowned tiles.
    pub const NONE: PartitionId = PartitionId(0);

    /// Whether this is the id of an actual partition.
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter for unique [`MovableId`] allocation.
static MOVABLE_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Handle of a movable unit.
///
/// Allocated from a monotonic atomic counter via [`MovableId::next`]; the
/// grid only stores the handle, the unit logic lives elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovableId(pub u32);

impl MovableId {
    /// Allocate a fresh, process-unique movable id. Thread-safe.
    pub fn next() -> Self {
        Self(MOVABLE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MovableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_slot_roundtrip_keeps_none_distinct() {
        assert_eq!(PlayerId::from_slot(PlayerId::to_slot(None)), None);
        assert_eq!(
            PlayerId::from_slot(PlayerId::to_slot(Some(PlayerId::MAX))),
            Some(PlayerId::MAX)
        );
        assert_ne!(PlayerId::MAX.0, PlayerId::NONE_SLOT);
    }

    #[test]
    fn reserved_slot_is_not_a_player() {
        assert_eq!(PlayerId::new(PlayerId::NONE_SLOT), None);
        assert_eq!(PlayerId::new(7), Some(PlayerId(7)));
        assert!(PlayerId::MAX.is_valid());
        assert!(!PlayerId(PlayerId::NONE_SLOT).is_valid());
    }

    #[test]
    fn movable_ids_are_unique() {
        let a = MovableId::next();
        let b = MovableId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn none_partition_is_not_some() {
        assert!(!PartitionId::NONE.is_some());
        assert!(PartitionId(3).is_some());
    }
}
