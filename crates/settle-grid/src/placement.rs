//! Building placement feasibility.

use settle_core::{BuildingType, PlayerId, Pos};

use crate::shared::{SharedLayers, MAX_CONSTRUCT_MARK};

/// Construction mark for placing `building` with its anchor at `anchor`.
///
/// Every footprint tile must be on the map, unblocked and owned by
/// `player`. The mark is the height spread across the footprint; spreads
/// above [`MAX_CONSTRUCT_MARK`] and failed checks yield `None`.
pub fn construction_mark(
    layers: &SharedLayers,
    anchor: Pos,
    building: BuildingType,
    player: PlayerId,
) -> Option<u8> {
    let space = layers.space();
    let mut lowest = u8::MAX;
    let mut highest = u8::MIN;
    for &(dx, dy) in building.footprint() {
        let pos = anchor.offset(dx, dy);
        if !space.contains(pos) || layers.is_blocked(pos) || layers.owner(pos) != Some(player) {
            return None;
        }
        let h = layers.height(pos);
        lowest = lowest.min(h);
        highest = highest.max(h);
    }
    let spread = highest - lowest;
    (spread <= MAX_CONSTRUCT_MARK).then_some(spread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_space::HexSpace;
    use std::sync::Arc;

    fn owned(w: u16, h: u16) -> Arc<SharedLayers> {
        let (l, _) = SharedLayers::new(HexSpace::new(w, h).unwrap());
        for pos in l.space().canonical_ordering().collect::<Vec<_>>() {
            l.set_owner(pos, Some(PlayerId(0)));
        }
        l
    }

    #[test]
    fn flat_owned_ground_marks_zero() {
        let l = owned(6, 6);
        assert_eq!(
            construction_mark(&l, Pos::new(1, 1), BuildingType::Tower, PlayerId(0)),
            Some(0)
        );
    }

    #[test]
    fn footprint_off_map_is_unplaceable() {
        let l = owned(6, 6);
        assert_eq!(
            construction_mark(&l, Pos::new(5, 5), BuildingType::Lumberjack, PlayerId(0)),
            None
        );
    }

    #[test]
    fn blocked_or_foreign_tile_is_unplaceable() {
        let l = owned(6, 6);
        l.set_blocked(Pos::new(2, 1), true);
        assert_eq!(
            construction_mark(&l, Pos::new(1, 1), BuildingType::Lumberjack, PlayerId(0)),
            None
        );
        assert_eq!(
            construction_mark(&l, Pos::new(3, 3), BuildingType::Lumberjack, PlayerId(1)),
            None
        );
    }

    #[test]
    fn mark_is_height_spread() {
        let l = owned(6, 6);
        l.set_height(Pos::new(3, 3), 4);
        l.set_height(Pos::new(2, 3), 1);
        assert_eq!(
            construction_mark(&l, Pos::new(2, 2), BuildingType::Fisher, PlayerId(0)),
            Some(4)
        );
        l.set_height(Pos::new(3, 3), MAX_CONSTRUCT_MARK + 2);
        assert_eq!(
            construction_mark(&l, Pos::new(2, 2), BuildingType::Fisher, PlayerId(0)),
            None
        );
    }
}
