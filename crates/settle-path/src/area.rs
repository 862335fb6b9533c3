//! Bounded-area search over a compiled tile list.

use settle_core::{PathRequester, Pos, SearchType};

use crate::map::PathMap;

/// Filters the tiles of an area by a [`SearchType`].
///
/// Stateless; kept as a type so callers hold all three searches the same
/// way.
#[derive(Clone, Copy, Debug, Default)]
pub struct InAreaFinder;

impl InAreaFinder {
    /// Create a finder.
    pub fn new() -> Self {
        Self
    }

    /// Every tile of `tiles` that fits `search_type` for `requester`, in
    /// input order.
    ///
    /// `tiles` is normally the output of
    /// [`HexSpace::compile_area`](settle_space::HexSpace::compile_area) and
    /// so already in canonical order. Blocking is left to the predicate:
    /// a tree tile is typically blocked yet still a valid `CuttableTree`.
    pub fn find<M: PathMap + ?Sized>(
        &self,
        map: &M,
        requester: &dyn PathRequester,
        tiles: &[Pos],
        search_type: SearchType,
    ) -> Vec<Pos> {
        tiles
            .iter()
            .copied()
            .filter(|&pos| map.fits_search_type(pos, search_type, requester))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_core::{PlayerId, Requester};
    use settle_space::{HexSpace, MapArea};

    struct EvenColumns {
        space: HexSpace,
    }

    impl PathMap for EvenColumns {
        fn space(&self) -> &HexSpace {
            &self.space
        }

        fn is_blocked(&self, _: &dyn PathRequester, _: Pos) -> bool {
            true
        }

        fn fits_search_type(&self, pos: Pos, _: SearchType, _: &dyn PathRequester) -> bool {
            pos.x % 2 == 0
        }
    }

    #[test]
    fn filters_disk_in_canonical_order() {
        let map = EvenColumns {
            space: HexSpace::new(10, 10).unwrap(),
        };
        let tiles = map
            .space
            .compile_area(&MapArea::disk(Pos::new(5, 5), 1))
            .unwrap();
        let found = InAreaFinder::new().find(
            &map,
            &Requester::free(PlayerId(1)),
            &tiles,
            SearchType::CuttableTree,
        );
        assert_eq!(found, vec![Pos::new(4, 4), Pos::new(4, 5), Pos::new(6, 5), Pos::new(6, 6)]);
    }

    #[test]
    fn empty_area_yields_nothing() {
        let map = EvenColumns {
            space: HexSpace::new(4, 4).unwrap(),
        };
        let found =
            InAreaFinder.find(&map, &Requester::free(PlayerId(0)), &[], SearchType::River);
        assert!(found.is_empty());
    }
}
