//! Single-target A* search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use settle_core::{PathRequester, Pos};

use crate::buffers::{SearchBuffers, NO_PARENT};
use crate::map::{NoopObserver, PathMap, SearchObserver};
use crate::path::Path;

/// Open-set key. Ordering is the frontier tie-break: lowest `f`, then
/// lowest `h`, then lowest `y`, then lowest `x`.
type OpenKey = Reverse<(u32, u32, i32, i32)>;

/// Reusable A* searcher.
///
/// Scratch buffers are sized on first use and reallocated only when the
/// map size changes, so repeated searches on one map allocate nothing but
/// the open heap and the result path.
///
/// # Examples
///
/// ```ignore
/// let mut astar = AStar::new();
/// let path = astar.find(&map, &requester, Pos::new(0, 0), Pos::new(9, 9));
/// ```
#[derive(Debug, Default)]
pub struct AStar {
    buffers: SearchBuffers,
    open: BinaryHeap<OpenKey>,
}

impl AStar {
    /// Create a searcher with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a path from `from` to `to`.
    ///
    /// Returns `None` if `to` is blocked for `requester` or unreachable.
    /// The source tile itself may be blocked (a unit standing in a
    /// building can still walk out).
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is off the map.
    pub fn find<M: PathMap + ?Sized>(
        &mut self,
        map: &M,
        requester: &dyn PathRequester,
        from: Pos,
        to: Pos,
    ) -> Option<Path> {
        self.find_observed(map, requester, from, to, &mut NoopObserver)
    }

    /// As [`find`](Self::find), reporting open/closed events to `observer`.
    pub fn find_observed<M: PathMap + ?Sized>(
        &mut self,
        map: &M,
        requester: &dyn PathRequester,
        from: Pos,
        to: Pos,
        observer: &mut dyn SearchObserver,
    ) -> Option<Path> {
        let space = map.space();
        let start = space.index(from);
        let target = space.index(to);

        if map.is_blocked(requester, to) {
            return None;
        }
        if start == target {
            return Some(Path::new(vec![from]));
        }

        self.buffers.begin(space.tile_count());
        self.open.clear();

        let h0 = map.heuristic_cost(from, to);
        self.buffers.relax(start, 0, NO_PARENT);
        self.open.push(Reverse((h0, h0, from.y, from.x)));
        observer.mark_open(from);

        while let Some(Reverse((f, h, y, x))) = self.open.pop() {
            let pos = Pos::new(x, y);
            let index = space.index(pos);
            if self.buffers.is_closed(index) {
                continue;
            }
            let g = match self.buffers.cost(index) {
                Some(g) if g + h == f => g,
                // Superseded by a cheaper entry for the same tile.
                _ => continue,
            };
            if index == target {
                return Some(self.reconstruct(map, target));
            }
            self.buffers.close(index);
            observer.mark_closed(pos);

            for next in map.neighbours(pos) {
                let next_index = space.index(next);
                if self.buffers.is_closed(next_index) || map.is_blocked(requester, next) {
                    continue;
                }
                let next_g = g + map.cost(pos, next);
                if self.buffers.cost(next_index).is_some_and(|known| known <= next_g) {
                    continue;
                }
                self.buffers.relax(next_index, next_g, index as u32);
                let next_h = map.heuristic_cost(next, to);
                self.open.push(Reverse((next_g + next_h, next_h, next.y, next.x)));
                observer.mark_open(next);
            }
        }
        None
    }

    fn reconstruct<M: PathMap + ?Sized>(&self, map: &M, target: usize) -> Path {
        let space = map.space();
        let mut tiles = Vec::new();
        let mut cursor = target as u32;
        while cursor != NO_PARENT {
            tiles.push(space.pos_of(cursor as usize));
            cursor = self.buffers.parent(cursor as usize);
        }
        tiles.reverse();
        Path::new(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_core::{PlayerId, Requester, SearchType};
    use settle_space::HexSpace;
    use std::collections::HashSet;

    struct Walls {
        space: HexSpace,
        blocked: HashSet<Pos>,
    }

    impl Walls {
        fn open(w: u16, h: u16) -> Self {
            Self {
                space: HexSpace::new(w, h).unwrap(),
                blocked: HashSet::new(),
            }
        }

        fn with(mut self, tiles: &[(i32, i32)]) -> Self {
            self.blocked.extend(tiles.iter().map(|&t| Pos::from(t)));
            self
        }
    }

    impl PathMap for Walls {
        fn space(&self) -> &HexSpace {
            &self.space
        }

        fn is_blocked(&self, _: &dyn PathRequester, pos: Pos) -> bool {
            self.blocked.contains(&pos)
        }

        fn fits_search_type(&self, _: Pos, _: SearchType, _: &dyn PathRequester) -> bool {
            false
        }
    }

    fn req() -> Requester {
        Requester::free(PlayerId(0))
    }

    fn assert_valid(path: &Path, map: &Walls) {
        assert!(path.directions().is_some(), "non-adjacent step in {path:?}");
        for t in path {
            assert!(!map.blocked.contains(t) || *t == path.source(), "blocked {t}");
        }
    }

    #[test]
    fn diagonal_path_on_open_map() {
        let map = Walls::open(10, 10);
        let path = AStar::new()
            .find(&map, &req(), Pos::new(0, 0), Pos::new(9, 9))
            .unwrap();
        assert_eq!(path.len(), 10);
        assert_eq!(path.source(), Pos::new(0, 0));
        assert_eq!(path.destination(), Pos::new(9, 9));
        assert_valid(&path, &map);
    }

    #[test]
    fn detours_around_blocked_tile() {
        let map = Walls::open(10, 10).with(&[(5, 5)]);
        let path = AStar::new()
            .find(&map, &req(), Pos::new(0, 5), Pos::new(9, 5))
            .unwrap();
        assert!(!path.tiles().contains(&Pos::new(5, 5)));
        assert_eq!(path.step_count(), 10);
        assert_valid(&path, &map);
    }

    #[test]
    fn blocked_target_is_none() {
        let map = Walls::open(5, 5).with(&[(4, 4)]);
        assert!(AStar::new()
            .find(&map, &req(), Pos::new(0, 0), Pos::new(4, 4))
            .is_none());
    }

    #[test]
    fn walled_off_target_is_none() {
        // Ring around (2,2).
        let map = Walls::open(5, 5).with(&[(2, 1), (3, 2), (3, 3), (2, 3), (1, 2), (1, 1)]);
        assert!(AStar::new()
            .find(&map, &req(), Pos::new(0, 4), Pos::new(2, 2))
            .is_none());
    }

    #[test]
    fn same_tile_is_single_tile_path() {
        let map = Walls::open(3, 3);
        let path = AStar::new()
            .find(&map, &req(), Pos::new(1, 1), Pos::new(1, 1))
            .unwrap();
        assert_eq!(path.tiles(), &[Pos::new(1, 1)]);
    }

    #[test]
    fn blocked_source_may_leave() {
        let map = Walls::open(4, 1).with(&[(0, 0)]);
        let path = AStar::new()
            .find(&map, &req(), Pos::new(0, 0), Pos::new(3, 0))
            .unwrap();
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let map = Walls::open(12, 12).with(&[(4, 4), (5, 4), (6, 6)]);
        let mut astar = AStar::new();
        let a = astar.find(&map, &req(), Pos::new(0, 0), Pos::new(11, 8));
        let b = astar.find(&map, &req(), Pos::new(0, 0), Pos::new(11, 8));
        assert_eq!(a, b);
        // A fresh searcher agrees with a reused one.
        assert_eq!(a, AStar::new().find(&map, &req(), Pos::new(0, 0), Pos::new(11, 8)));
    }

    #[test]
    fn buffers_follow_map_size() {
        let mut astar = AStar::new();
        let small = Walls::open(3, 3);
        let large = Walls::open(8, 8);
        assert!(astar.find(&small, &req(), Pos::new(0, 0), Pos::new(2, 2)).is_some());
        assert!(astar.find(&large, &req(), Pos::new(0, 0), Pos::new(7, 7)).is_some());
        assert_eq!(astar.buffers.capacity(), 64);
    }

    #[test]
    fn observer_sees_source_first() {
        let map = Walls::open(6, 6);
        let mut rec = crate::RecordingObserver::default();
        AStar::new()
            .find_observed(&map, &req(), Pos::new(0, 0), Pos::new(5, 0), &mut rec)
            .unwrap();
        assert_eq!(rec.opened[0], Pos::new(0, 0));
        assert_eq!(rec.closed[0], Pos::new(0, 0));
        assert!(!rec.closed.contains(&Pos::new(5, 0)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn off_map_endpoint_panics() {
        let map = Walls::open(3, 3);
        AStar::new().find(&map, &req(), Pos::new(0, 0), Pos::new(3, 3));
    }
}
