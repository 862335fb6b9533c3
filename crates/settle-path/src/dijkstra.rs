//! Nearest-match search: the closest tile satisfying a [`SearchType`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use settle_core::{PathRequester, Pos, SearchType};

use crate::buffers::{SearchBuffers, NO_PARENT};
use crate::map::{NoopObserver, PathMap, SearchObserver};

/// Open-set key: lowest cost, then lowest `y`, then lowest `x`.
type OpenKey = Reverse<(u32, i32, i32)>;

/// Reusable uniform-cost searcher for "nearest tile that fits".
///
/// Expansion never leaves the hex disk of `max_radius` around the centre:
/// tiles further out are neither pushed nor handed to the map's
/// predicates.
#[derive(Debug, Default)]
pub struct Dijkstra {
    buffers: SearchBuffers,
    open: BinaryHeap<OpenKey>,
}

impl Dijkstra {
    /// Create a searcher with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the cheapest-to-reach tile within `[min_radius, max_radius]` of
    /// `center` that is not blocked for `requester` and fits `search_type`.
    ///
    /// The centre is expanded even if it is blocked. Tiles closer than
    /// `min_radius` are walked through but never returned.
    ///
    /// # Panics
    ///
    /// Panics if `center` is off the map.
    pub fn find<M: PathMap + ?Sized>(
        &mut self,
        map: &M,
        requester: &dyn PathRequester,
        center: Pos,
        min_radius: u32,
        max_radius: u32,
        search_type: SearchType,
    ) -> Option<Pos> {
        self.find_observed(
            map,
            requester,
            center,
            min_radius,
            max_radius,
            search_type,
            &mut NoopObserver,
        )
    }

    /// As [`find`](Self::find), reporting open/closed events to `observer`.
    #[allow(clippy::too_many_arguments)]
    pub fn find_observed<M: PathMap + ?Sized>(
        &mut self,
        map: &M,
        requester: &dyn PathRequester,
        center: Pos,
        min_radius: u32,
        max_radius: u32,
        search_type: SearchType,
        observer: &mut dyn SearchObserver,
    ) -> Option<Pos> {
        let space = map.space();
        let start = space.index(center);
        if min_radius > max_radius {
            return None;
        }

        self.buffers.begin(space.tile_count());
        self.open.clear();
        self.buffers.relax(start, 0, NO_PARENT);
        self.open.push(Reverse((0, center.y, center.x)));
        observer.mark_open(center);

        while let Some(Reverse((g, y, x))) = self.open.pop() {
            let pos = Pos::new(x, y);
            let index = space.index(pos);
            if self.buffers.is_closed(index) || self.buffers.cost(index) != Some(g) {
                continue;
            }
            self.buffers.close(index);
            observer.mark_closed(pos);

            if center.hex_distance(pos) >= min_radius
                && !map.is_blocked(requester, pos)
                && map.fits_search_type(pos, search_type, requester)
            {
                return Some(pos);
            }

            for next in map.neighbours(pos) {
                if center.hex_distance(next) > max_radius {
                    continue;
                }
                let next_index = space.index(next);
                if self.buffers.is_closed(next_index) || map.is_blocked(requester, next) {
                    continue;
                }
                let next_g = g + map.cost(pos, next);
                if self.buffers.cost(next_index).is_some_and(|known| known <= next_g) {
                    continue;
                }
                self.buffers.relax(next_index, next_g, index as u32);
                self.open.push(Reverse((next_g, next.y, next.x)));
                observer.mark_open(next);
            }
        }
        None
    }
}
