//! Generation-stamped per-tile scratch space shared by the searches.

/// Sentinel parent for the start tile.
pub(crate) const NO_PARENT: u32 = u32::MAX;

/// Per-tile scratch arrays, allocated once per map size.
///
/// A tile's entry is valid only when its stamp equals the current
/// generation, so starting a new search is O(1) instead of O(tiles).
#[derive(Debug, Default)]
pub(crate) struct SearchBuffers {
    generation: u32,
    seen: Vec<u32>,
    closed: Vec<u32>,
    cost: Vec<u32>,
    parent: Vec<u32>,
}

impl SearchBuffers {
    /// Start a new search over a map with `tile_count` tiles.
    pub(crate) fn begin(&mut self, tile_count: usize) {
        if self.seen.len() != tile_count {
            self.seen = vec![0; tile_count];
            self.closed = vec![0; tile_count];
            self.cost = vec![0; tile_count];
            self.parent = vec![NO_PARENT; tile_count];
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamps from 2^32 searches ago would alias; wipe them once.
            self.seen.fill(0);
            self.closed.fill(0);
            self.generation = 1;
        }
    }

    /// Best known cost to `index`, if reached in this search.
    #[inline]
    pub(crate) fn cost(&self, index: usize) -> Option<u32> {
        (self.seen[index] == self.generation).then_some(self.cost[index])
    }

    #[inline]
    pub(crate) fn relax(&mut self, index: usize, cost: u32, parent: u32) {
        self.seen[index] = self.generation;
        self.cost[index] = cost;
        self.parent[index] = parent;
    }

    #[inline]
    pub(crate) fn parent(&self, index: usize) -> u32 {
        self.parent[index]
    }

    #[inline]
    pub(crate) fn is_closed(&self, index: usize) -> bool {
        self.closed[index] == self.generation
    }

    #[inline]
    pub(crate) fn close(&mut self, index: usize) {
        self.closed[index] = self.generation;
    }

    /// Allocated tile capacity.
    pub(crate) fn capacity(&self) -> usize {
        self.seen.len()
    }
}
