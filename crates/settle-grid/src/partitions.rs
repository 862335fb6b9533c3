//! Ownership, partitions and per-partition managers.
//!
//! A partition is a maximal set of same-owner tiles connected through hex
//! adjacency. Ownership changes update partition ids incrementally: the
//! changed tile joins (or merges) the partitions of its new same-owner
//! neighbours, and the partition it left is split if the tile was a cut
//! point. Only the affected partitions are flood-filled.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use settle_core::{IdleCategory, Material, MovableId, PartitionId, PlayerId, Pos};
use settle_space::HexSpace;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::shared::SharedLayers;

/// Idle worker registries and material stock of one partition.
#[derive(Debug, Clone)]
pub struct PartitionManager {
    player: PlayerId,
    size: usize,
    jobless: IndexMap<IdleCategory, VecDeque<MovableId>>,
    stock: IndexMap<Material, u32>,
}

impl PartitionManager {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            size: 0,
            jobless: IdleCategory::ALL
                .into_iter()
                .map(|c| (c, VecDeque::new()))
                .collect(),
            stock: IndexMap::new(),
        }
    }

    /// Owner of every tile in the partition.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Number of tiles in the partition.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue an idle movable.
    pub fn add_jobless(&mut self, category: IdleCategory, movable: MovableId) {
        self.queue_mut(category).push_back(movable);
    }

    /// Dequeue the longest-waiting idle movable of `category`.
    pub fn take_jobless(&mut self, category: IdleCategory) -> Option<MovableId> {
        self.queue_mut(category).pop_front()
    }

    /// Number of idle movables waiting in `category`.
    pub fn jobless_count(&self, category: IdleCategory) -> usize {
        self.jobless.get(&category).map_or(0, VecDeque::len)
    }

    /// Units of `material` lying in the partition's stacks.
    pub fn stock(&self, material: Material) -> u32 {
        self.stock.get(&material).copied().unwrap_or(0)
    }

    pub(crate) fn material_pushed(&mut self, material: Material) {
        *self.stock.entry(material).or_insert(0) += 1;
    }

    pub(crate) fn material_popped(&mut self, material: Material) {
        if let Some(n) = self.stock.get_mut(&material) {
            *n = n.saturating_sub(1);
        }
    }

    /// Total units in stock and total idle movables across categories.
    fn holdings(&self) -> (u32, usize) {
        (
            self.stock.values().sum(),
            self.jobless.values().map(VecDeque::len).sum(),
        )
    }

    fn queue_mut(&mut self, category: IdleCategory) -> &mut VecDeque<MovableId> {
        self.jobless.entry(category).or_default()
    }

    /// Fold `other` into `self`: registries appended in FIFO order, stock summed.
    fn absorb(&mut self, other: PartitionManager) {
        for (category, queue) in other.jobless {
            self.queue_mut(category).extend(queue);
        }
        for (material, n) in other.stock {
            *self.stock.entry(material).or_insert(0) += n;
        }
    }
}

/// Owner and partition id per tile, plus the partition managers.
///
/// Owners are stored in the shared layers so the background tasks can read
/// them; partition ids and managers are sim-only.
#[derive(Debug)]
pub struct PartitionsGrid {
    space: HexSpace,
    shared: Arc<SharedLayers>,
    partition: Vec<PartitionId>,
    managers: IndexMap<PartitionId, PartitionManager>,
    next_id: u32,
    stamp: Vec<u32>,
    generation: u32,
    stack: Vec<usize>,
}

impl PartitionsGrid {
    /// Build partitions from the owners currently in `shared`.
    pub fn new(shared: Arc<SharedLayers>) -> Self {
        let space = *shared.space();
        let n = space.tile_count();
        let mut grid = Self {
            space,
            shared,
            partition: vec![PartitionId::NONE; n],
            managers: IndexMap::new(),
            next_id: 1,
            stamp: vec![0; n],
            generation: 0,
            stack: Vec::new(),
        };
        grid.rebuild();
        grid
    }

    /// Owner of `pos`.
    pub fn owner(&self, pos: Pos) -> Option<PlayerId> {
        self.shared.owner(pos)
    }

    /// Partition of `pos`; [`PartitionId::NONE`] if unowned.
    pub fn partition(&self, pos: Pos) -> PartitionId {
        self.partition[self.space.index(pos)]
    }

    /// Border flag of `pos`, maintained by the border task.
    pub fn is_border(&self, pos: Pos) -> bool {
        self.shared.is_border(pos)
    }

    /// Number of live partitions.
    pub fn partition_count(&self) -> usize {
        self.managers.len()
    }

    /// Manager of `id`.
    pub fn manager(&self, id: PartitionId) -> Option<&PartitionManager> {
        self.managers.get(&id)
    }

    /// Mutable manager of `id`.
    pub fn manager_mut(&mut self, id: PartitionId) -> Option<&mut PartitionManager> {
        self.managers.get_mut(&id)
    }

    /// Manager of the partition containing `pos`.
    pub fn manager_at(&self, pos: Pos) -> Option<&PartitionManager> {
        self.manager(self.partition(pos))
    }

    /// Mutable manager of the partition containing `pos`.
    pub fn manager_at_mut(&mut self, pos: Pos) -> Option<&mut PartitionManager> {
        let id = self.partition(pos);
        self.manager_mut(id)
    }

    /// Give `pos` to `player`. Returns `false` if it already belonged to
    /// them, in which case nothing changes.
    ///
    /// # Panics
    ///
    /// If `player` is above [`PlayerId::MAX`], or `pos` is out of bounds.
    pub fn change_owner(&mut self, pos: Pos, player: PlayerId) -> bool {
        assert!(
            player.is_valid(),
            "player id {player} is reserved for unowned tiles"
        );
        self.assign(pos, Some(player))
    }

    /// Make `pos` unowned. Returns `false` if it already was.
    pub fn release_owner(&mut self, pos: Pos) -> bool {
        self.assign(pos, None)
    }

    fn assign(&mut self, pos: Pos, owner: Option<PlayerId>) -> bool {
        let index = self.space.index(pos);
        let previous = self.shared.owner(pos);
        if previous == owner {
            return false;
        }

        let old_id = self.partition[index];
        self.shared.set_owner(pos, owner);
        self.partition[index] = PartitionId::NONE;
        if old_id.is_some() {
            self.shrink(old_id, 1);
        }

        if let Some(player) = owner {
            let id = self.join(pos, player);
            self.partition[index] = id;
            if let Some(m) = self.managers.get_mut(&id) {
                m.size += 1;
            }
        }

        if self.managers.contains_key(&old_id) {
            self.split(pos, old_id);
        }
        true
    }

    /// Pick the partition `pos` joins as `player`'s tile, merging adjacent
    /// partitions of that player into the largest one.
    fn join(&mut self, pos: Pos, player: PlayerId) -> PartitionId {
        let mut adjacent: SmallVec<[PartitionId; 6]> = SmallVec::new();
        for n in self.space.neighbours(pos) {
            let id = self.partition(n);
            if id.is_some() && self.shared.owner(n) == Some(player) && !adjacent.contains(&id) {
                adjacent.push(id);
            }
        }

        let Some(&first) = adjacent.first() else {
            return self.allocate(player);
        };
        let survivor = adjacent.iter().copied().fold(first, |best, id| {
            let (bs, s) = (self.size_of(best), self.size_of(id));
            if s > bs || (s == bs && id < best) {
                id
            } else {
                best
            }
        });

        for &id in &adjacent {
            if id == survivor {
                continue;
            }
            let Some(seed) = self
                .space
                .neighbours(pos)
                .into_iter()
                .find(|n| self.partition(*n) == id)
            else {
                continue;
            };
            self.relabel(seed, id, survivor);
            if let Some(absorbed) = self.managers.shift_remove(&id) {
                debug!(merged = %id, into = %survivor, tiles = absorbed.size, "partitions merged");
                if let Some(m) = self.managers.get_mut(&survivor) {
                    m.size += absorbed.size;
                    m.absorb(absorbed);
                }
            }
        }
        survivor
    }

    /// Split `id` if removing `pos` disconnected it. The component reached
    /// first in direction order keeps `id` and its manager.
    fn split(&mut self, pos: Pos, id: PartitionId) {
        let seeds: SmallVec<[Pos; 6]> = self
            .space
            .neighbours(pos)
            .into_iter()
            .filter(|n| self.partition(*n) == id)
            .collect();
        if seeds.len() < 2 {
            return;
        }

        self.next_generation();
        self.stamp_component(seeds[0], id);
        let Some(player) = self.managers.get(&id).map(|m| m.player) else {
            return;
        };
        for &seed in &seeds[1..] {
            if self.stamp[self.space.index(seed)] == self.generation {
                continue;
            }
            let fresh = self.allocate(player);
            let moved = self.relabel(seed, id, fresh);
            self.shrink(id, moved);
            if let Some(m) = self.managers.get_mut(&fresh) {
                m.size = moved;
            }
            debug!(from = %id, new = %fresh, tiles = moved, "partition split");
        }
    }

    fn size_of(&self, id: PartitionId) -> usize {
        self.managers.get(&id).map_or(0, |m| m.size)
    }

    fn allocate(&mut self, player: PlayerId) -> PartitionId {
        let id = PartitionId(self.next_id);
        self.next_id += 1;
        self.managers.insert(id, PartitionManager::new(player));
        id
    }

    fn shrink(&mut self, id: PartitionId, by: usize) {
        let Some(m) = self.managers.get_mut(&id) else {
            return;
        };
        m.size = m.size.saturating_sub(by);
        if m.size > 0 {
            return;
        }
        let Some(m) = self.managers.shift_remove(&id) else {
            return;
        };
        match m.holdings() {
            (0, 0) => debug!(partition = %id, "partition emptied"),
            (stock, idle) => warn!(
                partition = %id,
                player = %m.player,
                stock,
                idle,
                "partition emptied; stock and idle registries dropped"
            ),
        }
    }

    fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamp.fill(0);
            self.generation = 1;
        }
    }

    /// Stamp every tile of partition `id` connected to `seed`.
    fn stamp_component(&mut self, seed: Pos, id: PartitionId) {
        self.stack.clear();
        let start = self.space.index(seed);
        self.stamp[start] = self.generation;
        self.stack.push(start);
        while let Some(i) = self.stack.pop() {
            for n in self.space.neighbours(self.space.pos_of(i)) {
                let j = self.space.index(n);
                if self.partition[j] == id && self.stamp[j] != self.generation {
                    self.stamp[j] = self.generation;
                    self.stack.push(j);
                }
            }
        }
    }

    /// Relabel the `from` component containing `seed` to `to`, stamping it.
    /// Returns the number of tiles relabelled.
    fn relabel(&mut self, seed: Pos, from: PartitionId, to: PartitionId) -> usize {
        debug_assert_ne!(from, to);
        self.stack.clear();
        let start = self.space.index(seed);
        if self.partition[start] != from {
            return 0;
        }
        self.partition[start] = to;
        self.stamp[start] = self.generation;
        self.stack.push(start);
        let mut count = 1;
        while let Some(i) = self.stack.pop() {
            for n in self.space.neighbours(self.space.pos_of(i)) {
                let j = self.space.index(n);
                if self.partition[j] == from {
                    self.partition[j] = to;
                    self.stamp[j] = self.generation;
                    self.stack.push(j);
                    count += 1;
                }
            }
        }
        count
    }

    /// Overwrite owners in bulk, then rebuild every partition.
    ///
    /// Used when loading a map, where incremental merging would be wasted
    /// work.
    pub fn load_owners<I>(&mut self, owners: I)
    where
        I: IntoIterator<Item = (Pos, Option<PlayerId>)>,
    {
        for (pos, owner) in owners {
            self.shared.set_owner(pos, owner);
        }
        self.rebuild();
    }

    /// Recompute every partition from the owner layer, dropping all managers.
    pub fn rebuild(&mut self) {
        self.partition.fill(PartitionId::NONE);
        self.managers.clear();
        for index in 0..self.space.tile_count() {
            if self.partition[index].is_some() {
                continue;
            }
            let pos = self.space.pos_of(index);
            let Some(player) = self.shared.owner(pos) else {
                continue;
            };
            let id = self.allocate(player);
            let size = self.fill_owner_region(pos, player, id);
            if let Some(m) = self.managers.get_mut(&id) {
                m.size = size;
            }
        }
        debug!(partitions = self.managers.len(), "partitions rebuilt");
    }

    fn fill_owner_region(&mut self, seed: Pos, player: PlayerId, id: PartitionId) -> usize {
        self.stack.clear();
        let start = self.space.index(seed);
        self.partition[start] = id;
        self.stack.push(start);
        let mut count = 1;
        while let Some(i) = self.stack.pop() {
            for n in self.space.neighbours(self.space.pos_of(i)) {
                let j = self.space.index(n);
                if self.partition[j] == PartitionId::NONE && self.shared.owner(n) == Some(player) {
                    self.partition[j] = id;
                    self.stack.push(j);
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn grid(w: u16, h: u16) -> PartitionsGrid {
        let (shared, _) = SharedLayers::new(HexSpace::new(w, h).unwrap());
        PartitionsGrid::new(shared)
    }

    fn owned(w: u16, h: u16, player: PlayerId) -> PartitionsGrid {
        let (shared, _) = SharedLayers::new(HexSpace::new(w, h).unwrap());
        for pos in shared.space().canonical_ordering().collect::<Vec<_>>() {
            shared.set_owner(pos, Some(player));
        }
        PartitionsGrid::new(shared)
    }

    /// Partition ids must equal connected components of equal owners.
    fn assert_consistent(g: &PartitionsGrid) {
        let mut sizes: HashMap<PartitionId, usize> = HashMap::new();
        for pos in g.space.canonical_ordering() {
            let id = g.partition(pos);
            match g.owner(pos) {
                None => assert_eq!(id, PartitionId::NONE, "unowned {pos} has partition"),
                Some(p) => {
                    assert!(id.is_some(), "owned {pos} lacks partition");
                    assert_eq!(g.manager(id).map(|m| m.player()), Some(p));
                    *sizes.entry(id).or_default() += 1;
                }
            }
            for n in g.space.neighbours(pos) {
                if g.owner(n) == g.owner(pos) {
                    assert_eq!(g.partition(n), id, "{pos} and {n} disagree");
                }
            }
        }
        assert_eq!(sizes.len(), g.partition_count());
        for (id, size) in sizes {
            assert_eq!(g.manager(id).map(|m| m.size()), Some(size), "size of {id}");
        }
    }

    #[test]
    fn initial_build_from_owners() {
        let g = owned(6, 6, P0);
        assert_eq!(g.partition_count(), 1);
        assert_eq!(g.manager_at(Pos::new(0, 0)).map(|m| m.size()), Some(36));
        assert_consistent(&g);
    }

    #[test]
    fn bulk_load_finds_components() {
        let mut g = grid(4, 1);
        g.load_owners([
            (Pos::new(0, 0), Some(P0)),
            (Pos::new(1, 0), Some(P0)),
            (Pos::new(3, 0), Some(P0)),
        ]);
        assert_eq!(g.partition_count(), 2);
        assert_eq!(g.partition(Pos::new(0, 0)), g.partition(Pos::new(1, 0)));
        assert_consistent(&g);
    }

    #[test]
    fn unowned_tiles_have_no_partition() {
        let g = grid(4, 4);
        assert_eq!(g.partition(Pos::new(1, 1)), PartitionId::NONE);
        assert_eq!(g.partition_count(), 0);
    }

    #[test]
    fn isolated_claim_creates_partition() {
        let mut g = grid(5, 5);
        assert!(g.change_owner(Pos::new(2, 2), P1));
        let id = g.partition(Pos::new(2, 2));
        assert!(id.is_some());
        assert_eq!(g.manager(id).map(|m| m.size()), Some(1));
        assert_consistent(&g);
    }

    #[test]
    fn same_owner_twice_is_noop() {
        let mut g = owned(5, 5, P0);
        assert!(g.change_owner(Pos::new(2, 2), P1));
        let before: Vec<_> = g.space.canonical_ordering().map(|p| g.partition(p)).collect();
        assert!(!g.change_owner(Pos::new(2, 2), P1));
        let after: Vec<_> = g.space.canonical_ordering().map(|p| g.partition(p)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn bridge_merges_into_larger_partition() {
        // Row 0: P0 P0 P0 __ P0
        let mut g = grid(5, 1);
        for x in [0, 1, 2, 4] {
            g.change_owner(Pos::new(x, 0), P0);
        }
        let big = g.partition(Pos::new(0, 0));
        let small = g.partition(Pos::new(4, 0));
        assert_ne!(big, small);
        g.manager_mut(small)
            .unwrap()
            .add_jobless(IdleCategory::Bearer, MovableId(9));
        g.manager_mut(big)
            .unwrap()
            .add_jobless(IdleCategory::Bearer, MovableId(3));

        g.change_owner(Pos::new(3, 0), P0);
        assert_eq!(g.partition_count(), 1);
        assert_eq!(g.partition(Pos::new(4, 0)), big);
        let m = g.manager_mut(big).unwrap();
        assert_eq!(m.size(), 5);
        assert_eq!(m.take_jobless(IdleCategory::Bearer), Some(MovableId(3)));
        assert_eq!(m.take_jobless(IdleCategory::Bearer), Some(MovableId(9)));
        assert_consistent(&g);
    }

    #[test]
    fn equal_sizes_merge_into_smaller_id() {
        let mut g = grid(3, 1);
        g.change_owner(Pos::new(0, 0), P0);
        g.change_owner(Pos::new(2, 0), P0);
        let first = g.partition(Pos::new(0, 0));
        g.change_owner(Pos::new(1, 0), P0);
        assert_eq!(g.partition(Pos::new(2, 0)), first);
    }

    #[test]
    fn cutting_a_line_splits_it() {
        let mut g = owned(5, 1, P0);
        let id = g.partition(Pos::new(0, 0));
        g.manager_mut(id)
            .unwrap()
            .add_jobless(IdleCategory::Digger, MovableId(1));

        g.change_owner(Pos::new(2, 0), P1);
        assert_eq!(g.partition_count(), 3);
        // East precedes West in direction order, so (3,0) keeps the id.
        assert_eq!(g.partition(Pos::new(3, 0)), id);
        assert_ne!(g.partition(Pos::new(1, 0)), id);
        assert_eq!(g.manager(id).map(|m| m.jobless_count(IdleCategory::Digger)), Some(1));
        assert_consistent(&g);
    }

    #[test]
    fn removing_non_cut_tile_keeps_partition() {
        let mut g = owned(5, 5, P0);
        let id = g.partition(Pos::new(2, 2));
        g.release_owner(Pos::new(2, 2));
        assert_eq!(g.partition_count(), 1);
        assert_eq!(g.partition(Pos::new(1, 1)), id);
        assert_eq!(g.manager(id).map(|m| m.size()), Some(24));
        assert_consistent(&g);
    }

    #[test]
    fn releasing_last_tile_drops_partition() {
        let mut g = grid(3, 3);
        g.change_owner(Pos::new(1, 1), P0);
        assert!(g.release_owner(Pos::new(1, 1)));
        assert_eq!(g.partition_count(), 0);
        assert!(!g.release_owner(Pos::new(1, 1)));
    }

    #[test]
    fn last_tile_lost_drops_holdings() {
        let mut g = grid(3, 3);
        g.change_owner(Pos::new(1, 1), P0);
        let m = g.manager_at_mut(Pos::new(1, 1)).unwrap();
        m.material_pushed(Material::Stone);
        m.material_pushed(Material::Plank);
        m.add_jobless(IdleCategory::Bearer, MovableId(4));
        assert_eq!(m.holdings(), (2, 1));

        assert!(g.change_owner(Pos::new(1, 1), P1));
        assert_eq!(g.partition_count(), 1);
        let taken = g.manager_at(Pos::new(1, 1)).unwrap();
        assert_eq!(taken.player(), P1);
        assert_eq!(taken.holdings(), (0, 0));
    }

    #[test]
    #[should_panic(expected = "reserved for unowned tiles")]
    fn reserved_player_id_is_rejected() {
        let mut g = grid(3, 3);
        g.change_owner(Pos::new(1, 1), PlayerId(PlayerId::NONE_SLOT));
    }

    #[test]
    fn stock_follows_push_and_pop() {
        let mut g = owned(3, 3, P0);
        let m = g.manager_at_mut(Pos::new(1, 1)).unwrap();
        m.material_pushed(Material::Plank);
        m.material_pushed(Material::Plank);
        m.material_popped(Material::Plank);
        m.material_popped(Material::Coal);
        assert_eq!(m.stock(Material::Plank), 1);
        assert_eq!(m.stock(Material::Coal), 0);
    }

    proptest! {
        #[test]
        fn random_edits_keep_partitions_consistent(
            edits in proptest::collection::vec((0i32..6, 0i32..6, 0u8..3), 1..60)
        ) {
            let mut g = grid(6, 6);
            for (x, y, p) in edits {
                let pos = Pos::new(x, y);
                if p == 2 {
                    g.release_owner(pos);
                } else {
                    g.change_owner(pos, PlayerId(p));
                }
            }
            assert_consistent(&g);
        }

        #[test]
        fn change_owner_is_idempotent(x in 0i32..6, y in 0i32..6, p in 0u8..3) {
            let mut g = owned(6, 6, P0);
            let pos = Pos::new(x, y);
            g.change_owner(pos, PlayerId(p));
            let once: Vec<_> = g.space.canonical_ordering()
                .map(|t| (g.owner(t), g.partition(t)))
                .collect();
            prop_assert!(!g.change_owner(pos, PlayerId(p)));
            let twice: Vec<_> = g.space.canonical_ordering()
                .map(|t| (g.owner(t), g.partition(t)))
                .collect();
            prop_assert_eq!(once, twice);
        }
    }
}
