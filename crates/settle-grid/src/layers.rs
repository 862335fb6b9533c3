//! The sim-side aggregate of all grids.

use std::sync::Arc;

use settle_core::{
    IdleCategory, Material, MovableId, MovableRef, PathRequester, Pos, SearchType,
};
use settle_space::HexSpace;

use crate::blocked::BlockedGrid;
use crate::landscape::LandscapeGrid;
use crate::movable::MovableGrid;
use crate::objects::ObjectsGrid;
use crate::partitions::PartitionsGrid;
use crate::predicate;
use crate::shared::{LayerWriters, SharedLayers};

/// Every per-tile grid of one map, owned by the simulation thread.
///
/// Operations that touch more than one grid (material bookkeeping,
/// ownership-aware blocking, search predicates) live here.
#[derive(Debug)]
pub struct GridLayers {
    space: HexSpace,
    shared: Arc<SharedLayers>,
    landscape: LandscapeGrid,
    objects: ObjectsGrid,
    movables: MovableGrid,
    blocked: BlockedGrid,
    partitions: PartitionsGrid,
}

impl GridLayers {
    /// Empty grids for `space`, plus the writers for the task-owned layers.
    pub fn new(space: HexSpace) -> (Self, LayerWriters) {
        let (shared, writers) = SharedLayers::new(space);
        let layers = Self {
            space,
            landscape: LandscapeGrid::new(Arc::clone(&shared)),
            objects: ObjectsGrid::new(space),
            movables: MovableGrid::new(space),
            blocked: BlockedGrid::new(Arc::clone(&shared)),
            partitions: PartitionsGrid::new(Arc::clone(&shared)),
            shared,
        };
        (layers, writers)
    }

    /// The map dimensions.
    pub fn space(&self) -> &HexSpace {
        &self.space
    }

    /// The layers shared with the background tasks.
    pub fn shared(&self) -> &Arc<SharedLayers> {
        &self.shared
    }

    /// Terrain.
    pub fn landscape(&self) -> &LandscapeGrid {
        &self.landscape
    }

    /// Mutable terrain.
    pub fn landscape_mut(&mut self) -> &mut LandscapeGrid {
        &mut self.landscape
    }

    /// Objects.
    pub fn objects(&self) -> &ObjectsGrid {
        &self.objects
    }

    /// Mutable objects.
    pub fn objects_mut(&mut self) -> &mut ObjectsGrid {
        &mut self.objects
    }

    /// Movable occupancy.
    pub fn movables(&self) -> &MovableGrid {
        &self.movables
    }

    /// Mutable movable occupancy.
    pub fn movables_mut(&mut self) -> &mut MovableGrid {
        &mut self.movables
    }

    /// Blocked, marked and protected flags.
    pub fn blocked(&self) -> &BlockedGrid {
        &self.blocked
    }

    /// Mutable flags.
    pub fn blocked_mut(&mut self) -> &mut BlockedGrid {
        &mut self.blocked
    }

    /// Ownership and partitions.
    pub fn partitions(&self) -> &PartitionsGrid {
        &self.partitions
    }

    /// Mutable ownership and partitions.
    pub fn partitions_mut(&mut self) -> &mut PartitionsGrid {
        &mut self.partitions
    }

    /// Whether `requester` may not enter `pos`: the tile is blocked, or the
    /// requester is confined to its own ground and does not own it.
    pub fn is_blocked_for(&self, requester: &dyn PathRequester, pos: Pos) -> bool {
        self.blocked.is_blocked(pos)
            || (requester.needs_players_ground()
                && self.partitions.owner(pos) != Some(requester.player()))
    }

    /// See [`predicate::fits_search_type`].
    pub fn fits_search_type(
        &self,
        pos: Pos,
        search_type: SearchType,
        requester: &dyn PathRequester,
    ) -> bool {
        predicate::fits_search_type(self, pos, search_type, requester)
    }

    /// Put one unit of `material` on `pos` and book it to the tile's
    /// partition.
    pub fn push_material(&mut self, pos: Pos, material: Material) -> bool {
        if !self.objects.push_material(pos, material) {
            return false;
        }
        if let Some(m) = self.partitions.manager_at_mut(pos) {
            m.material_pushed(material);
        }
        true
    }

    /// Take one unit of `material` from `pos` and book it out of the
    /// tile's partition.
    pub fn pop_material(&mut self, pos: Pos, material: Material) -> bool {
        if !self.objects.pop_material(pos, material) {
            return false;
        }
        if let Some(m) = self.partitions.manager_at_mut(pos) {
            m.material_popped(material);
        }
        true
    }

    /// Register `movable` as idle in the partition of `pos`. Returns
    /// `false` if `pos` is unowned.
    pub fn add_jobless(&mut self, pos: Pos, movable: MovableRef) -> bool {
        match self.partitions.manager_at_mut(pos) {
            Some(m) => {
                m.add_jobless(movable.movable_type.idle_category(), movable.id);
                true
            }
            None => false,
        }
    }

    /// Take the longest-idle movable of `category` from the partition of
    /// `pos`.
    pub fn take_jobless(&mut self, pos: Pos, category: IdleCategory) -> Option<MovableId> {
        self.partitions.manager_at_mut(pos)?.take_jobless(category)
    }
}
