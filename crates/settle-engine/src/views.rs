//! Consumer views over a [`MainGrid`].
//!
//! Each view exposes only what one consumer needs: rendering, input
//! handling, map building, or pathfinding. Views borrow the grid, so they
//! cannot outlive it and the borrow checker serialises mutation.

use tracing::{debug, warn};

use settle_core::{
    BuildingType, GridError, LandscapeType, MapObject, MapObjectType, MovableId, MovableRef,
    MovableType, PathRequester, PlayerId, Pos, SearchType,
};
use settle_grid::{construction_mark, GridLayers};
use settle_path::PathMap;
use settle_space::{HexSpace, MapArea};

use crate::grid::MainGrid;
use crate::tasks::construction::PlacementTool;
use crate::tasks::TaskError;

// ── PathfinderGrid ───────────────────────────────────────────────

/// [`PathMap`] over the grid layers: blocking is ownership-aware and the
/// search predicates are the grid's.
#[derive(Clone, Copy)]
pub struct PathfinderGrid<'a> {
    layers: &'a GridLayers,
}

impl<'a> PathfinderGrid<'a> {
    pub(crate) fn new(layers: &'a GridLayers) -> Self {
        Self { layers }
    }
}

impl PathMap for PathfinderGrid<'_> {
    fn space(&self) -> &HexSpace {
        self.layers.space()
    }

    fn is_blocked(&self, requester: &dyn PathRequester, pos: Pos) -> bool {
        self.layers.is_blocked_for(requester, pos)
    }

    fn fits_search_type(
        &self,
        pos: Pos,
        search_type: SearchType,
        requester: &dyn PathRequester,
    ) -> bool {
        self.layers.fits_search_type(pos, search_type, requester)
    }
}

// ── GraphicsView ─────────────────────────────────────────────────

/// What a renderer reads each frame.
#[derive(Clone, Copy)]
pub struct GraphicsView<'a> {
    layers: &'a GridLayers,
}

impl<'a> GraphicsView<'a> {
    pub(crate) fn new(layers: &'a GridLayers) -> Self {
        Self { layers }
    }

    /// Columns.
    pub fn width(&self) -> u16 {
        self.layers.space().width()
    }

    /// Rows.
    pub fn height(&self) -> u16 {
        self.layers.space().height()
    }

    /// Terrain of `pos`.
    pub fn landscape(&self, pos: Pos) -> LandscapeType {
        self.layers.landscape().landscape(pos)
    }

    /// Height of `pos`.
    pub fn height_at(&self, pos: Pos) -> u8 {
        self.layers.landscape().height(pos)
    }

    /// Movable standing on `pos`.
    pub fn movable(&self, pos: Pos) -> Option<MovableRef> {
        self.layers.movables().movable_at(pos)
    }

    /// Object stack of `pos`, bottom first.
    pub fn objects(&self, pos: Pos) -> &'a [MapObject] {
        self.layers.objects().objects(pos)
    }

    /// Whether `pos` is drawn with a border marker.
    pub fn is_border(&self, pos: Pos) -> bool {
        self.layers.shared().is_border(pos)
    }

    /// Owner of `pos`.
    pub fn owner(&self, pos: Pos) -> Option<PlayerId> {
        self.layers.partitions().owner(pos)
    }

    /// Construction mark of `pos`, for the placement overlay.
    pub fn construction_mark(&self, pos: Pos) -> Option<u8> {
        self.layers.shared().construction_mark(pos)
    }
}

// ── InputView ────────────────────────────────────────────────────

/// What input handling needs: hit-testing and the placement overlay.
#[derive(Clone, Copy)]
pub struct InputView<'a> {
    grid: &'a MainGrid,
}

impl<'a> InputView<'a> {
    pub(crate) fn new(grid: &'a MainGrid) -> Self {
        Self { grid }
    }

    /// Map dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u16, u16) {
        let space = self.grid.space();
        (space.width(), space.height())
    }

    /// Whether `pos` is on the map. Safe for arbitrary cursor positions.
    pub fn is_in_bounds(&self, pos: Pos) -> bool {
        self.grid.space().contains(pos)
    }

    /// Movable under the cursor, if any. Off-map positions yield `None`.
    pub fn movable_at(&self, pos: Pos) -> Option<MovableRef> {
        self.is_in_bounds(pos)
            .then(|| self.grid.movable_at(pos))
            .flatten()
    }

    /// Building anchored under the cursor, if any.
    pub fn building_at(&self, pos: Pos) -> Option<(BuildingType, PlayerId)> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        match self
            .grid
            .layers()
            .objects()
            .get_type(pos, MapObjectType::Building)
        {
            Some(&MapObject::Building {
                building_type,
                player,
            }) => Some((building_type, player)),
            _ => None,
        }
    }

    /// Owner under the cursor.
    pub fn owner_at(&self, pos: Pos) -> Option<PlayerId> {
        self.is_in_bounds(pos)
            .then(|| self.grid.owner(pos))
            .flatten()
    }

    /// Construction mark under the cursor.
    pub fn construction_mark_at(&self, pos: Pos) -> Option<u8> {
        self.is_in_bounds(pos)
            .then(|| self.grid.construction_mark(pos))
            .flatten()
    }

    /// See [`MainGrid::set_placement_tool`].
    pub fn set_placement_tool(&self, tool: Option<PlacementTool>) -> Result<(), TaskError> {
        self.grid.set_placement_tool(tool)
    }

    /// See [`MainGrid::set_screen`].
    pub fn set_screen(&self, area: &MapArea) -> Result<(), TaskError> {
        self.grid.set_screen(area)
    }
}

// ── BuilderView ──────────────────────────────────────────────────

/// Mutating view used while populating a map or playing: spawn units and
/// place buildings with the grid's checks applied.
pub struct BuilderView<'a> {
    grid: &'a mut MainGrid,
}

impl<'a> BuilderView<'a> {
    pub(crate) fn new(grid: &'a mut MainGrid) -> Self {
        Self { grid }
    }

    /// Place a new movable on `pos` and register it as idle in its
    /// partition.
    ///
    /// The tile must be free, unblocked and owned by `player`.
    pub fn spawn_movable(
        &mut self,
        pos: Pos,
        movable_type: MovableType,
        player: PlayerId,
    ) -> Result<MovableRef, GridError> {
        if let Some(occupant) = self.grid.movable_at(pos) {
            return Err(GridError::TileOccupied {
                pos,
                occupant: occupant.id,
            });
        }
        if self.grid.layers().blocked().is_blocked(pos) {
            return Err(GridError::Blocked { pos });
        }
        if self.grid.owner(pos) != Some(player) {
            return Err(GridError::NotOwned { pos, player });
        }
        let movable = MovableRef {
            id: MovableId::next(),
            movable_type,
            player,
        };
        self.grid.movable_entered(pos, movable)?;
        self.grid.add_jobless(pos, movable);
        debug!(%pos, id = %movable.id, ?movable_type, "movable spawned");
        Ok(movable)
    }

    /// Place `building` anchored at `pos` for `player`.
    ///
    /// The footprint must be on the map, unblocked, owned by `player` and
    /// flat enough to carry a construction mark. Footprint tiles become
    /// blocked; a military building also claims the disk of
    /// [`tower_radius`](crate::GridConfig::tower_radius) around its anchor.
    pub fn place_building(
        &mut self,
        pos: Pos,
        building: BuildingType,
        player: PlayerId,
    ) -> Result<(), GridError> {
        if construction_mark(self.grid.layers().shared(), pos, building, player).is_none() {
            return Err(GridError::NotPlaceable {
                pos,
                building_type: building,
            });
        }
        for &(dx, dy) in building.footprint() {
            self.grid.set_blocked(pos.offset(dx, dy), true);
        }
        self.grid.add_object(
            pos,
            MapObject::Building {
                building_type: building,
                player,
            },
        );
        if building.is_military() {
            let radius = self.grid.config().tower_radius;
            match self.grid.occupy_area(&MapArea::disk(pos, radius), player) {
                Ok(claimed) => debug!(%pos, claimed, "territory claimed"),
                Err(e) => warn!(error = %e, %pos, "territory claim failed"),
            }
        }
        Ok(())
    }
}
