//! [`MainGrid`]: the world grid facade owned by the simulation thread.
//!
//! All sim-side state lives in a [`GridLayers`]; derived layers are
//! maintained by three background tasks (see [`crate::tasks`]). Ownership
//! changes are queued to the border and landmark tasks, never computed
//! inline. [`tick()`](MainGrid::tick) applies landmark corrections and
//! waits for the task queues to drain, so derived state is at most one
//! tick stale.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use settle_core::{
    GridError, IdleCategory, LandscapeType, MapObject, MapObjectType, Material, MovableId, MovableRef,
    PartitionId, PathRequester, PlayerId, Pos, SearchType,
};
use settle_grid::{GridLayers, PartitionManager};
use settle_path::{AStar, Dijkstra, InAreaFinder, Path};
use settle_space::{HexSpace, MapArea, SpaceError};

use crate::config::{ConfigError, GridConfig};
use crate::layout::MapLayout;
use crate::tasks::border::{BorderMsg, BorderTracer};
use crate::tasks::construction::{ConstructionMarker, ConstructionMsg, PlacementTool};
use crate::tasks::landmark::{LandmarkCorrector, LandmarkMsg, OwnerCorrection};
use crate::tasks::{TaskError, TaskHandle};
use crate::views::{BuilderView, GraphicsView, InputView, PathfinderGrid};

// ── Reports ──────────────────────────────────────────────────────

/// Outcome of one [`MainGrid::tick`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Landmark corrections applied this tick.
    pub corrections_applied: usize,
    /// Tiles whose owner changed because of those corrections.
    pub tiles_corrected: usize,
    /// Tasks that failed to drain their queue in time.
    pub task_errors: Vec<TaskError>,
}

impl TickReport {
    /// Whether every task drained its queue.
    pub fn is_clean(&self) -> bool {
        self.task_errors.is_empty()
    }
}

/// Report from [`MainGrid::shutdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Total time spent joining the task threads.
    pub total_ms: u64,
    /// Number of task threads that exited cleanly.
    pub tasks_joined: usize,
    /// Number of task threads that panicked outside entry processing.
    pub tasks_failed: usize,
}

// ── Tasks ────────────────────────────────────────────────────────

struct Tasks {
    border: TaskHandle<BorderMsg>,
    landmark: TaskHandle<LandmarkMsg>,
    construction: TaskHandle<ConstructionMsg>,
    corrections: Receiver<OwnerCorrection>,
}

// ── MainGrid ─────────────────────────────────────────────────────

/// The world grid: layered tile storage, partitions, searches and the
/// background tasks maintaining derived layers.
///
/// Not `Sync`: every method runs on the simulation thread. Consumers get
/// narrow borrowing views via [`graphics_view`](Self::graphics_view),
/// [`input_view`](Self::input_view), [`builder_view`](Self::builder_view)
/// and [`pathfinder_grid`](Self::pathfinder_grid).
pub struct MainGrid {
    layers: GridLayers,
    config: GridConfig,
    astar: AStar,
    dijkstra: Dijkstra,
    in_area: InAreaFinder,
    tasks: Option<Tasks>,
}

impl MainGrid {
    /// Build a grid from `layout` and start its background tasks.
    ///
    /// Partitions and border flags are computed synchronously, so a fresh
    /// grid is fully converged.
    pub fn new(layout: MapLayout, config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let space = HexSpace::new(layout.width(), layout.height())?;
        layout.validate()?;

        let (mut layers, writers) = GridLayers::new(space);
        for pos in layout.positions() {
            layers.landscape_mut().set_landscape(pos, layout.landscape_at(pos));
            layers.landscape_mut().set_height(pos, layout.height_at(pos));
            layers.blocked_mut().set_blocked(pos, layout.blocked_at(pos));
            layers.blocked_mut().set_protected(pos, layout.protected_at(pos));
        }
        layers
            .partitions_mut()
            .load_owners(layout.positions().map(|p| (p, layout.owner_at(p))));

        for &(pos, object) in layout.objects() {
            match object {
                MapObject::Stack { material, count } => {
                    for _ in 0..count {
                        layers.push_material(pos, material);
                    }
                }
                other => layers.objects_mut().add(pos, other),
            }
        }
        for &(pos, movable_type, player) in layout.movables() {
            let movable = MovableRef {
                id: MovableId::next(),
                movable_type,
                player,
            };
            layers.movables_mut().enter(pos, movable).map_err(|e| {
                ConfigError::LayoutMismatch {
                    reason: e.to_string(),
                }
            })?;
            layers.add_jobless(pos, movable);
        }

        writers.border.refresh_all();

        let capacity = config.task_queue_capacity;
        let mut tracer = BorderTracer::new(writers.border);
        let border = TaskHandle::spawn("border", capacity, move |msg| tracer.handle(msg))?;

        let (correction_tx, corrections) = crossbeam_channel::unbounded();
        let mut corrector = LandmarkCorrector::new(
            writers.landmark,
            config.landmark_region_limit,
            correction_tx,
        );
        let landmark = TaskHandle::spawn("landmark", capacity, move |msg| corrector.handle(msg))?;

        let mut marker = ConstructionMarker::new(writers.construction);
        let construction =
            TaskHandle::spawn("construction", capacity, move |msg| marker.handle(msg))?;

        debug!(
            width = space.width(),
            height = space.height(),
            partitions = layers.partitions().partition_count(),
            "grid built"
        );

        Ok(Self {
            layers,
            config,
            astar: AStar::new(),
            dijkstra: Dijkstra::new(),
            in_area: InAreaFinder::new(),
            tasks: Some(Tasks {
                border,
                landmark,
                construction,
                corrections,
            }),
        })
    }

    // ── Accessors ────────────────────────────────────────────────

    /// Map dimensions.
    pub fn space(&self) -> &HexSpace {
        self.layers.space()
    }

    /// Read-only access to every grid.
    pub fn layers(&self) -> &GridLayers {
        &self.layers
    }

    /// The configuration the grid was built with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Owner of `pos`.
    pub fn owner(&self, pos: Pos) -> Option<PlayerId> {
        self.layers.partitions().owner(pos)
    }

    /// Partition of `pos`.
    pub fn partition(&self, pos: Pos) -> PartitionId {
        self.layers.partitions().partition(pos)
    }

    /// Manager of the partition containing `pos`.
    pub fn partition_manager(&self, pos: Pos) -> Option<&PartitionManager> {
        self.layers.partitions().manager_at(pos)
    }

    /// Border flag of `pos`.
    pub fn is_border(&self, pos: Pos) -> bool {
        self.layers.partitions().is_border(pos)
    }

    /// Enclosing player recorded by the landmark task.
    pub fn landmark(&self, pos: Pos) -> Option<PlayerId> {
        self.layers.shared().landmark(pos)
    }

    /// Construction mark of `pos`.
    pub fn construction_mark(&self, pos: Pos) -> Option<u8> {
        self.layers.shared().construction_mark(pos)
    }

    /// Movable standing on `pos`.
    pub fn movable_at(&self, pos: Pos) -> Option<MovableRef> {
        self.layers.movables().movable_at(pos)
    }

    // ── Ownership ────────────────────────────────────────────────

    /// Give `pos` to `player`. Partitions are updated before returning;
    /// border and landmark recomputation is queued. Returns `false`, with
    /// no queue traffic, if `player` already owned the tile.
    ///
    /// # Panics
    ///
    /// If `player` is above [`PlayerId::MAX`].
    pub fn change_owner(&mut self, pos: Pos, player: PlayerId) -> bool {
        let changed = self.layers.partitions_mut().change_owner(pos, player);
        if changed {
            self.owner_changed(pos, Some(player));
        }
        changed
    }

    /// Make `pos` unowned. Returns `false` if it already was.
    pub fn release_owner(&mut self, pos: Pos) -> bool {
        let changed = self.layers.partitions_mut().release_owner(pos);
        if changed {
            self.owner_changed(pos, None);
        }
        changed
    }

    /// Give every tile of `area` to `player`. Returns how many tiles
    /// changed owner.
    pub fn occupy_area(&mut self, area: &MapArea, player: PlayerId) -> Result<usize, SpaceError> {
        let tiles = self.space().compile_area(area)?;
        let changed = tiles
            .into_iter()
            .filter(|&pos| self.change_owner(pos, player))
            .count();
        Ok(changed)
    }

    fn owner_changed(&self, pos: Pos, player: Option<PlayerId>) {
        let Some(tasks) = &self.tasks else {
            return;
        };
        if let Err(e) = tasks.border.send(BorderMsg::Check(pos)) {
            warn!(error = %e, %pos, "border update dropped");
        }
        if let Err(e) = tasks.landmark.send(LandmarkMsg::OwnerChanged { pos, player }) {
            warn!(error = %e, %pos, "landmark update dropped");
        }
    }

    // ── Flags and terrain ────────────────────────────────────────

    /// Set the blocked flag of `pos`.
    pub fn set_blocked(&mut self, pos: Pos, blocked: bool) {
        self.layers.blocked_mut().set_blocked(pos, blocked);
    }

    /// Reserve `pos` for construction (or release it).
    pub fn set_marked(&mut self, pos: Pos, marked: bool) {
        self.layers.blocked_mut().set_marked(pos, marked);
    }

    /// Forbid (or allow) planting on `pos`.
    pub fn set_protected(&mut self, pos: Pos, protected: bool) {
        self.layers.blocked_mut().set_protected(pos, protected);
    }

    /// Set the terrain of `pos`.
    pub fn set_landscape(&mut self, pos: Pos, landscape: LandscapeType) {
        self.layers.landscape_mut().set_landscape(pos, landscape);
    }

    /// Set the height of `pos`.
    pub fn set_height(&mut self, pos: Pos, height: u8) {
        self.layers.landscape_mut().set_height(pos, height);
    }

    // ── Objects and materials ────────────────────────────────────

    /// Put `object` on top of `pos`. Objects do not block tiles by
    /// themselves; pair with [`set_blocked`](Self::set_blocked) as needed.
    pub fn add_object(&mut self, pos: Pos, object: MapObject) {
        self.layers.objects_mut().add(pos, object);
    }

    /// Remove the lowest object of `object_type` from `pos`.
    pub fn remove_object(&mut self, pos: Pos, object_type: MapObjectType) -> Option<MapObject> {
        self.layers.objects_mut().remove_type(pos, object_type)
    }

    /// Whether a unit of `material` can be put on `pos`.
    pub fn can_push(&self, pos: Pos, material: Material) -> bool {
        self.layers.objects().can_push(pos, material)
    }

    /// Put a unit of `material` on `pos`, updating partition stock.
    pub fn push_material(&mut self, pos: Pos, material: Material) -> bool {
        self.layers.push_material(pos, material)
    }

    /// Whether a unit of `material` can be taken from `pos`.
    pub fn can_pop(&self, pos: Pos, material: Material) -> bool {
        self.layers.objects().can_pop(pos, material)
    }

    /// Take a unit of `material` from `pos`, updating partition stock.
    pub fn pop_material(&mut self, pos: Pos, material: Material) -> bool {
        self.layers.pop_material(pos, material)
    }

    // ── Movables ─────────────────────────────────────────────────

    /// Record `movable` entering `pos`.
    pub fn movable_entered(&mut self, pos: Pos, movable: MovableRef) -> Result<(), GridError> {
        self.layers.movables_mut().enter(pos, movable)
    }

    /// Record movable `id` leaving `pos`.
    pub fn movable_left(&mut self, pos: Pos, id: MovableId) -> Result<MovableRef, GridError> {
        self.layers.movables_mut().leave(pos, id)
    }

    /// Register `movable` as idle in the partition of `pos`.
    pub fn add_jobless(&mut self, pos: Pos, movable: MovableRef) -> bool {
        self.layers.add_jobless(pos, movable)
    }

    /// Take the longest-idle movable of `category` in the partition of `pos`.
    pub fn take_jobless(&mut self, pos: Pos, category: IdleCategory) -> Option<MovableId> {
        self.layers.take_jobless(pos, category)
    }

    // ── Searches ─────────────────────────────────────────────────

    /// Shortest path from `from` to `to` for `requester`.
    pub fn find_path(&mut self, requester: &dyn PathRequester, from: Pos, to: Pos) -> Option<Path> {
        let map = PathfinderGrid::new(&self.layers);
        self.astar.find(&map, requester, from, to)
    }

    /// Nearest tile within `[min_radius, max_radius]` of `center` fitting
    /// `search_type`.
    pub fn find_nearest(
        &mut self,
        requester: &dyn PathRequester,
        center: Pos,
        min_radius: u32,
        max_radius: u32,
        search_type: SearchType,
    ) -> Option<Pos> {
        let map = PathfinderGrid::new(&self.layers);
        self.dijkstra
            .find(&map, requester, center, min_radius, max_radius, search_type)
    }

    /// Path from `from` to the nearest tile within `max_radius` fitting
    /// `search_type`.
    pub fn find_path_to_nearest(
        &mut self,
        requester: &dyn PathRequester,
        from: Pos,
        max_radius: u32,
        search_type: SearchType,
    ) -> Option<Path> {
        let target = self.find_nearest(requester, from, 0, max_radius, search_type)?;
        self.find_path(requester, from, target)
    }

    /// Every tile of `area` fitting `search_type`, in canonical order.
    pub fn find_in_area(
        &self,
        requester: &dyn PathRequester,
        area: &MapArea,
        search_type: SearchType,
    ) -> Result<Vec<Pos>, SpaceError> {
        let tiles = self.space().compile_area(area)?;
        let map = PathfinderGrid::new(&self.layers);
        Ok(self.in_area.find(&map, requester, &tiles, search_type))
    }

    /// Whether `pos` fits `search_type` for `requester`.
    pub fn fits_search_type(
        &self,
        pos: Pos,
        search_type: SearchType,
        requester: &dyn PathRequester,
    ) -> bool {
        self.layers.fits_search_type(pos, search_type, requester)
    }

    // ── Construction overlay ─────────────────────────────────────

    /// Select (or clear) the placement tool. Returns once the overlay for
    /// the current viewport is written.
    pub fn set_placement_tool(&self, tool: Option<PlacementTool>) -> Result<(), TaskError> {
        let tasks = self.tasks_or_disconnected("construction")?;
        tasks.construction.request(
            |reply| ConstructionMsg::SetTool { tool, reply },
            self.flush_timeout(),
        )
    }

    /// Move the viewport to `area`. Returns once marks of the old viewport
    /// are cleared and the new ones written.
    ///
    /// An area that fails to compile is treated as an empty viewport.
    pub fn set_screen(&self, area: &MapArea) -> Result<(), TaskError> {
        let tiles = self.space().compile_area(area).unwrap_or_else(|e| {
            warn!(error = %e, "invalid viewport; clearing construction marks");
            Vec::new()
        });
        let tasks = self.tasks_or_disconnected("construction")?;
        tasks.construction.request(
            |reply| ConstructionMsg::SetScreen { tiles, reply },
            self.flush_timeout(),
        )
    }

    fn tasks_or_disconnected(&self, task: &'static str) -> Result<&Tasks, TaskError> {
        self.tasks.as_ref().ok_or(TaskError::Disconnected { task })
    }

    fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.config.flush_timeout_ms)
    }

    // ── Views ────────────────────────────────────────────────────

    /// Read-only view for rendering.
    pub fn graphics_view(&self) -> GraphicsView<'_> {
        GraphicsView::new(&self.layers)
    }

    /// View for input handling.
    pub fn input_view(&self) -> InputView<'_> {
        InputView::new(self)
    }

    /// Mutating view for spawning units and placing buildings.
    pub fn builder_view(&mut self) -> BuilderView<'_> {
        BuilderView::new(self)
    }

    /// The [`PathMap`](settle_path::PathMap) implementation over this grid.
    pub fn pathfinder_grid(&self) -> PathfinderGrid<'_> {
        PathfinderGrid::new(&self.layers)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Apply landmark corrections, then wait for every task to drain.
    ///
    /// Ownership changes made by corrections are queued like any other, so
    /// their border updates are flushed in the same tick.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let Some(tasks) = &self.tasks else {
            return report;
        };

        // Corrections only arrive after a landmark flush; flush first so
        // this tick sees everything queued before it.
        let timeout = self.flush_timeout();
        if let Err(e) = tasks.landmark.request(LandmarkMsg::Flush, timeout) {
            warn!(error = %e, "landmark flush failed");
            report.task_errors.push(e);
        }
        let pending: Vec<OwnerCorrection> = tasks.corrections.try_iter().collect();
        for correction in pending {
            report.corrections_applied += 1;
            for pos in correction.tiles {
                // The region may have changed since the task saw it.
                if !self.layers.blocked().is_blocked(pos) || self.owner(pos).is_some() {
                    continue;
                }
                if self.change_owner(pos, correction.player) {
                    report.tiles_corrected += 1;
                }
            }
        }

        let Some(tasks) = &self.tasks else {
            return report;
        };
        let started = Instant::now();
        if let Err(e) = tasks.border.request(BorderMsg::Flush, timeout) {
            warn!(error = %e, "border flush failed");
            report.task_errors.push(e);
        }
        if let Err(e) = tasks.construction.request(ConstructionMsg::Refresh, timeout) {
            warn!(error = %e, "construction refresh failed");
            report.task_errors.push(e);
        }
        if report.tiles_corrected > 0 {
            debug!(
                corrections = report.corrections_applied,
                tiles = report.tiles_corrected,
                flush_ms = started.elapsed().as_millis() as u64,
                "landmark corrections applied"
            );
        }
        report
    }

    /// Stop and join the background tasks. Idempotent.
    ///
    /// The grid stays usable for sim-side operations afterwards, but
    /// derived layers are no longer maintained.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let start = Instant::now();
        let mut tasks_joined = 0;
        let mut tasks_failed = 0;
        if let Some(mut tasks) = self.tasks.take() {
            for (name, ok) in [
                (tasks.border.name(), tasks.border.join()),
                (tasks.landmark.name(), tasks.landmark.join()),
                (tasks.construction.name(), tasks.construction.join()),
            ] {
                if ok {
                    tasks_joined += 1;
                } else {
                    warn!(task = name, "task thread panicked");
                    tasks_failed += 1;
                }
            }
        }
        ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            tasks_joined,
            tasks_failed,
        }
    }
}

impl Drop for MainGrid {
    fn drop(&mut self) {
        if self.tasks.is_some() {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for MainGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainGrid")
            .field("space", self.space())
            .field("config", &self.config)
            .field("running", &self.tasks.is_some())
            .finish()
    }
}
