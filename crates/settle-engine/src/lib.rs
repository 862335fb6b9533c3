//! The Settle world grid: [`MainGrid`] and its background maintenance.
//!
//! [`MainGrid`] owns every per-tile layer of one map and is driven by the
//! simulation thread. Border flags, landmark (enclosure) values and the
//! construction overlay are derived layers maintained by three background
//! tasks; [`MainGrid::tick`] is the synchronisation point after which they
//! reflect every change made before it.
//!
//! Consumers borrow narrow views: [`GraphicsView`] for rendering,
//! [`InputView`] for hit-testing and the placement overlay,
//! [`BuilderView`] for spawning and placing, and [`PathfinderGrid`] for
//! running the searches of `settle-path` directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod grid;
pub mod layout;
pub mod tasks;
pub mod views;

pub use config::{ConfigError, GridConfig, MAX_TOWER_RADIUS};
pub use grid::{MainGrid, ShutdownReport, TickReport};
pub use layout::MapLayout;
pub use tasks::construction::PlacementTool;
pub use tasks::{OwnerCorrection, TaskError};
pub use views::{BuilderView, GraphicsView, InputView, PathfinderGrid};
