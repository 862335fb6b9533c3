//! Settle: a hex-grid world model for settlement simulations.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Settle sub-crates. For most users, adding `settle` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use settle::prelude::*;
//!
//! // A 16×16 map owned by player 0, with one mature tree.
//! let mut layout = MapLayout::new(16, 16);
//! layout
//!     .fill_owner(Some(PlayerId(0)))
//!     .add_object(Pos::new(9, 4), MapObject::TreeAdult);
//! let mut grid = MainGrid::new(layout, GridConfig::default()).unwrap();
//!
//! let worker = Requester::confined(PlayerId(0));
//! let path = grid
//!     .find_path_to_nearest(&worker, Pos::new(2, 2), 10, SearchType::CuttableTree)
//!     .unwrap();
//! assert_eq!(path.destination(), Pos::new(9, 4));
//!
//! // Ownership changes are applied at once; borders converge on tick.
//! grid.change_owner(Pos::new(5, 5), PlayerId(1));
//! assert!(grid.tick().is_clean());
//! assert!(grid.is_border(Pos::new(5, 5)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `settle-core` | Positions, directions, IDs, tile enums, errors |
//! | [`space`] | `settle-space` | `HexSpace` geometry and area shapes |
//! | [`path`] | `settle-path` | `PathMap` and the three searches |
//! | [`grid`] | `settle-grid` | Per-tile layers, partitions, search predicates |
//! | [`engine`] | `settle-engine` | `MainGrid`, background tasks, consumer views |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`settle-core`).
pub use settle_core as types;

/// Hex geometry and area shapes (`settle-space`).
///
/// [`space::HexSpace`] owns bounds checks, flat indexing, neighbours and
/// the hex metric; [`space::MapArea`] shapes compile to tile lists.
pub use settle_space as space;

/// Searches over any [`path::PathMap`] (`settle-path`).
///
/// [`path::AStar`] for single-target paths, [`path::Dijkstra`] for the
/// nearest matching tile and [`path::InAreaFinder`] for area scans.
pub use settle_path as path;

/// Per-tile layers and partitions (`settle-grid`).
pub use settle_grid as grid;

/// The world grid facade (`settle-engine`).
///
/// [`engine::MainGrid`] plus its background tasks and views.
pub use settle_engine as engine;

/// Common imports for typical Settle usage.
///
/// ```rust
/// use settle::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use settle_core::{
        BuildingType, Direction, GridError, IdleCategory, LandscapeType, MapObject,
        MapObjectType, Material, MovableId, MovableRef, MovableType, PartitionId, PathRequester,
        PlayerId, Pos, Requester, SearchType,
    };

    // Geometry
    pub use settle_space::{HexSpace, MapArea, SpaceError};

    // Searches
    pub use settle_path::{Path, PathMap, SearchObserver};

    // Grid facade
    pub use settle_engine::{
        ConfigError, GridConfig, MainGrid, MapLayout, PlacementTool, TaskError, TickReport,
    };
}
