//! Layered per-tile storage for the Settle world grid.
//!
//! The grids here are plain flat arrays indexed by
//! [`HexSpace::index`](settle_space::HexSpace::index) and owned by the
//! simulation thread, with one exception: the fields read or written by
//! background tasks live in [`SharedLayers`] as relaxed atomics, each with
//! a single writer enforced by construction.
//!
//! [`GridLayers`] bundles everything for one map and hosts the
//! cross-grid operations (ownership-aware blocking, search predicates,
//! material bookkeeping, idle worker registries).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blocked;
pub mod landscape;
pub mod layers;
pub mod movable;
pub mod objects;
pub mod partitions;
pub mod placement;
pub mod predicate;
pub mod shared;

pub use blocked::BlockedGrid;
pub use landscape::LandscapeGrid;
pub use layers::GridLayers;
pub use movable::MovableGrid;
pub use objects::ObjectsGrid;
pub use partitions::{PartitionManager, PartitionsGrid};
pub use placement::construction_mark;
pub use predicate::fits_search_type;
pub use shared::{
    BorderWriter, ConstructionMarkWriter, LandmarkWriter, LayerWriters, SharedLayers,
    MAX_CONSTRUCT_MARK,
};
