//! Searches over hexagonal path maps.
//!
//! Three searches share one map capability, [`PathMap`]:
//!
//! - [`AStar`]: shortest path between two tiles,
//! - [`Dijkstra`]: nearest tile within a radius band that fits a
//!   [`SearchType`](settle_core::SearchType),
//! - [`InAreaFinder`]: all fitting tiles of a compiled area.
//!
//! The stateful searchers keep their per-tile scratch buffers between
//! calls. Every search has an `_observed` variant taking a
//! [`SearchObserver`] for open/closed-set visualisation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod area;
pub mod astar;
mod buffers;
pub mod dijkstra;
pub mod map;
pub mod path;

pub use area::InAreaFinder;
pub use astar::AStar;
pub use dijkstra::Dijkstra;
pub use map::{NoopObserver, PathMap, RecordingObserver, SearchObserver};
pub use path::Path;
