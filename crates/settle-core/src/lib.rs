//! Core types and traits for the Settle world grid.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: tile positions
//! and hex directions, player/partition/movable identifiers, the per-tile
//! enums (landscape, map objects, materials), the closed set of search
//! types, and the [`PathRequester`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod pos;
pub mod tile;
pub mod traits;

pub use error::GridError;
pub use id::{MovableId, PartitionId, PlayerId};
pub use pos::{Direction, Pos};
pub use tile::{
    BuildingType, IdleCategory, LandscapeType, MapObject, MapObjectType, Material, MovableRef,
    MovableType, SearchType, MAX_STACK_SIZE,
};
pub use traits::{PathRequester, Requester};
