//! Hexagonal coordinate space for the Settle world grid.
//!
//! [`HexSpace`] owns the map dimensions and everything derived from them:
//! bounds checks, flat indexing, the six-neighbour enumeration, hex
//! distance and the search heuristic. Area queries are expressed as
//! [`MapArea`] values and compiled to tile lists in canonical
//! (y-then-x) order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod area;
pub mod error;
pub mod hex;

pub use area::MapArea;
pub use error::SpaceError;
pub use hex::{HexSpace, HEURISTIC_UNIT, STEP_COST};
