//! Error types for grid mutations that can legitimately fail at runtime.
//!
//! Out-of-bounds coordinates are not represented here: they are programming
//! errors and panic at the access site.

use std::error::Error;
use std::fmt;

use crate::id::{MovableId, PlayerId};
use crate::pos::Pos;
use crate::tile::BuildingType;

/// Errors from occupancy, spawning and building placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Another movable already occupies the tile.
    TileOccupied {
        /// The contested tile.
        pos: Pos,
        /// The movable currently on it.
        occupant: MovableId,
    },
    /// A movable tried to leave a tile it does not occupy.
    NotOccupant {
        /// The tile.
        pos: Pos,
        /// The movable that claimed to leave.
        movable: MovableId,
    },
    /// The tile is blocked.
    Blocked {
        /// The blocked tile.
        pos: Pos,
    },
    /// The tile is not part of the player's territory.
    NotOwned {
        /// The tile.
        pos: Pos,
        /// The player that needed to own it.
        player: PlayerId,
    },
    /// The building's footprint does not fit at the anchor tile.
    NotPlaceable {
        /// Anchor tile.
        pos: Pos,
        /// Building that was being placed.
        building_type: BuildingType,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileOccupied { pos, occupant } => {
                write!(f, "tile {pos} is occupied by movable {occupant}")
            }
            Self::NotOccupant { pos, movable } => {
                write!(f, "movable {movable} does not occupy tile {pos}")
            }
            Self::Blocked { pos } => write!(f, "tile {pos} is blocked"),
            Self::NotOwned { pos, player } => {
                write!(f, "tile {pos} is not owned by player {player}")
            }
            Self::NotPlaceable { pos, building_type } => {
                write!(f, "{building_type:?} cannot be placed at {pos}")
            }
        }
    }
}

impl Error for GridError {}
