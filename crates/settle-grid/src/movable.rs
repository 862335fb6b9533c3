//! Which movable stands on which tile.

use settle_core::{GridError, MovableId, MovableRef, Pos};
use settle_space::HexSpace;

/// At most one movable per tile.
#[derive(Debug)]
pub struct MovableGrid {
    space: HexSpace,
    movables: Vec<Option<MovableRef>>,
}

impl MovableGrid {
    /// No tile occupied.
    pub fn new(space: HexSpace) -> Self {
        Self {
            space,
            movables: vec![None; space.tile_count()],
        }
    }

    /// The movable on `pos`, if any.
    pub fn movable_at(&self, pos: Pos) -> Option<MovableRef> {
        self.movables[self.space.index(pos)]
    }

    /// Record `movable` entering `pos`.
    ///
    /// Re-entering a tile the movable already occupies is a no-op.
    pub fn enter(&mut self, pos: Pos, movable: MovableRef) -> Result<(), GridError> {
        let slot = &mut self.movables[self.space.index(pos)];
        match *slot {
            Some(occupant) if occupant.id != movable.id => Err(GridError::TileOccupied {
                pos,
                occupant: occupant.id,
            }),
            _ => {
                *slot = Some(movable);
                Ok(())
            }
        }
    }

    /// Record movable `id` leaving `pos`.
    pub fn leave(&mut self, pos: Pos, id: MovableId) -> Result<MovableRef, GridError> {
        let slot = &mut self.movables[self.space.index(pos)];
        match *slot {
            Some(occupant) if occupant.id == id => {
                *slot = None;
                Ok(occupant)
            }
            _ => Err(GridError::NotOccupant { pos, movable: id }),
        }
    }
}
