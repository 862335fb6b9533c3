//! Initial map contents handed to [`MainGrid::new`](crate::MainGrid::new).

use settle_core::{LandscapeType, MapObject, MovableType, PlayerId, Pos, MAX_STACK_SIZE};

use crate::config::ConfigError;

/// A populated map: terrain, heights, owners, flags, objects and units.
///
/// Map loaders and editors build one of these; the grid copies it into its
/// own storage at construction. Setters panic on coordinates outside the
/// layout, like every other grid access.
#[derive(Clone, Debug)]
pub struct MapLayout {
    width: u16,
    height: u16,
    landscape: Vec<LandscapeType>,
    heights: Vec<u8>,
    owners: Vec<Option<PlayerId>>,
    blocked: Vec<bool>,
    protected: Vec<bool>,
    objects: Vec<(Pos, MapObject)>,
    movables: Vec<(Pos, MovableType, PlayerId)>,
}

impl MapLayout {
    /// Flat, unowned grassland of `width × height` tiles.
    pub fn new(width: u16, height: u16) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            landscape: vec![LandscapeType::Grass; n],
            heights: vec![0; n],
            owners: vec![None; n],
            blocked: vec![false; n],
            protected: vec![false; n],
            objects: Vec::new(),
            movables: Vec::new(),
        }
    }

    /// Columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(
            pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32,
            "layout tile {pos} out of bounds: {}x{}",
            self.width,
            self.height
        );
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Set the terrain of `pos`.
    pub fn set_landscape(&mut self, pos: Pos, landscape: LandscapeType) -> &mut Self {
        let i = self.index(pos);
        self.landscape[i] = landscape;
        self
    }

    /// Set the height of `pos`.
    pub fn set_height(&mut self, pos: Pos, height: u8) -> &mut Self {
        let i = self.index(pos);
        self.heights[i] = height;
        self
    }

    /// Set the owner of `pos`.
    pub fn set_owner(&mut self, pos: Pos, owner: Option<PlayerId>) -> &mut Self {
        let i = self.index(pos);
        self.owners[i] = owner;
        self
    }

    /// Give every tile to `owner`.
    pub fn fill_owner(&mut self, owner: Option<PlayerId>) -> &mut Self {
        self.owners.fill(owner);
        self
    }

    /// Set the blocked flag of `pos`.
    pub fn set_blocked(&mut self, pos: Pos, blocked: bool) -> &mut Self {
        let i = self.index(pos);
        self.blocked[i] = blocked;
        self
    }

    /// Set the protected flag of `pos`.
    pub fn set_protected(&mut self, pos: Pos, protected: bool) -> &mut Self {
        let i = self.index(pos);
        self.protected[i] = protected;
        self
    }

    /// Place `object` on `pos`. Material stacks are booked into their
    /// partition's stock when the grid is built.
    pub fn add_object(&mut self, pos: Pos, object: MapObject) -> &mut Self {
        self.index(pos);
        self.objects.push((pos, object));
        self
    }

    /// Place a unit of `movable_type` for `player` on `pos`.
    pub fn add_movable(&mut self, pos: Pos, movable_type: MovableType, player: PlayerId) -> &mut Self {
        self.index(pos);
        self.movables.push((pos, movable_type, player));
        self
    }

    pub(crate) fn landscape_at(&self, pos: Pos) -> LandscapeType {
        self.landscape[self.index(pos)]
    }

    pub(crate) fn height_at(&self, pos: Pos) -> u8 {
        self.heights[self.index(pos)]
    }

    pub(crate) fn owner_at(&self, pos: Pos) -> Option<PlayerId> {
        self.owners[self.index(pos)]
    }

    pub(crate) fn blocked_at(&self, pos: Pos) -> bool {
        self.blocked[self.index(pos)]
    }

    pub(crate) fn protected_at(&self, pos: Pos) -> bool {
        self.protected[self.index(pos)]
    }

    pub(crate) fn objects(&self) -> &[(Pos, MapObject)] {
        &self.objects
    }

    pub(crate) fn movables(&self) -> &[(Pos, MovableType, PlayerId)] {
        &self.movables
    }

    /// Check contents that setters cannot reject on their own.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pos) = self
            .positions()
            .find(|&pos| self.owner_at(pos).is_some_and(|p| !p.is_valid()))
        {
            return Err(ConfigError::LayoutMismatch {
                reason: format!("owner of {pos} exceeds player id {}", PlayerId::MAX),
            });
        }
        let mut stacked: Vec<Pos> = Vec::new();
        for &(pos, object) in &self.objects {
            if let MapObject::Stack { count, .. } = object {
                if count == 0 || count > MAX_STACK_SIZE {
                    return Err(ConfigError::LayoutMismatch {
                        reason: format!(
                            "stack at {pos} holds {count} units, expected 1..={MAX_STACK_SIZE}"
                        ),
                    });
                }
                if stacked.contains(&pos) {
                    return Err(ConfigError::LayoutMismatch {
                        reason: format!("more than one material stack at {pos}"),
                    });
                }
                stacked.push(pos);
            }
        }
        let mut occupied: Vec<Pos> = self.movables.iter().map(|m| m.0).collect();
        occupied.sort();
        if let Some(w) = occupied.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::LayoutMismatch {
                reason: format!("more than one movable at {}", w[0]),
            });
        }
        Ok(())
    }
}
