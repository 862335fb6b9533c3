//! Ordered object stacks per tile, including material stacks.

use settle_core::{MapObject, MapObjectType, Material, Pos, MAX_STACK_SIZE};
use settle_space::HexSpace;
use smallvec::SmallVec;

/// Per-tile object stack. Insertion order is stacking order; the head is
/// the most recently added object.
type ObjectStack = SmallVec<[MapObject; 2]>;

/// Objects placed on tiles.
#[derive(Debug)]
pub struct ObjectsGrid {
    space: HexSpace,
    stacks: Vec<ObjectStack>,
}

impl ObjectsGrid {
    /// No objects anywhere.
    pub fn new(space: HexSpace) -> Self {
        Self {
            space,
            stacks: vec![ObjectStack::new(); space.tile_count()],
        }
    }

    /// All objects on `pos`, bottom first.
    pub fn objects(&self, pos: Pos) -> &[MapObject] {
        &self.stacks[self.space.index(pos)]
    }

    /// The most recently added object on `pos`.
    pub fn head(&self, pos: Pos) -> Option<&MapObject> {
        self.objects(pos).last()
    }

    /// Put `object` on top of the stack at `pos`.
    pub fn add(&mut self, pos: Pos, object: MapObject) {
        let i = self.space.index(pos);
        self.stacks[i].push(object);
    }

    /// Remove the lowest object of type `object_type` from `pos`.
    pub fn remove_type(&mut self, pos: Pos, object_type: MapObjectType) -> Option<MapObject> {
        let stack = &mut self.stacks[self.space.index(pos)];
        let at = stack.iter().position(|o| o.object_type() == object_type)?;
        Some(stack.remove(at))
    }

    /// The lowest object of type `object_type` on `pos`.
    pub fn get_type(&self, pos: Pos, object_type: MapObjectType) -> Option<&MapObject> {
        self.objects(pos)
            .iter()
            .find(|o| o.object_type() == object_type)
    }

    /// Whether `pos` holds an object of type `object_type`.
    pub fn has_type(&self, pos: Pos, object_type: MapObjectType) -> bool {
        self.get_type(pos, object_type).is_some()
    }

    /// Whether any in-bounds neighbour of `pos` holds an object of type
    /// `object_type`.
    pub fn has_type_in_neighbours(&self, pos: Pos, object_type: MapObjectType) -> bool {
        self.space
            .neighbours(pos)
            .into_iter()
            .any(|n| self.has_type(n, object_type))
    }

    /// Whether `pos` holds an object of `object_type` that can still be cut.
    ///
    /// Stones are cuttable while capacity remains; other types always are.
    pub fn has_cuttable(&self, pos: Pos, object_type: MapObjectType) -> bool {
        match self.get_type(pos, object_type) {
            Some(MapObject::Stone { capacity }) => *capacity > 0,
            Some(_) => true,
            None => false,
        }
    }

    /// Material and unit count of the stack on `pos`.
    pub fn stack_at(&self, pos: Pos) -> Option<(Material, u8)> {
        self.objects(pos).iter().find_map(|o| match *o {
            MapObject::Stack { material, count } => Some((material, count)),
            _ => None,
        })
    }

    /// Whether one unit of `material` can be put on `pos`.
    pub fn can_push(&self, pos: Pos, material: Material) -> bool {
        match self.stack_at(pos) {
            None => true,
            Some((m, count)) => m == material && count < MAX_STACK_SIZE,
        }
    }

    /// Put one unit of `material` on `pos`, starting a stack if needed.
    /// Returns `false` if the tile's stack holds another material or is full.
    pub fn push_material(&mut self, pos: Pos, material: Material) -> bool {
        if !self.can_push(pos, material) {
            return false;
        }
        let stack = &mut self.stacks[self.space.index(pos)];
        for object in stack.iter_mut() {
            if let MapObject::Stack { count, .. } = object {
                *count += 1;
                return true;
            }
        }
        stack.push(MapObject::Stack { material, count: 1 });
        true
    }

    /// Whether one unit of `material` can be taken from `pos`.
    pub fn can_pop(&self, pos: Pos, material: Material) -> bool {
        matches!(self.stack_at(pos), Some((m, count)) if m == material && count > 0)
    }

    /// Take one unit of `material` from `pos`; the stack disappears when
    /// empty. Returns `false` if there is no such unit.
    pub fn pop_material(&mut self, pos: Pos, material: Material) -> bool {
        if !self.can_pop(pos, material) {
            return false;
        }
        let stack = &mut self.stacks[self.space.index(pos)];
        let Some(at) = stack
            .iter()
            .position(|o| o.object_type() == MapObjectType::Stack)
        else {
            return false;
        };
        if let MapObject::Stack { count, .. } = &mut stack[at] {
            *count -= 1;
            if *count == 0 {
                stack.remove(at);
            }
        }
        true
    }
}
