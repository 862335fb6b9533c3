//! Terrain type and height per tile.

use std::sync::Arc;

use settle_core::{LandscapeType, Pos};
use settle_space::HexSpace;

use crate::shared::SharedLayers;

/// Landscape types live here; heights live in the shared layers because
/// the construction task reads them.
#[derive(Debug)]
pub struct LandscapeGrid {
    space: HexSpace,
    landscape: Vec<LandscapeType>,
    shared: Arc<SharedLayers>,
}

impl LandscapeGrid {
    /// All-grass, flat terrain.
    pub fn new(shared: Arc<SharedLayers>) -> Self {
        let space = *shared.space();
        Self {
            space,
            landscape: vec![LandscapeType::default(); space.tile_count()],
            shared,
        }
    }

    /// Terrain type of `pos`.
    pub fn landscape(&self, pos: Pos) -> LandscapeType {
        self.landscape[self.space.index(pos)]
    }

    /// Set the terrain type of `pos`.
    pub fn set_landscape(&mut self, pos: Pos, landscape: LandscapeType) {
        let i = self.space.index(pos);
        self.landscape[i] = landscape;
    }

    /// Height of `pos`.
    pub fn height(&self, pos: Pos) -> u8 {
        self.shared.height(pos)
    }

    /// Set the height of `pos`.
    pub fn set_height(&mut self, pos: Pos, height: u8) {
        self.shared.set_height(pos, height);
    }

    /// Whether any in-bounds neighbour of `pos` has terrain `landscape`.
    pub fn has_neighbour_landscape(&self, pos: Pos, landscape: LandscapeType) -> bool {
        self.space
            .neighbours(pos)
            .into_iter()
            .any(|n| self.landscape(n) == landscape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_neighbour_detection() {
        let (shared, _) = SharedLayers::new(HexSpace::new(4, 4).unwrap());
        let mut g = LandscapeGrid::new(shared);
        g.set_landscape(Pos::new(2, 2), LandscapeType::Water);
        assert!(g.has_neighbour_landscape(Pos::new(1, 1), LandscapeType::Water));
        assert!(!g.has_neighbour_landscape(Pos::new(0, 0), LandscapeType::Water));
        // A tile is not its own neighbour.
        assert!(!g.has_neighbour_landscape(Pos::new(2, 2), LandscapeType::Water));
    }

    #[test]
    fn height_goes_through_shared_layer() {
        let (shared, _) = SharedLayers::new(HexSpace::new(2, 2).unwrap());
        let mut g = LandscapeGrid::new(Arc::clone(&shared));
        g.set_height(Pos::new(1, 0), 5);
        assert_eq!(shared.height(Pos::new(1, 0)), 5);
        assert_eq!(g.height(Pos::new(1, 0)), 5);
    }
}
