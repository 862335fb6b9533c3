//! Reusable [`MapLayout`] fixtures.
//!
//! - [`open_layout`]: unowned flat grassland.
//! - [`owned_layout`]: flat grassland owned entirely by one player.
//! - [`obstacle_layout`]: owned grassland with seeded random blocked tiles.
//! - [`ring_layout`]: one player's ring of land around an unowned pocket.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use settle_core::{PlayerId, Pos};
use settle_engine::{GridConfig, MainGrid, MapLayout};

/// Flat, unowned grassland.
pub fn open_layout(width: u16, height: u16) -> MapLayout {
    MapLayout::new(width, height)
}

/// Flat grassland where every tile belongs to `player`.
pub fn owned_layout(width: u16, height: u16, player: PlayerId) -> MapLayout {
    let mut layout = MapLayout::new(width, height);
    layout.fill_owner(Some(player));
    layout
}

/// [`owned_layout`] with roughly `density` of the tiles blocked.
///
/// Deterministic for a given `seed`. Tile `(0, 0)` is always left free so
/// searches have a usable source.
pub fn obstacle_layout(width: u16, height: u16, density: f64, seed: u64) -> MapLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut layout = owned_layout(width, height, PlayerId(0));
    let tiles: Vec<Pos> = layout.positions().collect();
    for pos in tiles {
        if pos != Pos::new(0, 0) && rng.gen_bool(density) {
            layout.set_blocked(pos, true);
        }
    }
    layout
}

/// `player` owns every tile whose hex distance from `center` is exactly
/// `radius`; everything else is unowned.
pub fn ring_layout(width: u16, height: u16, center: Pos, radius: u32, player: PlayerId) -> MapLayout {
    let mut layout = MapLayout::new(width, height);
    let tiles: Vec<Pos> = layout.positions().collect();
    for pos in tiles {
        if pos.hex_distance(center) == radius {
            layout.set_owner(pos, Some(player));
        }
    }
    layout
}

/// Build a grid with the default configuration.
///
/// # Panics
///
/// If the layout is rejected.
pub fn build(layout: MapLayout) -> MainGrid {
    MainGrid::new(layout, GridConfig::default()).expect("fixture layout is valid")
}
