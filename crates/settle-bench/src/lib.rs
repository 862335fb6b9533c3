//! Benchmark profiles for the Settle world grid.
//!
//! - [`reference_profile`]: 128x128 owned map with ~15% obstacles and a
//!   scattering of trees.
//! - [`stress_profile`]: 512x512 with the same densities.
//! - [`tree_positions`]: deterministic tree placement via seed.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use settle_core::{MapObject, Pos};
use settle_engine::MapLayout;
use settle_test_utils::fixtures::obstacle_layout;

/// Build a 128x128 benchmark layout owned by player 0.
pub fn reference_profile(seed: u64) -> MapLayout {
    profile(128, seed)
}

/// Build a 512x512 benchmark layout owned by player 0.
pub fn stress_profile(seed: u64) -> MapLayout {
    profile(512, seed)
}

fn profile(side: u16, seed: u64) -> MapLayout {
    let mut layout = obstacle_layout(side, side, 0.15, seed);
    for pos in tree_positions(side, side / 4, seed) {
        layout.add_object(pos, MapObject::TreeAdult);
    }
    layout
}

/// Generate `n` distinct deterministic tree positions on a `side`-square
/// map, never at the origin.
pub fn tree_positions(side: u16, n: u16, seed: u64) -> Vec<Pos> {
    let cells = u32::from(side) * u32::from(side);
    let wanted = (n as usize).min(cells.saturating_sub(1) as usize);
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x7472_6565);
    let mut occupied = std::collections::HashSet::new();
    let mut positions = Vec::with_capacity(wanted);
    while positions.len() < wanted {
        let index = rng.gen_range(1..cells);
        if occupied.insert(index) {
            let side = u32::from(side);
            positions.push(Pos::new((index % side) as i32, (index / side) as i32));
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_positions_are_deterministic_and_distinct() {
        let a = tree_positions(32, 40, 7);
        let b = tree_positions(32, 40, 7);
        assert_eq!(a, b);
        let unique: std::collections::HashSet<_> = a.iter().collect();
        assert_eq!(unique.len(), 40);
        assert!(!a.contains(&Pos::new(0, 0)));
    }

    #[test]
    fn reference_profile_has_expected_size() {
        let layout = reference_profile(1);
        assert_eq!((layout.width(), layout.height()), (128, 128));
    }
}
