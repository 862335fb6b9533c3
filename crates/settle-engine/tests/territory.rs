//! Integration test: ownership, partitions, landmark corrections and
//! territory claimed by towers.

use settle_core::{
    BuildingType, GridError, IdleCategory, Material, MovableType, PartitionId, PlayerId, Pos,
};
use settle_engine::{ConfigError, GridConfig, MainGrid, MapLayout, TickReport};
use settle_space::MapArea;
use settle_test_utils::fixtures::{build, open_layout, owned_layout, ring_layout};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

// ── Landmark corrections ─────────────────────────────────────────

fn block_disk(layout: &mut MapLayout, center: Pos, radius: u32) {
    for pos in layout.positions().collect::<Vec<_>>() {
        if pos.hex_distance(center) <= radius {
            layout.set_blocked(pos, true);
        }
    }
}

/// Surround `pos` with `player`'s land and return the report of the next
/// tick.
fn surround(grid: &mut MainGrid, pos: Pos, player: PlayerId) -> TickReport {
    let space = *grid.space();
    for n in space.neighbours(pos) {
        assert!(grid.change_owner(n, player));
    }
    grid.tick()
}

#[test]
fn enclosed_pocket_is_handed_to_encloser() {
    let center = Pos::new(5, 5);
    let gap = Pos::new(7, 5);
    let mut layout = ring_layout(12, 12, center, 2, P1);
    layout.set_owner(gap, None);
    block_disk(&mut layout, center, 1);
    let mut grid = build(layout);

    // The pocket still leaks through the gap.
    assert!(grid.change_owner(Pos::new(0, 0), P1));
    let report = grid.tick();
    assert!(report.is_clean());
    assert_eq!(report.tiles_corrected, 0);
    assert_eq!(grid.owner(center), None);

    // Closing the ring encloses the 7-tile disk.
    assert!(grid.change_owner(gap, P1));
    let report = grid.tick();
    assert!(report.is_clean(), "{report:?}");
    assert!(report.corrections_applied >= 1);
    assert_eq!(report.tiles_corrected, 7);

    let ring_partition = grid.partition(gap);
    for pos in grid.space().compile_area(&MapArea::disk(center, 2)).unwrap() {
        assert_eq!(grid.owner(pos), Some(P1), "owner of {pos}");
        assert_eq!(grid.partition(pos), ring_partition);
    }
    // Outside stays unowned.
    assert_eq!(grid.owner(Pos::new(5, 9)), None);
    assert_eq!(grid.owner(Pos::new(10, 5)), None);

    // Re-flooding after the corrections finds nothing new to hand out.
    let report = grid.tick();
    assert_eq!(report.tiles_corrected, 0);
}

#[test]
fn pocket_touching_the_edge_is_left_alone() {
    // A ring around a corner is open towards the map edge.
    let mut layout = ring_layout(8, 8, Pos::new(0, 0), 2, P1);
    block_disk(&mut layout, Pos::new(0, 0), 1);
    let mut grid = build(layout);
    assert!(grid.release_owner(Pos::new(2, 2)));
    assert!(grid.change_owner(Pos::new(2, 2), P1));
    let report = grid.tick();
    assert_eq!(report.tiles_corrected, 0);
    assert_eq!(grid.owner(Pos::new(0, 0)), None);
}

#[test]
fn enemy_enclave_is_kept() {
    let enclave = Pos::new(5, 5);
    let mut grid = build(open_layout(12, 12));
    grid.set_blocked(enclave, true);
    assert!(grid.change_owner(enclave, P1));
    assert!(grid.tick().is_clean());

    let report = surround(&mut grid, enclave, P0);
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.corrections_applied, 0);
    assert_eq!(grid.owner(enclave), Some(P1));
}

#[test]
fn open_hole_stays_unowned() {
    let hole = Pos::new(5, 5);
    let mut grid = build(open_layout(12, 12));
    let report = surround(&mut grid, hole, P0);
    assert_eq!(report.tiles_corrected, 0);
    assert_eq!(grid.owner(hole), None);
    assert_eq!(grid.landmark(hole), None);

    // Once the hole is blocked, the next ownership change closes it.
    grid.set_blocked(hole, true);
    assert!(grid.release_owner(Pos::new(6, 5)));
    assert!(grid.change_owner(Pos::new(6, 5), P0));
    let report = grid.tick();
    assert_eq!(report.tiles_corrected, 1);
    assert_eq!(grid.owner(hole), Some(P0));
}

#[test]
fn region_limit_stops_large_pockets() {
    let center = Pos::new(8, 8);
    let gap = Pos::new(13, 8);
    let mut layout = ring_layout(17, 17, center, 5, P1);
    layout.set_owner(gap, None);
    block_disk(&mut layout, center, 4);
    let config = GridConfig {
        landmark_region_limit: 10,
        ..GridConfig::default()
    };
    let mut grid = MainGrid::new(layout, config).unwrap();
    assert!(grid.change_owner(gap, P1));
    let report = grid.tick();
    assert_eq!(report.tiles_corrected, 0);
    assert_eq!(grid.owner(center), None);
}

// ── Partitions ───────────────────────────────────────────────────

#[test]
fn split_and_merge_keep_registries() {
    let mut grid = build(owned_layout(7, 1, P0));
    let left = Pos::new(1, 0);
    let right = Pos::new(5, 0);
    let initial = grid.partition(left);
    assert!(initial.is_some());
    assert_eq!(grid.partition(right), initial);

    assert!(grid.push_material(left, Material::Stone));
    assert!(grid.push_material(left, Material::Stone));
    assert!(grid.push_material(right, Material::Stone));
    let bearer = grid
        .builder_view()
        .spawn_movable(Pos::new(0, 0), MovableType::Bearer, P0)
        .unwrap();

    // Cutting the row in two.
    assert!(grid.change_owner(Pos::new(3, 0), P1));
    let (a, b) = (grid.partition(left), grid.partition(right));
    assert!(a.is_some() && b.is_some());
    assert_ne!(a, b);
    assert_eq!(grid.layers().partitions().partition_count(), 3);
    // The component east of the cut is reached first and keeps the id.
    assert_eq!(b, initial);

    // Reconnecting merges everything back into one partition.
    assert!(grid.change_owner(Pos::new(3, 0), P0));
    let merged = grid.partition(left);
    assert_eq!(grid.partition(right), merged);
    assert_eq!(grid.layers().partitions().partition_count(), 1);
    let manager = grid.partition_manager(left).unwrap();
    assert_eq!(manager.stock(Material::Stone), 3);
    assert_eq!(manager.size(), 7);
    assert_eq!(
        grid.take_jobless(right, IdleCategory::Bearer),
        Some(bearer.id)
    );
}

#[test]
fn reserved_player_id_never_owns_tiles() {
    let reserved = PlayerId(PlayerId::NONE_SLOT);
    let mut layout = open_layout(4, 4);
    layout.set_owner(Pos::new(1, 1), Some(reserved));
    assert!(matches!(
        MainGrid::new(layout, GridConfig::default()),
        Err(ConfigError::LayoutMismatch { .. })
    ));
}

#[test]
#[should_panic(expected = "reserved for unowned tiles")]
fn change_owner_rejects_reserved_player_id() {
    let mut grid = build(open_layout(4, 4));
    grid.change_owner(Pos::new(2, 2), PlayerId(PlayerId::NONE_SLOT));
}

#[test]
fn released_tiles_leave_every_partition() {
    let mut grid = build(owned_layout(3, 3, P0));
    for pos in grid.space().canonical_ordering().collect::<Vec<_>>() {
        grid.release_owner(pos);
    }
    assert_eq!(grid.layers().partitions().partition_count(), 0);
    assert_eq!(grid.partition(Pos::new(1, 1)), PartitionId::NONE);
    assert!(grid.partition_manager(Pos::new(1, 1)).is_none());
    assert!(!grid.release_owner(Pos::new(1, 1)));
}

#[test]
fn occupy_area_counts_changed_tiles() {
    let mut grid = build(owned_layout(9, 9, P0));
    let claimed = grid
        .occupy_area(&MapArea::disk(Pos::new(4, 4), 1), P1)
        .unwrap();
    assert_eq!(claimed, 7);
    let again = grid
        .occupy_area(&MapArea::disk(Pos::new(4, 4), 1), P1)
        .unwrap();
    assert_eq!(again, 0);
    assert!(grid
        .occupy_area(&MapArea::disk(Pos::new(20, 4), 1), P1)
        .is_err());
}

// ── Builder view ─────────────────────────────────────────────────

#[test]
fn tower_claims_territory() {
    let mut layout = open_layout(24, 24);
    let anchor = Pos::new(9, 9);
    for pos in layout.positions().collect::<Vec<_>>() {
        if pos.hex_distance(Pos::new(10, 10)) <= 2 {
            layout.set_owner(pos, Some(P0));
        }
    }
    let mut grid = build(layout);
    grid.builder_view()
        .place_building(anchor, BuildingType::Tower, P0)
        .unwrap();

    let radius = GridConfig::default().tower_radius;
    assert_eq!(grid.owner(Pos::new(9 + radius as i32, 9)), Some(P0));
    assert_eq!(grid.owner(Pos::new(10 + radius as i32, 9)), None);
    for &(dx, dy) in BuildingType::Tower.footprint() {
        assert!(grid.layers().blocked().is_blocked(anchor.offset(dx, dy)));
    }
    assert!(grid.tick().is_clean());
    assert!(grid.is_border(Pos::new(9 + radius as i32, 9)));
}

#[test]
fn building_outside_territory_is_refused() {
    let mut grid = build(owned_layout(10, 10, P0));
    grid.release_owner(Pos::new(6, 6));
    assert_eq!(
        grid.builder_view()
            .place_building(Pos::new(5, 5), BuildingType::Farm, P0),
        Err(GridError::NotPlaceable {
            pos: Pos::new(5, 5),
            building_type: BuildingType::Farm
        })
    );
    assert_eq!(
        grid.builder_view()
            .spawn_movable(Pos::new(6, 6), MovableType::Digger, P0),
        Err(GridError::NotOwned {
            pos: Pos::new(6, 6),
            player: P0
        })
    );
}

#[test]
fn movable_occupancy_is_exclusive() {
    let mut grid = build(owned_layout(4, 4, P0));
    let unit = grid
        .builder_view()
        .spawn_movable(Pos::new(1, 1), MovableType::Soldier, P0)
        .unwrap();
    let moved = grid.movable_left(Pos::new(1, 1), unit.id).unwrap();
    grid.movable_entered(Pos::new(2, 1), moved).unwrap();
    assert_eq!(grid.movable_at(Pos::new(1, 1)), None);
    let other = grid
        .builder_view()
        .spawn_movable(Pos::new(1, 1), MovableType::Bearer, P0)
        .unwrap();
    assert_eq!(
        grid.movable_entered(Pos::new(1, 1), moved),
        Err(GridError::TileOccupied {
            pos: Pos::new(1, 1),
            occupant: other.id
        })
    );
    assert!(grid.movable_left(Pos::new(3, 3), unit.id).is_err());
}
