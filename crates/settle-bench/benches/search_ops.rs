//! Criterion micro-benchmarks for the three grid searches.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use settle_bench::{reference_profile, stress_profile};
use settle_core::{PlayerId, Pos, Requester, SearchType};
use settle_engine::{GridConfig, MainGrid};
use settle_path::{AStar, PathMap};
use settle_space::MapArea;

fn grid(layout: settle_engine::MapLayout) -> MainGrid {
    MainGrid::new(layout, GridConfig::default()).unwrap()
}

/// Benchmark: corner-to-corner A* on the 128x128 reference map.
fn bench_astar_reference(c: &mut Criterion) {
    let mut grid = grid(reference_profile(42));
    let requester = Requester::confined(PlayerId(0));
    let to = (0..128)
        .rev()
        .map(|i| Pos::new(i, i))
        .find(|&p| !grid.layers().blocked().is_blocked(p))
        .unwrap();

    c.bench_function("astar_reference_128", |b| {
        b.iter(|| {
            let path = grid.find_path(&requester, Pos::new(0, 0), to);
            black_box(&path);
        });
    });
}

/// Benchmark: A* across the 512x512 stress map with a fresh searcher per
/// iteration, measuring buffer allocation too.
fn bench_astar_stress_cold(c: &mut Criterion) {
    let grid = grid(stress_profile(42));
    let requester = Requester::confined(PlayerId(0));
    let map = grid.pathfinder_grid();
    let to = Pos::new(i32::from(map.width()) - 1, i32::from(map.height()) / 2);

    c.bench_function("astar_stress_512_cold", |b| {
        b.iter(|| {
            let path = AStar::new().find(&map, &requester, Pos::new(0, 0), to);
            black_box(&path);
        });
    });
}

/// Benchmark: nearest tree within radius 24 from the map centre.
fn bench_nearest_tree(c: &mut Criterion) {
    let mut grid = grid(reference_profile(42));
    let requester = Requester::confined(PlayerId(0));

    c.bench_function("nearest_tree_r24", |b| {
        b.iter(|| {
            let found =
                grid.find_nearest(&requester, Pos::new(64, 64), 0, 24, SearchType::CuttableTree);
            black_box(found);
        });
    });
}

/// Benchmark: in-area scan over a 64x64 viewport.
fn bench_in_area(c: &mut Criterion) {
    let grid = grid(reference_profile(42));
    let requester = Requester::free(PlayerId(0));
    let area = MapArea::rect(Pos::new(32, 32), Pos::new(95, 95));

    c.bench_function("in_area_cuttable_64x64", |b| {
        b.iter(|| {
            let found = grid
                .find_in_area(&requester, &area, SearchType::CuttableTree)
                .unwrap();
            black_box(found.len());
        });
    });
}

criterion_group!(
    benches,
    bench_astar_reference,
    bench_astar_stress_cold,
    bench_nearest_tree,
    bench_in_area
);
criterion_main!(benches);
