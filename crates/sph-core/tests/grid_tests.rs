use sph_core::error::SphError;
use sph_core::grid::CellLinkedList;
use sph_core::math::Vecd;
use sph_core::shapes::BoundingBox;

fn unit_box() -> BoundingBox {
    BoundingBox::new(Vecd::ZERO, Vecd::ONE)
}

/// Sorted physical neighbor set of `pos` within `cutoff`.
fn neighbor_set(grid: &CellLinkedList, positions: &[Vecd], pos: Vecd, cutoff: f64) -> Vec<u32> {
    let mut found = Vec::new();
    grid.query_neighbors(pos, |idx| {
        if grid.displacement(pos, positions[idx as usize]).length() <= cutoff {
            found.push(idx);
        }
    });
    found.sort_unstable();
    found
}

#[test]
fn test_grid_build_and_query() {
    let mut grid = CellLinkedList::new(unit_box(), 0.1, [false, false]).unwrap();

    // Two close particles, one far
    let positions = vec![
        Vecd::new(0.11, 0.11),
        Vecd::new(0.15, 0.12),
        Vecd::new(0.9, 0.9),
    ];
    grid.build(&positions).unwrap();

    let mut neighbors = Vec::new();
    grid.query_neighbors(positions[0], |idx| neighbors.push(idx));

    assert!(neighbors.contains(&0), "should find self");
    assert!(neighbors.contains(&1), "should find nearby particle");
    assert!(!neighbors.contains(&2), "should NOT find far particle");
}

#[test]
fn test_grid_all_particles_found() {
    let mut grid = CellLinkedList::new(unit_box(), 0.05, [true, true]).unwrap();

    let positions: Vec<Vecd> = (0..1000)
        .map(|i| {
            let t = i as f64 / 1000.0;
            let angle = t * std::f64::consts::TAU * 20.0;
            let r = 0.05 + t * 0.4;
            Vecd::new(0.5 + angle.cos() * r, 0.5 + angle.sin() * r)
        })
        .collect();
    grid.build(&positions).unwrap();
    assert_eq!(grid.particle_count(), 1000);

    for (i, pos) in positions.iter().enumerate() {
        let mut found_self = false;
        grid.query_neighbors(*pos, |idx| {
            if idx == i as u32 {
                found_self = true;
            }
        });
        assert!(found_self, "particle {} not found in its own cell query", i);
    }
}

#[test]
fn test_grid_empty() {
    let mut grid = CellLinkedList::new(unit_box(), 0.2, [true, true]).unwrap();
    grid.build(&[]).unwrap();

    let mut count = 0;
    grid.query_neighbors(Vecd::splat(0.5), |_| count += 1);
    assert_eq!(count, 0);
}

#[test]
fn test_grid_rebuild_moves_particles_and_bumps_generation() {
    let mut grid = CellLinkedList::new(unit_box(), 0.2, [false, false]).unwrap();

    grid.build(&[Vecd::splat(0.1), Vecd::splat(0.9)]).unwrap();
    let first = grid.generation();
    grid.build(&[Vecd::splat(0.9), Vecd::splat(0.1)]).unwrap();
    assert_eq!(grid.generation(), first + 1);

    let mut neighbors = Vec::new();
    grid.query_neighbors(Vecd::splat(0.1), |idx| neighbors.push(idx));
    assert_eq!(neighbors, vec![1], "particle 1 should be near the origin after rebuild");
}

#[test]
fn test_cells_around_are_distinct() {
    // Three cells per axis: every wrapped neighbor is also a direct one
    let grid = CellLinkedList::new(unit_box(), 0.3, [true, true]).unwrap();
    assert_eq!(grid.dims(), [3, 3]);
    let mut cells: Vec<usize> = grid.cells_around(Vecd::splat(0.05)).collect();
    assert_eq!(cells.len(), 9);
    cells.sort_unstable();
    cells.dedup();
    assert_eq!(cells.len(), 9);

    // Non-periodic corner only sees four cells
    let grid = CellLinkedList::new(unit_box(), 0.3, [false, false]).unwrap();
    assert_eq!(grid.cells_around(Vecd::splat(0.05)).count(), 4);
}

#[test]
fn test_periodic_neighbors_across_edge() {
    let cutoff = 0.1;
    let mut grid = CellLinkedList::new(unit_box(), cutoff, [true, true]).unwrap();
    let positions = vec![
        Vecd::new(0.02, 0.5),
        Vecd::new(0.97, 0.5),
        Vecd::new(0.5, 0.5),
    ];
    grid.build(&positions).unwrap();

    let found = neighbor_set(&grid, &positions, positions[0], cutoff);
    assert_eq!(found, vec![0, 1], "image across x = 0 should be a neighbor");
    let d = grid.displacement(positions[0], positions[1]);
    assert!((d.x - 0.05).abs() < 1e-12, "minimum image: {}", d.x);
}

#[test]
fn test_periodic_consistency_under_domain_shift() {
    let cutoff = 0.12;
    let mut grid = CellLinkedList::new(unit_box(), cutoff, [true, true]).unwrap();
    let n = 12;
    let positions: Vec<Vecd> = (0..n * n)
        .map(|k| Vecd::new((k % n) as f64 + 0.5, (k / n) as f64 + 0.5) / n as f64)
        .collect();
    grid.build(&positions).unwrap();

    for (i, pos) in positions.iter().enumerate() {
        let near_edge = pos.x < cutoff || pos.x > 1.0 - cutoff || pos.y < cutoff || pos.y > 1.0 - cutoff;
        if !near_edge {
            continue;
        }
        let here = neighbor_set(&grid, &positions, *pos, cutoff);
        for shift in [Vecd::X, Vecd::Y, -Vecd::X, Vecd::ONE] {
            let mirrored = neighbor_set(&grid, &positions, *pos + shift, cutoff);
            assert_eq!(here, mirrored, "particle {} shifted by {:?}", i, shift);
        }
    }
}

#[test]
fn test_out_of_domain_on_closed_axis() {
    let mut grid = CellLinkedList::new(unit_box(), 0.1, [true, false]).unwrap();

    // x wraps
    grid.build(&[Vecd::new(1.3, 0.5)]).unwrap();

    let err = grid.build(&[Vecd::splat(0.5), Vecd::new(0.5, 1.2)]).unwrap_err();
    match err {
        SphError::ParticleOutOfDomain { particle, .. } => assert_eq!(particle, 1),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_cutoff_larger_than_half_periodic_box_rejected() {
    let err = CellLinkedList::new(unit_box(), 0.6, [true, true]).err();
    assert!(matches!(err, Some(SphError::InvalidConfig { parameter: "periodic", .. })));
    assert!(CellLinkedList::new(unit_box(), 0.6, [false, false]).is_ok());
}
