use std::collections::VecDeque;

use flag_rush_core::TileCoord;
use flag_rush_system_navigation::find_path;

const COLUMNS: u32 = 5;
const ROWS: u32 = 5;

// Row-major grid mirroring the kind of box layouts arenas use; 1 blocks.
const GRID: [u8; 25] = [
    0, 0, 0, 1, 0, //
    1, 1, 0, 1, 0, //
    0, 0, 0, 0, 0, //
    0, 1, 1, 1, 1, //
    0, 0, 0, 0, 0, //
];

fn traversable(tile: TileCoord) -> bool {
    GRID[tile.row() as usize * COLUMNS as usize + tile.column() as usize] == 0
}

/// Node-based reference search that only tracks distances, used to verify
/// the path-based frontier produces true shortest lengths.
fn reference_distance(start: TileCoord, goal: TileCoord) -> Option<u32> {
    let mut distances = [[None::<u32>; ROWS as usize]; COLUMNS as usize];
    distances[start.column() as usize][start.row() as usize] = Some(0);
    let mut queue = VecDeque::from([start]);

    while let Some(tile) = queue.pop_front() {
        let distance = distances[tile.column() as usize][tile.row() as usize].unwrap();
        if tile == goal {
            return Some(distance);
        }

        let mut candidates = Vec::new();
        if tile.row() + 1 < ROWS {
            candidates.push(TileCoord::new(tile.column(), tile.row() + 1));
        }
        if tile.row() > 0 {
            candidates.push(TileCoord::new(tile.column(), tile.row() - 1));
        }
        if tile.column() + 1 < COLUMNS {
            candidates.push(TileCoord::new(tile.column() + 1, tile.row()));
        }
        if tile.column() > 0 {
            candidates.push(TileCoord::new(tile.column() - 1, tile.row()));
        }

        for next in candidates {
            if !traversable(next) {
                continue;
            }
            let slot = &mut distances[next.column() as usize][next.row() as usize];
            if slot.is_none() {
                *slot = Some(distance + 1);
                queue.push_back(next);
            }
        }
    }

    None
}

fn all_tiles() -> impl Iterator<Item = TileCoord> {
    (0..ROWS).flat_map(|row| (0..COLUMNS).map(move |column| TileCoord::new(column, row)))
}

#[test]
fn path_lengths_match_reference_for_all_pairs() {
    for start in all_tiles().filter(|tile| traversable(*tile)) {
        for goal in all_tiles().filter(|tile| traversable(*tile)) {
            let path = find_path(start, goal, COLUMNS, ROWS, traversable);
            match reference_distance(start, goal) {
                Some(expected) => assert_eq!(
                    path.len() as u32,
                    expected,
                    "wrong length from {start:?} to {goal:?}"
                ),
                None => assert!(
                    path.is_empty(),
                    "expected no path from {start:?} to {goal:?}"
                ),
            }
        }
    }
}

#[test]
fn paths_only_visit_traversable_neighbors() {
    for start in all_tiles().filter(|tile| traversable(*tile)) {
        for goal in all_tiles().filter(|tile| traversable(*tile)) {
            let path = find_path(start, goal, COLUMNS, ROWS, traversable);
            let mut previous = start;
            for tile in &path {
                assert!(traversable(*tile), "path crosses a box at {tile:?}");
                assert_eq!(
                    previous.manhattan_distance(*tile),
                    1,
                    "path jumps from {previous:?} to {tile:?}"
                );
                previous = *tile;
            }
            if !path.is_empty() {
                assert_eq!(path.last(), Some(&goal));
            }
        }
    }
}

#[test]
fn identical_inputs_yield_identical_paths() {
    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(4, 4);

    let first = find_path(start, goal, COLUMNS, ROWS, traversable);
    let second = find_path(start, goal, COLUMNS, ROWS, traversable);

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn reopened_tile_changes_the_route() {
    let start = TileCoord::new(4, 2);
    let goal = TileCoord::new(4, 4);

    let long_way = find_path(start, goal, COLUMNS, ROWS, traversable);
    // Destroying the box at (1, 3) opens a shortcut through the wall row.
    let opened = TileCoord::new(1, 3);
    let short_way = find_path(start, goal, COLUMNS, ROWS, |tile| {
        tile == opened || traversable(tile)
    });

    assert!(!long_way.is_empty());
    assert!(!short_way.is_empty());
    assert!(short_way.len() < long_way.len());
}
