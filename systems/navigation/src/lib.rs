#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure breadth-first pathfinding over the arena tile grid.

use std::collections::{HashSet, VecDeque};

use flag_rush_core::TileCoord;

/// Finds the shortest 4-connected tile path from `start` to `goal`.
///
/// The search runs over a FIFO frontier of partial paths so the winning path
/// is returned directly without backtracking bookkeeping. Each tile enters
/// the frontier at most once, which bounds the search and makes the first
/// path that reaches the goal shortest in edge count. Traversability is
/// supplied by the caller so the search always reads the live arena state.
///
/// The returned path excludes `start` and ends exactly on `goal`. An
/// unreachable goal yields an empty path rather than an error; callers are
/// expected to hold position and retry on a later tick. Neighbors expand in
/// a fixed order (+row, -row, +column, -column), so equally short routes
/// resolve deterministically.
#[must_use]
pub fn find_path<F>(
    start: TileCoord,
    goal: TileCoord,
    columns: u32,
    rows: u32,
    mut is_traversable: F,
) -> Vec<TileCoord>
where
    F: FnMut(TileCoord) -> bool,
{
    let mut frontier: VecDeque<Vec<TileCoord>> = VecDeque::new();
    frontier.push_back(vec![start]);

    let mut visited: HashSet<(u32, u32)> = HashSet::new();
    let _ = visited.insert((start.column(), start.row()));

    while let Some(path) = frontier.pop_front() {
        let tile = *path.last().unwrap_or(&start);
        if tile == goal {
            let mut path = path;
            let _ = path.remove(0);
            return path;
        }

        for neighbor in neighbors(tile, columns, rows) {
            if visited.contains(&(neighbor.column(), neighbor.row())) {
                continue;
            }
            if !is_traversable(neighbor) {
                continue;
            }

            let _ = visited.insert((neighbor.column(), neighbor.row()));
            let mut extended = path.clone();
            extended.push(neighbor);
            frontier.push_back(extended);
        }
    }

    Vec::new()
}

fn neighbors(tile: TileCoord, columns: u32, rows: u32) -> impl Iterator<Item = TileCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = tile.row().checked_add(1) {
        if row < rows {
            candidates[count] = Some(TileCoord::new(tile.column(), row));
            count += 1;
        }
    }

    if let Some(row) = tile.row().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(tile.column(), row));
        count += 1;
    }

    if let Some(column) = tile.column().checked_add(1) {
        if column < columns {
            candidates[count] = Some(TileCoord::new(column, tile.row()));
            count += 1;
        }
    }

    if let Some(column) = tile.column().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(column, tile.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
