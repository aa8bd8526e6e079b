//! Nearest-hit segment query against the arena grid and tank hulls.

use flag_rush_core::{BoxKind, TankId, TileCoord};
use glam::Vec2;

/// Radius of the circle approximating a tank hull for ray queries.
pub(crate) const TANK_HULL_RADIUS: f32 = 0.4;

/// Classification of the nearest solid shape along a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RayTarget {
    /// A box resting on the arena grid.
    Box {
        /// Tile the box occupies.
        tile: TileCoord,
        /// Kind of box that was struck.
        kind: BoxKind,
    },
    /// Another tank's hull.
    Tank(TankId),
}

/// Nearest solid shape found along a segment query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the segment start to the hit, in tile units.
    pub distance: f32,
    /// The shape that was struck.
    pub target: RayTarget,
}

/// Probe describing a tank hull for segment queries.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TankProbe {
    pub(crate) id: TankId,
    pub(crate) center: Vec2,
}

/// Finds the nearest solid shape along the segment from `start` to `end`.
///
/// Boxes are discovered by walking the grid cells the segment crosses;
/// tank hulls are tested as circles. The tank named by `ignore` is skipped
/// so a shooter never detects its own hull. When a box and a tank sit at
/// the same distance the box wins; tank ties resolve to the smaller id.
pub(crate) fn cast<F>(
    columns: u32,
    rows: u32,
    box_at: F,
    tanks: &[TankProbe],
    start: Vec2,
    end: Vec2,
    ignore: Option<TankId>,
) -> Option<RayHit>
where
    F: Fn(TileCoord) -> Option<BoxKind>,
{
    let box_hit = nearest_box(columns, rows, box_at, start, end);
    let tank_hit = nearest_tank(tanks, start, end, ignore);

    match (box_hit, tank_hit) {
        (None, None) => None,
        (Some(hit), None) | (None, Some(hit)) => Some(hit),
        (Some(box_hit), Some(tank_hit)) => {
            if box_hit.distance <= tank_hit.distance {
                Some(box_hit)
            } else {
                Some(tank_hit)
            }
        }
    }
}

fn nearest_box<F>(columns: u32, rows: u32, box_at: F, start: Vec2, end: Vec2) -> Option<RayHit>
where
    F: Fn(TileCoord) -> Option<BoxKind>,
{
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        let tile = tile_of(start, columns, rows)?;
        return box_at(tile).map(|kind| RayHit {
            distance: 0.0,
            target: RayTarget::Box { tile, kind },
        });
    }

    let direction = delta / length;

    // Amanatides-Woo traversal: visit every cell the segment crosses in
    // order, tracking the entry distance of the current cell.
    let mut cell_x = start.x.floor() as i64;
    let mut cell_y = start.y.floor() as i64;

    let step_x: i64 = if direction.x > 0.0 { 1 } else { -1 };
    let step_y: i64 = if direction.y > 0.0 { 1 } else { -1 };

    let mut t_max_x = boundary_distance(start.x, direction.x);
    let mut t_max_y = boundary_distance(start.y, direction.y);
    let t_delta_x = if direction.x == 0.0 {
        f32::INFINITY
    } else {
        1.0 / direction.x.abs()
    };
    let t_delta_y = if direction.y == 0.0 {
        f32::INFINITY
    } else {
        1.0 / direction.y.abs()
    };

    let mut entry = 0.0_f32;
    loop {
        if let Some(tile) = checked_tile(cell_x, cell_y, columns, rows) {
            if let Some(kind) = box_at(tile) {
                return Some(RayHit {
                    distance: entry,
                    target: RayTarget::Box { tile, kind },
                });
            }
        }

        let next = t_max_x.min(t_max_y);
        if next > length {
            return None;
        }

        if t_max_x < t_max_y {
            t_max_x += t_delta_x;
            cell_x += step_x;
        } else {
            t_max_y += t_delta_y;
            cell_y += step_y;
        }
        entry = next;
    }
}

fn nearest_tank(
    tanks: &[TankProbe],
    start: Vec2,
    end: Vec2,
    ignore: Option<TankId>,
) -> Option<RayHit> {
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        return None;
    }
    let direction = delta / length;

    let mut best: Option<RayHit> = None;
    for probe in tanks {
        if ignore == Some(probe.id) {
            continue;
        }

        let Some(distance) = circle_entry(start, direction, length, probe.center) else {
            continue;
        };

        let candidate = RayHit {
            distance,
            target: RayTarget::Tank(probe.id),
        };
        best = Some(match best {
            None => candidate,
            Some(existing) if candidate.distance < existing.distance => candidate,
            Some(existing) => existing,
        });
    }

    best
}

/// Distance along the ray at which it enters the hull circle, if it does
/// within `length`. A start point already inside the circle reports zero.
fn circle_entry(start: Vec2, direction: Vec2, length: f32, center: Vec2) -> Option<f32> {
    let offset = center - start;
    let projection = offset.dot(direction);
    let closest_sq = offset.length_squared() - projection * projection;
    let radius_sq = TANK_HULL_RADIUS * TANK_HULL_RADIUS;
    if closest_sq > radius_sq {
        return None;
    }

    let thickness = (radius_sq - closest_sq).sqrt();
    let entry = projection - thickness;
    let exit = projection + thickness;

    if exit < 0.0 || entry > length {
        return None;
    }

    Some(entry.max(0.0))
}

fn boundary_distance(coordinate: f32, direction: f32) -> f32 {
    if direction > 0.0 {
        (coordinate.floor() + 1.0 - coordinate) / direction
    } else if direction < 0.0 {
        (coordinate - coordinate.floor()) / -direction
    } else {
        f32::INFINITY
    }
}

fn checked_tile(cell_x: i64, cell_y: i64, columns: u32, rows: u32) -> Option<TileCoord> {
    if cell_x < 0 || cell_y < 0 {
        return None;
    }
    let column = u32::try_from(cell_x).ok()?;
    let row = u32::try_from(cell_y).ok()?;
    if column < columns && row < rows {
        Some(TileCoord::new(column, row))
    } else {
        None
    }
}

fn tile_of(point: Vec2, columns: u32, rows: u32) -> Option<TileCoord> {
    checked_tile(point.x.floor() as i64, point.y.floor() as i64, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_box(at: TileCoord, kind: BoxKind) -> impl Fn(TileCoord) -> Option<BoxKind> {
        move |tile| (tile == at).then_some(kind)
    }

    #[test]
    fn finds_box_directly_ahead() {
        let hit = cast(
            9,
            9,
            single_box(TileCoord::new(0, 4), BoxKind::Wood),
            &[],
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, 8.5),
            None,
        )
        .expect("expected a hit");

        assert_eq!(
            hit.target,
            RayTarget::Box {
                tile: TileCoord::new(0, 4),
                kind: BoxKind::Wood,
            }
        );
        assert!((hit.distance - 3.5).abs() < 1e-4);
    }

    #[test]
    fn misses_box_behind_segment() {
        let hit = cast(
            9,
            9,
            single_box(TileCoord::new(0, 0), BoxKind::Wood),
            &[],
            Vec2::new(0.5, 1.5),
            Vec2::new(0.5, 8.5),
            None,
        );

        assert!(hit.is_none());
    }

    #[test]
    fn finds_tank_hull_on_the_ray() {
        let probes = [TankProbe {
            id: TankId::new(7),
            center: Vec2::new(4.5, 0.5),
        }];
        let hit = cast(
            9,
            9,
            |_| None,
            &probes,
            Vec2::new(0.5, 0.5),
            Vec2::new(8.5, 0.5),
            None,
        )
        .expect("expected a hit");

        assert_eq!(hit.target, RayTarget::Tank(TankId::new(7)));
        assert!((hit.distance - (4.0 - TANK_HULL_RADIUS)).abs() < 1e-4);
    }

    #[test]
    fn ignores_the_requesting_tank() {
        let probes = [TankProbe {
            id: TankId::new(7),
            center: Vec2::new(4.5, 0.5),
        }];
        let hit = cast(
            9,
            9,
            |_| None,
            &probes,
            Vec2::new(0.5, 0.5),
            Vec2::new(8.5, 0.5),
            Some(TankId::new(7)),
        );

        assert!(hit.is_none());
    }

    #[test]
    fn nearer_box_shadows_tank_behind_it() {
        let probes = [TankProbe {
            id: TankId::new(2),
            center: Vec2::new(6.5, 0.5),
        }];
        let hit = cast(
            9,
            9,
            single_box(TileCoord::new(3, 0), BoxKind::Rock),
            &probes,
            Vec2::new(0.5, 0.5),
            Vec2::new(8.5, 0.5),
            None,
        )
        .expect("expected a hit");

        assert_eq!(
            hit.target,
            RayTarget::Box {
                tile: TileCoord::new(3, 0),
                kind: BoxKind::Rock,
            }
        );
    }

    #[test]
    fn diagonal_ray_visits_crossed_cells() {
        let hit = cast(
            9,
            9,
            single_box(TileCoord::new(3, 3), BoxKind::Metal),
            &[],
            Vec2::new(0.5, 0.5),
            Vec2::new(8.5, 8.5),
            None,
        )
        .expect("expected a hit");

        assert_eq!(
            hit.target,
            RayTarget::Box {
                tile: TileCoord::new(3, 3),
                kind: BoxKind::Metal,
            }
        );
    }

    #[test]
    fn zero_length_segment_only_sees_its_own_cell() {
        let hit = cast(
            9,
            9,
            single_box(TileCoord::new(2, 2), BoxKind::Wood),
            &[],
            Vec2::new(2.5, 2.5),
            Vec2::new(2.5, 2.5),
            None,
        )
        .expect("expected a hit");

        assert_eq!(hit.distance, 0.0);

        let miss = cast(
            9,
            9,
            single_box(TileCoord::new(2, 2), BoxKind::Wood),
            &[],
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, 0.5),
            None,
        );
        assert!(miss.is_none());
    }
}
