#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous per-tank controller: a forward threat scan followed by one
//! step of a resumable path-following steering sequence.
//!
//! The controller is re-entered once per simulation tick through
//! [`Agent::decide`]. All multi-tick waiting (turning into alignment,
//! traveling toward a waypoint) is expressed as a phase machine that keeps
//! its place between calls, so a call never blocks and performs the minimal
//! work for a single tick.

use std::f32::consts::{PI, TAU};

use flag_rush_core::{Command, Drive, TankId, TileCoord, TilePoint, Turn};
use flag_rush_system_navigation::find_path;
use flag_rush_world::{query, RayTarget, World};
use glam::Vec2;

/// 3 degrees, a bit more than the body can turn in one tick.
const MIN_ANGLE_DIFFERENCE: f32 = 3.0 * PI / 180.0;
/// Distance below which a waypoint counts as reached, in tile units.
const ARRIVAL_TOLERANCE: f32 = 0.1;
/// Forward offset of the perception ray's origin, in tile units.
const SCAN_OFFSET: f32 = 0.5;

/// Per-tank decision loop that navigates toward the flag (or home, once the
/// flag is carried) and fires at destructible boxes and hostile tanks.
#[derive(Debug)]
pub struct Agent {
    tank: TankId,
    phase: Phase,
}

/// Current step of the steering sequence, persisted across ticks.
///
/// Alignment and arrival carry the context captured when the waypoint was
/// acquired: the bearing stays fixed while the body converges on it, and
/// the waypoint center stays fixed while the body travels toward it.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Acquire,
    Converge { bearing: f32, waypoint: Vec2 },
    Travel { waypoint: Vec2 },
    Settle,
}

impl Agent {
    /// Creates a controller for the provided tank.
    #[must_use]
    pub fn new(tank: TankId) -> Self {
        Self {
            tank,
            phase: Phase::Acquire,
        }
    }

    /// Identifier of the tank this controller drives.
    #[must_use]
    pub fn tank(&self) -> TankId {
        self.tank
    }

    /// Main decision entry point, called once per simulation tick.
    ///
    /// The threat scan runs before the steering step so shooting and
    /// movement are decided on the same tick's perception snapshot. Effects
    /// are expressed as commands appended to `out`; the world applies them
    /// before its next integration step.
    pub fn decide(&mut self, world: &World, out: &mut Vec<Command>) {
        self.scan_threats(world, out);
        self.advance_steering(world, out);
    }

    /// Casts a ray just ahead of the hull along the facing and fires when
    /// it reports a destructible box or another tank. Indestructible boxes
    /// soak the shot, so they are not worth one.
    fn scan_threats(&self, world: &World, out: &mut Vec<Command>) {
        let view = query::tank_view(world);
        let Some(snapshot) = view.get(self.tank) else {
            return;
        };

        let (columns, rows) = query::arena_view(world).dimensions();
        let forward = heading_vector(snapshot.heading);
        let start = snapshot.position + forward * SCAN_OFFSET;
        let end = snapshot.position + forward * (columns + rows) as f32;

        let Some(hit) = query::segment_hit(world, start, end, Some(self.tank)) else {
            return;
        };

        match hit.target {
            RayTarget::Box { kind, .. } if kind.is_destructible() => {
                out.push(Command::FireWeapon { tank: self.tank });
            }
            RayTarget::Tank(_) => {
                out.push(Command::FireWeapon { tank: self.tank });
            }
            RayTarget::Box { .. } => {}
        }
    }

    /// Advances the steering sequence by exactly one phase-step.
    fn advance_steering(&mut self, world: &World, out: &mut Vec<Command>) {
        let view = query::tank_view(world);
        let Some(snapshot) = view.get(self.tank) else {
            // The tank was torn down between ticks; hold until it returns.
            return;
        };

        self.phase = match self.phase {
            Phase::Acquire => self.acquire_waypoint(snapshot, world, out),
            Phase::Converge { bearing, waypoint } => {
                let delta = periodic_difference(snapshot.heading, bearing);
                if delta.abs() > MIN_ANGLE_DIFFERENCE {
                    Phase::Converge { bearing, waypoint }
                } else {
                    out.push(Command::StopTurning { tank: self.tank });
                    out.push(Command::SetThrottle {
                        tank: self.tank,
                        drive: Drive::Forward,
                    });
                    Phase::Travel { waypoint }
                }
            }
            Phase::Travel { waypoint } => {
                if snapshot.position.distance(waypoint) > ARRIVAL_TOLERANCE {
                    Phase::Travel { waypoint }
                } else {
                    out.push(Command::StopMoving { tank: self.tank });
                    Phase::Settle
                }
            }
            Phase::Settle => Phase::Acquire,
        };
    }

    /// Recomputes the route and starts turning toward its first waypoint.
    ///
    /// The search runs against the live grid every acquisition, so boxes
    /// destroyed or discovered since the last waypoint are accounted for.
    /// An empty route (unreachable goal, missing flag, or goal already
    /// reached) holds position and retries next tick.
    fn acquire_waypoint(
        &self,
        snapshot: &query::TankSnapshot,
        world: &World,
        out: &mut Vec<Command>,
    ) -> Phase {
        let Some(goal) = self.current_goal(snapshot, world) else {
            return Phase::Acquire;
        };

        let arena = query::arena_view(world);
        let (columns, rows) = arena.dimensions();
        let start = tile_of(snapshot.position);
        let path = find_path(start, goal, columns, rows, |tile| arena.is_traversable(tile));

        let Some(next_tile) = path.first() else {
            log::trace!(
                "tank {} holds: no route from {start:?} to {goal:?}",
                self.tank.get()
            );
            return Phase::Acquire;
        };

        let center = next_tile.center();
        let waypoint = Vec2::new(center.x(), center.y());
        let bearing = bearing_to(snapshot.position, waypoint, snapshot.heading);
        let delta = periodic_difference(snapshot.heading, bearing);
        out.push(Command::SetTurn {
            tank: self.tank,
            turn: turn_for(delta),
        });

        Phase::Converge { bearing, waypoint }
    }

    /// Tile the agent is steering toward: home while carrying the flag,
    /// the flag's current tile otherwise. `None` until a flag exists.
    fn current_goal(&self, snapshot: &query::TankSnapshot, world: &World) -> Option<TileCoord> {
        if snapshot.carrying_flag {
            Some(tile_of(snapshot.home))
        } else {
            query::flag(world).map(|flag| tile_of(flag.position))
        }
    }
}

/// Signed difference between two angles, each reduced modulo a full turn.
///
/// Both angles reduce independently before subtracting, so the result spans
/// (-2π, 2π) and is deliberately not folded into (-π, π). The turn decision
/// in [`turn_for`] branches on this raw range; near the wrap boundary the
/// chosen direction can be the long way around, which the converge phase
/// absorbs by turning until aligned.
#[must_use]
pub fn periodic_difference(first: f32, second: f32) -> f32 {
    first.rem_euclid(TAU) - second.rem_euclid(TAU)
}

/// Body angle at which a tank at `from` faces `to`; zero faces positive y.
///
/// A degenerate segment (the tank already sits on the target) reports the
/// provided fallback so alignment is trivially satisfied instead of
/// propagating an undefined angle.
fn bearing_to(from: Vec2, to: Vec2, fallback: f32) -> f32 {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        return fallback;
    }
    (-delta.x).atan2(delta.y)
}

/// Unit vector along a heading; zero heading faces positive y.
fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), heading.cos())
}

/// Tile containing a continuous position.
fn tile_of(position: Vec2) -> TileCoord {
    TilePoint::new(position.x, position.y).tile()
}

/// Turn direction for a raw periodic delta: (0, π) and (-2π, -π) turn left,
/// everything else turns right.
fn turn_for(delta: f32) -> Turn {
    if (0.0 < delta && delta < PI) || (-TAU < delta && delta < -PI) {
        Turn::Left
    } else {
        Turn::Right
    }
}
