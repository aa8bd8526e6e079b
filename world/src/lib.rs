#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Flag Rush.
//!
//! The world owns the arena grid, the tank bodies and the flag. Adapters and
//! agent systems mutate it exclusively through [`apply`], which executes a
//! [`Command`] and broadcasts the resulting [`Event`] values; read access
//! goes through the [`query`] module.

mod raycast;

use std::time::Duration;

use flag_rush_core::{ArenaBlueprint, BoxKind, Command, Drive, Event, TankId, TileCoord, Turn};
use glam::Vec2;

pub use raycast::{RayHit, RayTarget};

/// Velocity gained per tick while a drive or turn intent is held.
const ACCELERATION: f32 = 0.4;
/// Top speed of an unburdened tank, in tile units per second.
const NORMAL_MAX_SPEED: f32 = 2.0;
/// Top speed while carrying the flag.
const FLAG_MAX_SPEED: f32 = NORMAL_MAX_SPEED * 0.5;
/// Angular speed cap, in radians per second.
const MAX_ANGULAR_SPEED: f32 = 2.0;
/// Distance within which a free flag is grabbed.
const FLAG_GRAB_RADIUS: f32 = 0.5;
/// Distance from home within which a carried flag scores.
const CAPTURE_RADIUS: f32 = 0.2;
/// Minimum simulated time between successive shots from one tank.
const FIRE_COOLDOWN: Duration = Duration::from_millis(500);
/// Forward offset of the muzzle from the hull center, in tile units.
const MUZZLE_OFFSET: f32 = 0.5;

/// Represents the authoritative Flag Rush world state.
#[derive(Debug, Default)]
pub struct World {
    arena: Arena,
    tanks: Vec<Tank>,
    flag: Option<Flag>,
    next_tank_id: u32,
    captured: bool,
}

impl World {
    /// Creates an empty world awaiting an arena blueprint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tank_index(&self, tank: TankId) -> Option<usize> {
        self.tanks.iter().position(|candidate| candidate.id == tank)
    }

    fn tank_mut(&mut self, tank: TankId) -> Option<&mut Tank> {
        match self.tank_index(tank) {
            Some(index) => self.tanks.get_mut(index),
            None => {
                log::debug!("command addressed unknown tank {}", tank.get());
                None
            }
        }
    }

    fn resolve_shot(&mut self, shooter_index: usize, out_events: &mut Vec<Event>) {
        let shooter = &self.tanks[shooter_index];
        let shooter_id = shooter.id;
        let forward = shooter.forward();
        let origin = shooter.position + forward * MUZZLE_OFFSET;
        let reach = (self.arena.columns + self.arena.rows) as f32;
        let end = origin + forward * reach;

        let probes: Vec<raycast::TankProbe> = self
            .tanks
            .iter()
            .map(|tank| raycast::TankProbe {
                id: tank.id,
                center: tank.position,
            })
            .collect();

        let hit = raycast::cast(
            self.arena.columns,
            self.arena.rows,
            |tile| self.arena.box_at(tile),
            &probes,
            origin,
            end,
            Some(shooter_id),
        );

        match hit {
            Some(RayHit {
                target: RayTarget::Box { tile, kind },
                ..
            }) if kind.is_destructible() => {
                self.arena.destroy(tile);
                log::debug!(
                    "tank {} destroyed a box at ({}, {})",
                    shooter_id.get(),
                    tile.column(),
                    tile.row()
                );
                out_events.push(Event::BoxDestroyed {
                    tile,
                    by: shooter_id,
                });
            }
            Some(RayHit {
                target: RayTarget::Tank(target),
                ..
            }) => {
                log::debug!("tank {} hit tank {}", shooter_id.get(), target.get());
                out_events.push(Event::TankHit {
                    shooter: shooter_id,
                    target,
                });
            }
            _ => {}
        }
    }

    fn advance_flag(&mut self, out_events: &mut Vec<Event>) {
        let Some(flag) = &mut self.flag else {
            return;
        };

        match flag.carrier {
            None => {
                for tank in &mut self.tanks {
                    if tank.position.distance(flag.position) < FLAG_GRAB_RADIUS {
                        flag.carrier = Some(tank.id);
                        flag.position = tank.position;
                        tank.max_speed = FLAG_MAX_SPEED;
                        log::info!("tank {} grabbed the flag", tank.id.get());
                        out_events.push(Event::FlagGrabbed { tank: tank.id });
                        break;
                    }
                }
            }
            Some(carrier) => {
                let Some(tank) = self.tanks.iter().find(|tank| tank.id == carrier) else {
                    // Carrier was torn down between ticks; the flag stays put.
                    flag.carrier = None;
                    return;
                };

                flag.position = tank.position;
                if !self.captured && tank.position.distance(tank.home) < CAPTURE_RADIUS {
                    self.captured = true;
                    log::info!("tank {} captured the flag", tank.id.get());
                    out_events.push(Event::FlagCaptured { tank: tank.id });
                }
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadArena { blueprint } => {
            world.arena = Arena::from_blueprint(&blueprint);
            world.tanks.clear();
            world.flag = None;
            world.next_tank_id = 0;
            world.captured = false;
            out_events.push(Event::ArenaLoaded {
                columns: world.arena.columns,
                rows: world.arena.rows,
            });
        }
        Command::SpawnTank { spawn } => {
            let position = Vec2::new(spawn.position().x(), spawn.position().y());
            if !world.arena.contains(position) {
                log::warn!("ignored spawn outside the arena at {position:?}");
                return;
            }

            let id = TankId::new(world.next_tank_id);
            world.next_tank_id += 1;
            world.tanks.push(Tank::spawned(
                id,
                position,
                spawn.heading_degrees().to_radians(),
            ));
            out_events.push(Event::TankSpawned {
                tank: id,
                at: spawn.position(),
            });
        }
        Command::PlaceFlag { at } => {
            let position = Vec2::new(at.x(), at.y());
            if !world.arena.contains(position) {
                log::warn!("ignored flag placement outside the arena at {position:?}");
                return;
            }

            world.flag = Some(Flag {
                position,
                carrier: None,
            });
            out_events.push(Event::FlagPlaced { at });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            let columns = world.arena.columns;
            let rows = world.arena.rows;
            for tank in &mut world.tanks {
                tank.integrate(dt, columns, rows);
                tank.cooldown = tank.cooldown.saturating_sub(dt);
            }

            world.advance_flag(out_events);
        }
        Command::SetTurn { tank, turn } => {
            if let Some(tank) = world.tank_mut(tank) {
                tank.turn = Some(turn);
            }
        }
        Command::StopTurning { tank } => {
            if let Some(tank) = world.tank_mut(tank) {
                tank.turn = None;
                tank.angular_velocity = 0.0;
            }
        }
        Command::SetThrottle { tank, drive } => {
            if let Some(tank) = world.tank_mut(tank) {
                tank.drive = Some(drive);
            }
        }
        Command::StopMoving { tank } => {
            if let Some(tank) = world.tank_mut(tank) {
                tank.drive = None;
                tank.velocity = Vec2::ZERO;
            }
        }
        Command::FireWeapon { tank } => {
            let Some(index) = world.tank_index(tank) else {
                log::debug!("fire request from unknown tank {}", tank.get());
                return;
            };

            if !world.tanks[index].cooldown.is_zero() {
                log::debug!("tank {} fired during cooldown", tank.get());
                return;
            }

            world.tanks[index].cooldown = FIRE_COOLDOWN;
            out_events.push(Event::WeaponFired { tank });
            world.resolve_shot(index, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use flag_rush_core::{BoxKind, Drive, TankId, TileCoord, Turn};
    use glam::Vec2;

    use super::{raycast, Arena, World};

    /// Provides a read-only view of the arena grid.
    #[must_use]
    pub fn arena_view(world: &World) -> ArenaView<'_> {
        ArenaView {
            arena: &world.arena,
        }
    }

    /// Captures a read-only view of the tanks, ordered by identifier.
    #[must_use]
    pub fn tank_view(world: &World) -> TankView {
        let mut snapshots: Vec<TankSnapshot> = world
            .tanks
            .iter()
            .map(|tank| TankSnapshot {
                id: tank.id,
                position: tank.position,
                heading: tank.heading,
                velocity: tank.velocity,
                angular_velocity: tank.angular_velocity,
                turn: tank.turn,
                drive: tank.drive,
                carrying_flag: world.flag.as_ref().map(|flag| flag.carrier) == Some(Some(tank.id)),
                home: tank.home,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        TankView { snapshots }
    }

    /// Captures the flag state, if a flag has been placed.
    #[must_use]
    pub fn flag(world: &World) -> Option<FlagSnapshot> {
        world.flag.as_ref().map(|flag| FlagSnapshot {
            position: flag.position,
            carrier: flag.carrier,
        })
    }

    /// Reports the winning tank once the flag has been carried home.
    #[must_use]
    pub fn winner(world: &World) -> Option<TankId> {
        if !world.captured {
            return None;
        }
        world.flag.as_ref().and_then(|flag| flag.carrier)
    }

    /// Finds the nearest solid shape along a segment through the world.
    ///
    /// The tank named by `ignore` is excluded so perception queries never
    /// report the requesting hull.
    #[must_use]
    pub fn segment_hit(
        world: &World,
        start: Vec2,
        end: Vec2,
        ignore: Option<TankId>,
    ) -> Option<super::RayHit> {
        let probes: Vec<raycast::TankProbe> = world
            .tanks
            .iter()
            .map(|tank| raycast::TankProbe {
                id: tank.id,
                center: tank.position,
            })
            .collect();

        raycast::cast(
            world.arena.columns,
            world.arena.rows,
            |tile| world.arena.box_at(tile),
            &probes,
            start,
            end,
            ignore,
        )
    }

    /// Read-only view into the arena's box grid.
    #[derive(Clone, Copy, Debug)]
    pub struct ArenaView<'a> {
        arena: &'a Arena,
    }

    impl ArenaView<'_> {
        /// Grid dimensions as (columns, rows).
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.arena.columns, self.arena.rows)
        }

        /// Box occupying the provided tile, if any.
        #[must_use]
        pub fn box_at(&self, tile: TileCoord) -> Option<BoxKind> {
            self.arena.box_at(tile)
        }

        /// Reports whether the tile is inside the grid and free of boxes.
        #[must_use]
        pub fn is_traversable(&self, tile: TileCoord) -> bool {
            tile.column() < self.arena.columns
                && tile.row() < self.arena.rows
                && self.arena.box_at(tile).is_none()
        }
    }

    /// Read-only snapshot describing all tanks in the arena.
    #[derive(Clone, Debug, Default)]
    pub struct TankView {
        snapshots: Vec<TankSnapshot>,
    }

    impl TankView {
        /// Iterator over the captured tank snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &TankSnapshot> {
            self.snapshots.iter()
        }

        /// Snapshot of the tank with the provided identifier, if present.
        #[must_use]
        pub fn get(&self, tank: TankId) -> Option<&TankSnapshot> {
            self.snapshots.iter().find(|snapshot| snapshot.id == tank)
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<TankSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single tank's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TankSnapshot {
        /// Unique identifier assigned to the tank.
        pub id: TankId,
        /// Continuous position in tile units.
        pub position: Vec2,
        /// Facing angle in radians; zero faces the positive y axis.
        pub heading: f32,
        /// Linear velocity in tile units per second.
        pub velocity: Vec2,
        /// Angular velocity in radians per second.
        pub angular_velocity: f32,
        /// Turn intent currently held, if any.
        pub turn: Option<Turn>,
        /// Drive intent currently held, if any.
        pub drive: Option<Drive>,
        /// Indicates whether this tank carries the flag.
        pub carrying_flag: bool,
        /// Home position the tank must return the flag to.
        pub home: Vec2,
    }

    /// Immutable representation of the flag used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct FlagSnapshot {
        /// Continuous position in tile units.
        pub position: Vec2,
        /// Tank currently carrying the flag, if any.
        pub carrier: Option<TankId>,
    }
}

#[derive(Debug, Default)]
struct Arena {
    columns: u32,
    rows: u32,
    boxes: Vec<Option<BoxKind>>,
}

impl Arena {
    fn from_blueprint(blueprint: &ArenaBlueprint) -> Self {
        Self {
            columns: blueprint.columns(),
            rows: blueprint.rows(),
            boxes: blueprint.boxes().to_vec(),
        }
    }

    fn box_at(&self, tile: TileCoord) -> Option<BoxKind> {
        self.index(tile)
            .and_then(|index| self.boxes.get(index).copied().flatten())
    }

    fn destroy(&mut self, tile: TileCoord) {
        if let Some(index) = self.index(tile) {
            if let Some(slot) = self.boxes.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x < self.columns as f32
            && position.y < self.rows as f32
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() < self.columns && tile.row() < self.rows {
            let row = usize::try_from(tile.row()).ok()?;
            let column = usize::try_from(tile.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
struct Tank {
    id: TankId,
    position: Vec2,
    heading: f32,
    velocity: Vec2,
    angular_velocity: f32,
    drive: Option<Drive>,
    turn: Option<Turn>,
    home: Vec2,
    max_speed: f32,
    cooldown: Duration,
}

impl Tank {
    fn spawned(id: TankId, position: Vec2, heading: f32) -> Self {
        Self {
            id,
            position,
            heading,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            drive: None,
            turn: None,
            home: position,
            max_speed: NORMAL_MAX_SPEED,
            cooldown: Duration::ZERO,
        }
    }

    /// Unit vector along the tank's facing; zero heading faces positive y.
    fn forward(&self) -> Vec2 {
        Vec2::new(-self.heading.sin(), self.heading.cos())
    }

    /// Advances the body by one tick: intents accumulate into velocities
    /// once per tick, velocities clamp symmetrically, positions integrate
    /// with the tick's delta time.
    fn integrate(&mut self, dt: Duration, columns: u32, rows: u32) {
        let dt = dt.as_secs_f32();

        if let Some(drive) = self.drive {
            self.velocity += self.forward() * (ACCELERATION * drive.sign());
        }
        let speed = self.velocity.length();
        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
        }
        self.position += self.velocity * dt;

        if let Some(turn) = self.turn {
            self.angular_velocity += ACCELERATION * turn.sign();
        }
        self.angular_velocity = self
            .angular_velocity
            .clamp(-MAX_ANGULAR_SPEED, MAX_ANGULAR_SPEED);
        self.heading += self.angular_velocity * dt;

        // The perimeter wall: hulls stay inside the arena.
        let margin = raycast::TANK_HULL_RADIUS;
        if columns > 0 && rows > 0 {
            self.position.x = self.position.x.clamp(margin, columns as f32 - margin);
            self.position.y = self.position.y.clamp(margin, rows as f32 - margin);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Flag {
    position: Vec2,
    carrier: Option<TankId>,
}
