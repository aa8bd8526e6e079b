#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Flag Rush simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and agent systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for observers to react to deterministically. Systems consume immutable
//! snapshots and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the arena with the layout described by the blueprint.
    ///
    /// Loading an arena removes every tank and the flag; they are recreated
    /// with dedicated commands so match setup mirrors the configure, spawn,
    /// place sequence adapters drive.
    LoadArena {
        /// Validated layout the world should adopt.
        blueprint: ArenaBlueprint,
    },
    /// Requests that a tank be created at the provided spawn point.
    SpawnTank {
        /// Location and initial facing for the new tank.
        spawn: SpawnPoint,
    },
    /// Places the flag at the provided position.
    PlaceFlag {
        /// Continuous position the flag should occupy, in tile units.
        at: TilePoint,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets a tank's turn intent, overwriting the previous one.
    SetTurn {
        /// Identifier of the tank whose intent changes.
        tank: TankId,
        /// Direction the tank should rotate toward.
        turn: Turn,
    },
    /// Clears a tank's turn intent and zeroes its angular velocity.
    StopTurning {
        /// Identifier of the tank whose intent changes.
        tank: TankId,
    },
    /// Sets a tank's drive intent, overwriting the previous one.
    SetThrottle {
        /// Identifier of the tank whose intent changes.
        tank: TankId,
        /// Direction the tank should drive toward.
        drive: Drive,
    },
    /// Clears a tank's drive intent and zeroes its linear velocity.
    StopMoving {
        /// Identifier of the tank whose intent changes.
        tank: TankId,
    },
    /// Requests that a tank discharge its weapon along its facing.
    FireWeapon {
        /// Identifier of the tank pulling the trigger.
        tank: TankId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new arena layout became active.
    ArenaLoaded {
        /// Number of tile columns in the active arena.
        columns: u32,
        /// Number of tile rows in the active arena.
        rows: u32,
    },
    /// Confirms that a tank was created.
    TankSpawned {
        /// Identifier assigned to the tank by the world.
        tank: TankId,
        /// Position the tank occupies after spawning.
        at: TilePoint,
    },
    /// Confirms that the flag was placed.
    FlagPlaced {
        /// Position the flag occupies.
        at: TilePoint,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that a tank picked up the free flag.
    FlagGrabbed {
        /// Identifier of the tank now carrying the flag.
        tank: TankId,
    },
    /// Reports that the flag carrier reached its home position.
    FlagCaptured {
        /// Identifier of the winning tank.
        tank: TankId,
    },
    /// Confirms that a shot left a tank's barrel.
    WeaponFired {
        /// Identifier of the shooting tank.
        tank: TankId,
    },
    /// Reports that a shot removed a destructible box from the arena.
    BoxDestroyed {
        /// Tile the destroyed box occupied.
        tile: TileCoord,
        /// Identifier of the shooting tank.
        by: TankId,
    },
    /// Reports that a shot struck another tank's hull.
    TankHit {
        /// Identifier of the shooting tank.
        shooter: TankId,
        /// Identifier of the tank that was struck.
        target: TankId,
    },
}

/// Unique identifier assigned to a tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankId(u32);

impl TankId {
    /// Creates a new tank identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single arena tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Continuous position of the tile's center, in tile units.
    #[must_use]
    pub fn center(self) -> TilePoint {
        TilePoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position expressed in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilePoint {
    x: f32,
    y: f32,
}

impl TilePoint {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component in tile units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in tile units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Tile containing this position, truncating toward zero.
    ///
    /// Negative components clamp to the zero column or row so a body nudged
    /// marginally outside the arena still resolves to a valid tile.
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        TileCoord::new(self.x.max(0.0) as u32, self.y.max(0.0) as u32)
    }
}

/// Kinds of boxes that can occupy an arena tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxKind {
    /// Immovable stone box that weapons cannot destroy.
    Rock,
    /// Wooden box that a single shot removes from the arena.
    Wood,
    /// Metal box that weapons cannot destroy.
    Metal,
}

impl BoxKind {
    /// Reports whether a weapon hit removes the box from the arena.
    #[must_use]
    pub const fn is_destructible(self) -> bool {
        matches!(self, Self::Wood)
    }
}

/// Rotation intent a tank can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Counter-clockwise rotation; drives the heading angle down.
    Left,
    /// Clockwise rotation; drives the heading angle up.
    Right,
}

impl Turn {
    /// Sign applied to angular acceleration while the intent is held.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Drive intent a tank can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drive {
    /// Acceleration along the tank's facing.
    Forward,
    /// Acceleration against the tank's facing.
    Reverse,
}

impl Drive {
    /// Sign applied to linear acceleration while the intent is held.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

/// Starting location and facing assigned to a tank at match setup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    position: TilePoint,
    heading_degrees: f32,
}

impl SpawnPoint {
    /// Creates a new spawn point from a position and a facing in degrees.
    #[must_use]
    pub const fn new(position: TilePoint, heading_degrees: f32) -> Self {
        Self {
            position,
            heading_degrees,
        }
    }

    /// Position the tank occupies when it spawns, in tile units.
    #[must_use]
    pub const fn position(&self) -> TilePoint {
        self.position
    }

    /// Initial facing expressed in degrees.
    #[must_use]
    pub const fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }
}

/// Validated arena layout: box grid, tank spawn points and flag position.
///
/// Blueprints are authored as numeric box codes (0 grass, 1 rock, 2 wood,
/// 3 metal) in row-major order and validated once on construction; the
/// world trusts a blueprint it receives.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaBlueprint {
    columns: u32,
    rows: u32,
    boxes: Vec<Option<BoxKind>>,
    spawn_points: Vec<SpawnPoint>,
    flag_position: TilePoint,
}

impl ArenaBlueprint {
    /// Builds a blueprint from raw box codes, validating every field.
    pub fn from_parts(
        columns: u32,
        rows: u32,
        codes: &[u8],
        spawn_points: Vec<SpawnPoint>,
        flag_position: TilePoint,
    ) -> Result<Self, BlueprintError> {
        if columns == 0 || rows == 0 {
            return Err(BlueprintError::EmptyGrid);
        }

        let expected = columns as usize * rows as usize;
        if codes.len() != expected {
            return Err(BlueprintError::DimensionMismatch {
                expected,
                actual: codes.len(),
            });
        }

        let mut boxes = Vec::with_capacity(expected);
        for &code in codes {
            boxes.push(match code {
                0 => None,
                1 => Some(BoxKind::Rock),
                2 => Some(BoxKind::Wood),
                3 => Some(BoxKind::Metal),
                other => return Err(BlueprintError::UnknownBoxCode { code: other }),
            });
        }

        for (index, spawn) in spawn_points.iter().enumerate() {
            if !contains(columns, rows, spawn.position()) {
                return Err(BlueprintError::SpawnOutOfBounds { index });
            }
        }

        if !contains(columns, rows, flag_position) {
            return Err(BlueprintError::FlagOutOfBounds);
        }

        Ok(Self {
            columns,
            rows,
            boxes,
            spawn_points,
            flag_position,
        })
    }

    /// Number of tile columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Box occupying the provided tile, if any.
    #[must_use]
    pub fn box_at(&self, tile: TileCoord) -> Option<BoxKind> {
        if tile.column() >= self.columns || tile.row() >= self.rows {
            return None;
        }
        let index = tile.row() as usize * self.columns as usize + tile.column() as usize;
        self.boxes.get(index).copied().flatten()
    }

    /// Dense row-major box grid backing the layout.
    #[must_use]
    pub fn boxes(&self) -> &[Option<BoxKind>] {
        &self.boxes
    }

    /// Spawn points assigned to tanks at match setup.
    #[must_use]
    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    /// Position the flag occupies when the match starts.
    #[must_use]
    pub const fn flag_position(&self) -> TilePoint {
        self.flag_position
    }
}

fn contains(columns: u32, rows: u32, point: TilePoint) -> bool {
    point.x() >= 0.0 && point.y() >= 0.0 && point.x() < columns as f32 && point.y() < rows as f32
}

/// Reasons a blueprint cannot be constructed from its raw parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BlueprintError {
    /// The grid has zero columns or zero rows.
    #[error("arena grid must have at least one column and one row")]
    EmptyGrid,
    /// The box code slice does not match the grid dimensions.
    #[error("expected {expected} box codes, got {actual}")]
    DimensionMismatch {
        /// Number of codes the dimensions require.
        expected: usize,
        /// Number of codes actually provided.
        actual: usize,
    },
    /// A box code outside the known range was encountered.
    #[error("unknown box code {code}")]
    UnknownBoxCode {
        /// The offending code value.
        code: u8,
    },
    /// A spawn point lies outside the grid.
    #[error("spawn point {index} lies outside the arena")]
    SpawnOutOfBounds {
        /// Index of the offending spawn point.
        index: usize,
    },
    /// The flag position lies outside the grid.
    #[error("flag position lies outside the arena")]
    FlagOutOfBounds,
}

#[cfg(test)]
mod tests {
    use super::{
        ArenaBlueprint, BlueprintError, BoxKind, Drive, SpawnPoint, TankId, TileCoord, TilePoint,
        Turn,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = TileCoord::new(1, 1);
        let destination = TileCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn tile_center_offsets_by_half() {
        let center = TileCoord::new(2, 7).center();
        assert_eq!(center, TilePoint::new(2.5, 7.5));
    }

    #[test]
    fn point_truncates_to_containing_tile() {
        assert_eq!(TilePoint::new(3.9, 0.2).tile(), TileCoord::new(3, 0));
        assert_eq!(TilePoint::new(-0.3, 2.0).tile(), TileCoord::new(0, 2));
    }

    #[test]
    fn intent_signs_are_symmetric() {
        assert_eq!(Turn::Left.sign(), -Turn::Right.sign());
        assert_eq!(Drive::Forward.sign(), -Drive::Reverse.sign());
    }

    #[test]
    fn only_wood_is_destructible() {
        assert!(BoxKind::Wood.is_destructible());
        assert!(!BoxKind::Rock.is_destructible());
        assert!(!BoxKind::Metal.is_destructible());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tank_id_round_trips_through_bincode() {
        assert_round_trip(&TankId::new(42));
    }

    #[test]
    fn tile_coord_round_trips_through_bincode() {
        assert_round_trip(&TileCoord::new(5, 7));
    }

    #[test]
    fn tile_point_round_trips_through_bincode() {
        assert_round_trip(&TilePoint::new(4.5, 8.25));
    }

    #[test]
    fn box_kind_round_trips_through_bincode() {
        assert_round_trip(&BoxKind::Metal);
    }

    #[test]
    fn spawn_point_round_trips_through_bincode() {
        assert_round_trip(&SpawnPoint::new(TilePoint::new(0.5, 0.5), 180.0));
    }

    fn blueprint_3x2() -> ArenaBlueprint {
        ArenaBlueprint::from_parts(
            3,
            2,
            &[0, 1, 0, 2, 3, 0],
            vec![SpawnPoint::new(TilePoint::new(0.5, 0.5), 0.0)],
            TilePoint::new(2.5, 1.5),
        )
        .expect("valid blueprint")
    }

    #[test]
    fn blueprint_decodes_box_codes() {
        let blueprint = blueprint_3x2();
        assert_eq!(blueprint.box_at(TileCoord::new(0, 0)), None);
        assert_eq!(blueprint.box_at(TileCoord::new(1, 0)), Some(BoxKind::Rock));
        assert_eq!(blueprint.box_at(TileCoord::new(0, 1)), Some(BoxKind::Wood));
        assert_eq!(blueprint.box_at(TileCoord::new(1, 1)), Some(BoxKind::Metal));
        assert_eq!(blueprint.box_at(TileCoord::new(9, 9)), None);
    }

    #[test]
    fn blueprint_rejects_dimension_mismatch() {
        let result = ArenaBlueprint::from_parts(
            3,
            2,
            &[0, 0, 0],
            Vec::new(),
            TilePoint::new(0.5, 0.5),
        );
        assert_eq!(
            result.unwrap_err(),
            BlueprintError::DimensionMismatch {
                expected: 6,
                actual: 3,
            }
        );
    }

    #[test]
    fn blueprint_rejects_unknown_code() {
        let result = ArenaBlueprint::from_parts(
            1,
            1,
            &[7],
            Vec::new(),
            TilePoint::new(0.5, 0.5),
        );
        assert_eq!(result.unwrap_err(), BlueprintError::UnknownBoxCode { code: 7 });
    }

    #[test]
    fn blueprint_rejects_out_of_bounds_spawn() {
        let result = ArenaBlueprint::from_parts(
            2,
            2,
            &[0, 0, 0, 0],
            vec![SpawnPoint::new(TilePoint::new(2.5, 0.5), 0.0)],
            TilePoint::new(0.5, 0.5),
        );
        assert_eq!(result.unwrap_err(), BlueprintError::SpawnOutOfBounds { index: 0 });
    }

    #[test]
    fn blueprint_rejects_empty_grid() {
        let result =
            ArenaBlueprint::from_parts(0, 4, &[], Vec::new(), TilePoint::new(0.0, 0.0));
        assert_eq!(result.unwrap_err(), BlueprintError::EmptyGrid);
    }
}
