//! Built-in arena layouts shipped with the runner.

use flag_rush_core::{ArenaBlueprint, SpawnPoint, TilePoint};

/// Resolves a built-in arena by its name.
pub(crate) fn by_name(name: &str) -> Option<ArenaBlueprint> {
    match name {
        "map0" => Some(map0()),
        "map1" => Some(map1()),
        "map2" => Some(map2()),
        _ => None,
    }
}

/// Names of every built-in arena, for help output.
pub(crate) const NAMES: [&str; 3] = ["map0", "map1", "map2"];

fn spawn(x: f32, y: f32, heading_degrees: f32) -> SpawnPoint {
    SpawnPoint::new(TilePoint::new(x, y), heading_degrees)
}

/// Nine-by-nine duel arena with rock walls guarding the center.
fn map0() -> ArenaBlueprint {
    #[rustfmt::skip]
    let codes = [
        0, 1, 0, 0, 0, 0, 0, 1, 0,
        0, 1, 0, 2, 0, 2, 0, 1, 0,
        0, 2, 0, 1, 0, 1, 0, 2, 0,
        0, 0, 0, 1, 0, 1, 0, 0, 0,
        1, 1, 0, 3, 0, 3, 0, 1, 1,
        0, 0, 0, 1, 0, 1, 0, 0, 0,
        0, 2, 0, 1, 0, 1, 0, 2, 0,
        0, 1, 0, 2, 0, 2, 0, 1, 0,
        0, 1, 0, 0, 0, 0, 0, 1, 0,
    ];
    ArenaBlueprint::from_parts(
        9,
        9,
        &codes,
        vec![
            spawn(0.5, 0.5, 0.0),
            spawn(8.5, 0.5, 0.0),
            spawn(0.5, 8.5, 180.0),
            spawn(8.5, 8.5, 180.0),
        ],
        TilePoint::new(4.5, 4.5),
    )
    .expect("built-in arena data is valid")
}

/// Fifteen-by-eleven arena for up to six tanks.
fn map1() -> ArenaBlueprint {
    #[rustfmt::skip]
    let codes = [
        0, 2, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 2, 0,
        0, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 0,
        0, 1, 0, 3, 1, 1, 0, 0, 0, 1, 1, 3, 0, 1, 0,
        0, 2, 0, 0, 3, 0, 0, 2, 0, 0, 3, 0, 0, 2, 0,
        2, 1, 0, 1, 1, 0, 1, 3, 1, 0, 1, 1, 0, 1, 2,
        1, 1, 3, 0, 3, 2, 3, 0, 3, 2, 3, 0, 3, 1, 1,
        2, 1, 0, 1, 1, 0, 1, 3, 1, 0, 1, 1, 0, 1, 2,
        0, 2, 0, 0, 3, 0, 0, 2, 0, 0, 3, 0, 0, 2, 0,
        0, 1, 0, 3, 1, 1, 0, 0, 0, 1, 1, 3, 0, 1, 0,
        0, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 0,
        0, 2, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 2, 0,
    ];
    ArenaBlueprint::from_parts(
        15,
        11,
        &codes,
        vec![
            spawn(0.5, 0.5, 0.0),
            spawn(14.5, 0.5, 0.0),
            spawn(0.5, 10.5, 180.0),
            spawn(14.5, 10.5, 180.0),
            spawn(7.5, 0.5, 0.0),
            spawn(7.5, 10.5, 180.0),
        ],
        TilePoint::new(7.5, 5.5),
    )
    .expect("built-in arena data is valid")
}

/// Ten-by-five corridor arena for head-to-head matches.
fn map2() -> ArenaBlueprint {
    #[rustfmt::skip]
    let codes = [
        0, 2, 0, 2, 0, 0, 2, 0, 2, 0,
        0, 3, 0, 1, 3, 3, 1, 0, 3, 0,
        0, 1, 0, 1, 0, 0, 1, 0, 1, 0,
        0, 3, 0, 1, 3, 3, 1, 0, 3, 0,
        0, 2, 0, 2, 0, 0, 2, 0, 2, 0,
    ];
    ArenaBlueprint::from_parts(
        10,
        5,
        &codes,
        vec![spawn(0.5, 2.5, 270.0), spawn(9.5, 2.5, 90.0)],
        TilePoint::new(5.0, 2.5),
    )
    .expect("built-in arena data is valid")
}
