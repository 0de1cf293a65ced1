use std::time::Duration;

use rampart_core::{Command, EnemyId, EnemyKind, GameConfig, TowerKind, TowerTarget};
use rampart_system_targeting::Targeting;
use rampart_world::{apply, query, MapLayout, World};

fn pump(world: &mut World, command: Command) {
    let mut events = Vec::new();
    apply(world, command, &mut events);
}

fn scripted_assignments() -> Vec<Vec<TowerTarget>> {
    let mut world =
        World::new(&MapLayout::classic(), GameConfig::default()).expect("classic layout is valid");
    let mut targeting = Targeting::new();
    let mut frames = Vec::new();

    pump(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: rampart_core::CellCoord::new(1, 6),
        },
    );
    pump(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Sniper,
            cell: rampart_core::CellCoord::new(5, 6),
        },
    );

    for index in 0..40 {
        if index % 4 == 0 {
            pump(
                &mut world,
                Command::SpawnEnemy {
                    kind: if index % 8 == 0 {
                        EnemyKind::Basic
                    } else {
                        EnemyKind::Fast
                    },
                },
            );
        }
        pump(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
        );

        let mut out = Vec::new();
        targeting.handle(&query::tower_view(&world), &query::enemy_view(&world), &mut out);
        frames.push(out);
    }

    frames
}

#[test]
fn assignments_replay_identically() {
    assert_eq!(scripted_assignments(), scripted_assignments());
}

#[test]
fn furthest_assignment_tracks_the_leading_enemy() {
    let mut world =
        World::new(&MapLayout::classic(), GameConfig::default()).expect("classic layout is valid");
    let mut targeting = Targeting::new();

    pump(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Sniper,
            cell: rampart_core::CellCoord::new(1, 6),
        },
    );
    pump(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Basic,
        },
    );
    pump(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
    );
    pump(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Basic,
        },
    );

    let mut out = Vec::new();
    targeting.handle(&query::tower_view(&world), &query::enemy_view(&world), &mut out);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].enemy, EnemyId::new(0), "the older enemy is further");
}
