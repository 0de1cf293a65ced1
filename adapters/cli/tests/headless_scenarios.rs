//! End-to-end scenarios driving the world through the full system pipeline.

use std::time::Duration;

use rampart_core::{
    CellCoord, Command, Difficulty, EnemyKind, Event, GameConfig, TowerKind, WaveComposition,
    WaveEntry,
};
use rampart_system_combat::Combat;
use rampart_system_targeting::Targeting;
use rampart_system_waves::{Config as WaveConfig, Waves};
use rampart_world::{apply, query, MapLayout, World};

/// Serpentine training layout whose whole path fits inside a basic tower's
/// range from the center cell.
fn training_layout() -> MapLayout {
    let mut path = Vec::new();
    for column in 1..=5 {
        path.push(CellCoord::new(column, 1));
    }
    path.push(CellCoord::new(5, 2));
    for column in (1..=5).rev() {
        path.push(CellCoord::new(column, 3));
    }

    MapLayout {
        name: "training".to_owned(),
        difficulty: Difficulty::Easy,
        columns: 7,
        rows: 5,
        path,
    }
}

struct Pipeline {
    world: World,
    targeting: Targeting,
    combat: Combat,
}

impl Pipeline {
    fn new(layout: &MapLayout) -> Self {
        Self {
            world: World::new(layout, GameConfig::default()).expect("layout is valid"),
            targeting: Targeting::new(),
            combat: Combat::new(),
        }
    }

    fn command(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        events
    }

    /// One fixed frame: tick, then targeting and combat on the fresh snapshot.
    fn frame(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, Command::Tick { dt }, &mut events);

        let tower_view = query::tower_view(&self.world);
        let enemy_view = query::enemy_view(&self.world);
        let mut assignments = Vec::new();
        self.targeting
            .handle(&tower_view, &enemy_view, &mut assignments);
        let mut commands = Vec::new();
        self.combat.handle(&tower_view, &assignments, &mut commands);
        for command in commands {
            apply(&mut self.world, command, &mut events);
        }
        events
    }
}

#[test]
fn basic_tower_kills_the_basic_enemy_on_the_fifth_shot() {
    let layout = training_layout();
    let mut pipeline = Pipeline::new(&layout);

    let placed = pipeline.command(Command::PlaceTower {
        kind: TowerKind::Basic,
        cell: CellCoord::new(3, 2),
    });
    assert!(matches!(placed.last(), Some(Event::TowerPlaced { .. })));

    let _ = pipeline.command(Command::SpawnEnemy {
        kind: EnemyKind::Basic,
    });
    let money_before = query::player(&pipeline.world).money;

    let mut shots = 0;
    let mut kills = 0;
    let mut escapes = 0;
    let dt = Duration::from_millis(50);

    // Path length 10 at speed 2.0 gives the enemy five seconds to live.
    for _ in 0..110 {
        let events = pipeline.frame(dt);
        for event in &events {
            match event {
                Event::ProjectileFired { .. } => shots += 1,
                Event::EnemyKilled { .. } => kills += 1,
                Event::EnemyEscaped { .. } => escapes += 1,
                _ => {}
            }
        }
        if kills > 0 {
            break;
        }
    }

    assert_eq!(kills, 1, "the enemy dies before reaching the exit");
    assert_eq!(escapes, 0);
    assert_eq!(shots, 5, "50 health against 10 damage takes five hits");
    assert_eq!(query::player(&pipeline.world).money, money_before + 10);
    assert_eq!(query::player(&pipeline.world).score, 10);
}

#[test]
fn towers_hold_fire_with_nothing_in_range() {
    let layout = training_layout();
    let mut pipeline = Pipeline::new(&layout);
    let _ = pipeline.command(Command::PlaceTower {
        kind: TowerKind::Basic,
        cell: CellCoord::new(3, 2),
    });

    for _ in 0..60 {
        let events = pipeline.frame(Duration::from_millis(50));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. })));
    }
}

#[test]
fn fire_rate_bounds_shots_over_time() {
    let layout = training_layout();
    let mut pipeline = Pipeline::new(&layout);
    let _ = pipeline.command(Command::PlaceTower {
        kind: TowerKind::Basic,
        cell: CellCoord::new(3, 2),
    });
    let _ = pipeline.command(Command::SpawnEnemy {
        kind: EnemyKind::Tank,
    });

    // Two simulated seconds at a 1.0/s fire rate: at most two shots can
    // start, and the tank (200 hp) cannot die to them.
    let mut shots = 0;
    for _ in 0..40 {
        let events = pipeline.frame(Duration::from_millis(50));
        shots += events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileFired { .. }))
            .count();
    }
    assert!(shots <= 3, "fire rate 1.0 allows at most ~2 shots in 2 s");
    assert!(shots >= 2);
}

#[test]
fn a_two_wave_campaign_replays_identically() {
    let script = || {
        let layout = training_layout();
        let mut pipeline = Pipeline::new(&layout);
        let mut waves = Waves::new(
            vec![
                WaveComposition::new(vec![WaveEntry::new(EnemyKind::Basic, 4)]),
                WaveComposition::new(vec![
                    WaveEntry::new(EnemyKind::Fast, 3),
                    WaveEntry::new(EnemyKind::Swarm, 3),
                ]),
            ],
            WaveConfig::new(Duration::from_millis(500), 1234),
        );

        let _ = pipeline.command(Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(3, 2),
        });
        let _ = pipeline.command(Command::PlaceTower {
            kind: TowerKind::Frost,
            cell: CellCoord::new(2, 2),
        });

        let mut log = Vec::new();
        let dt = Duration::from_millis(50);
        for _ in 0..2400 {
            if query::player(&pipeline.world).game_over {
                break;
            }
            let mut events = Vec::new();
            if waves.is_idle() {
                apply(&mut pipeline.world, Command::StartWave, &mut events);
            }
            apply(&mut pipeline.world, Command::Tick { dt }, &mut events);

            let mut commands = Vec::new();
            waves.handle(&events, &mut commands);
            for command in commands {
                apply(&mut pipeline.world, command, &mut events);
            }

            let tower_view = query::tower_view(&pipeline.world);
            let enemy_view = query::enemy_view(&pipeline.world);
            let mut assignments = Vec::new();
            pipeline
                .targeting
                .handle(&tower_view, &enemy_view, &mut assignments);
            let mut commands = Vec::new();
            pipeline
                .combat
                .handle(&tower_view, &assignments, &mut commands);
            for command in commands {
                apply(&mut pipeline.world, command, &mut events);
            }

            log.extend(events);
        }
        log
    };

    let first = script();
    let second = script();
    assert_eq!(first, second);

    assert!(first
        .iter()
        .any(|event| matches!(event, Event::WaveCompleted { .. })));
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::GameOver { .. })));
}
