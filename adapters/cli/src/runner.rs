//! Headless game loop that wires the world to the pure systems.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{bail, Result};
use rampart_core::{CellCoord, Command, Event, GameConfig, TowerKind, WaveComposition};
use rampart_rendering::{GridPresentation, Scene};
use rampart_system_abilities::{Abilities, AbilityRequest};
use rampart_system_analytics::{Achievement, Analytics};
use rampart_system_combat::Combat;
use rampart_system_targeting::Targeting;
use rampart_system_waves::{Config as WaveConfig, Waves};
use rampart_world::{apply, query, MapLayout, World};

/// Fixed 60 Hz frame used by the headless loop.
const FRAME: Duration = Duration::from_micros(16_667);

/// One hour of simulated time; a run that has not resolved by then is stuck.
const MAX_FRAMES: u64 = 60 * 60 * 60;

/// Purchase rotation used by the automatic builder.
const BUILD_ROTATION: [TowerKind; 10] = [
    TowerKind::Basic,
    TowerKind::Frost,
    TowerKind::Sniper,
    TowerKind::Venom,
    TowerKind::Support,
    TowerKind::Splash,
    TowerKind::Laser,
    TowerKind::Arc,
    TowerKind::Rapid,
    TowerKind::Artillery,
];

/// Everything required to run one headless game.
pub(crate) struct RunOptions {
    /// Map the game is played on.
    pub(crate) layout: MapLayout,
    /// World tuning knobs.
    pub(crate) game: GameConfig,
    /// Wave table driving the campaign.
    pub(crate) schedule: Vec<WaveComposition>,
    /// Delay between successive spawns within a wave.
    pub(crate) stagger: Duration,
    /// Seed for the deterministic spawn-order shuffle.
    pub(crate) seed: u64,
    /// Number of waves to play before stopping, clamped to the table.
    pub(crate) wave_limit: u32,
    /// Print wave-by-wave progress lines.
    pub(crate) verbose: bool,
}

/// Summary of a finished headless run.
pub(crate) struct RunReport {
    pub(crate) victory: bool,
    pub(crate) score: u32,
    pub(crate) health: u32,
    pub(crate) money: u32,
    pub(crate) waves_completed: u32,
    pub(crate) kills: u64,
    pub(crate) escapes: u64,
    /// Final frame as a rendering scene; carries the surviving towers.
    pub(crate) scene: Scene,
}

/// Runs a full game, folding its events into the provided analytics.
pub(crate) fn run_game(
    options: &RunOptions,
    analytics: &mut Analytics,
) -> Result<(RunReport, Vec<Achievement>)> {
    let mut world = World::new(&options.layout, options.game)?;
    let mut waves = Waves::new(
        options.schedule.clone(),
        WaveConfig::new(options.stagger, options.seed),
    );
    let mut targeting = Targeting::new();
    let mut combat = Combat::new();
    let mut abilities = Abilities::new();

    let sites = build_sites(&world);
    let mut site_cursor = 0;
    let mut kind_cursor = 0;

    let wave_limit = if options.wave_limit == 0 {
        waves.total_waves()
    } else {
        options.wave_limit.min(waves.total_waves())
    };

    let mut newly_unlocked = Vec::new();
    let mut kills = 0u64;
    let mut escapes = 0u64;
    let mut waves_completed = 0u32;
    let mut victory = false;
    let mut frames = 0u64;

    while frames < MAX_FRAMES {
        if query::player(&world).game_over {
            break;
        }

        let mut events = Vec::new();

        if waves.is_idle() {
            if waves_completed >= wave_limit {
                break;
            }
            run_build_phase(
                &mut world,
                &sites,
                &mut site_cursor,
                &mut kind_cursor,
                &mut events,
            );
            apply(&mut world, Command::StartWave, &mut events);
        }

        apply(&mut world, Command::Tick { dt: FRAME }, &mut events);

        let mut commands = Vec::new();
        waves.handle(&events, &mut commands);
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        let requests = ability_requests(&world, &abilities);
        let mut commands = Vec::new();
        abilities.handle(&events, &requests, &mut commands);
        let mut ability_events = Vec::new();
        for command in commands {
            apply(&mut world, command, &mut ability_events);
        }
        // Feed confirmations straight back so cooldowns arm this frame.
        let mut ignored = Vec::new();
        abilities.handle(&ability_events, &[], &mut ignored);
        events.append(&mut ability_events);

        let tower_view = query::tower_view(&world);
        let enemy_view = query::enemy_view(&world);
        let mut assignments = Vec::new();
        targeting.handle(&tower_view, &enemy_view, &mut assignments);
        let mut commands = Vec::new();
        combat.handle(&tower_view, &assignments, &mut commands);
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        for event in &events {
            match event {
                Event::EnemyKilled { .. } => kills += 1,
                Event::EnemyEscaped { .. } => escapes += 1,
                Event::WaveStarted { wave } => {
                    if options.verbose {
                        println!("wave {} incoming", wave.get());
                    }
                }
                Event::WaveCompleted { wave, perfect } => {
                    waves_completed += 1;
                    if options.verbose {
                        let suffix = if *perfect { " (perfect)" } else { "" };
                        println!("wave {} cleared{suffix}", wave.get());
                    }
                }
                Event::GameOver { victory: won, .. } => {
                    victory = *won;
                }
                _ => {}
            }
        }

        analytics.handle(&events, &mut newly_unlocked);
        frames += 1;
    }

    if frames >= MAX_FRAMES {
        bail!("simulation exceeded the frame budget without resolving");
    }

    let player = query::player(&world);
    let (columns, rows) = query::grid_dimensions(&world);
    let grid = GridPresentation::from_waypoints(columns, rows, query::waypoints(&world))
        .expect("validated maps always carry waypoints");
    let scene = Scene::compose(
        grid,
        &query::enemy_view(&world),
        &query::tower_view(&world),
        &query::projectiles(&world),
        &query::beams(&world),
        player,
    );

    Ok((
        RunReport {
            victory,
            score: player.score,
            health: player.health,
            money: player.money,
            waves_completed,
            kills,
            escapes,
            scene,
        },
        newly_unlocked,
    ))
}

/// Buildable cells bordering the path, ordered along the route.
fn build_sites(world: &World) -> Vec<CellCoord> {
    let mut seen = BTreeSet::new();
    let mut sites = Vec::new();

    for waypoint in query::waypoints(world) {
        for neighbor in adjacent_cells(*waypoint) {
            if query::is_buildable(world, neighbor) && seen.insert(neighbor) {
                sites.push(neighbor);
            }
        }
    }

    sites
}

fn adjacent_cells(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }
    candidates[count] = Some(CellCoord::new(cell.column() + 1, cell.row()));
    count += 1;
    candidates[count] = Some(CellCoord::new(cell.column(), cell.row() + 1));
    count += 1;
    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

/// Spends available money on new towers, then on upgrades.
fn run_build_phase(
    world: &mut World,
    sites: &[CellCoord],
    site_cursor: &mut usize,
    kind_cursor: &mut usize,
    out_events: &mut Vec<Event>,
) {
    while *site_cursor < sites.len() {
        let kind = BUILD_ROTATION[*kind_cursor % BUILD_ROTATION.len()];
        if query::player(world).money < kind.spec().cost {
            return;
        }
        let cell = sites[*site_cursor];
        apply(world, Command::PlaceTower { kind, cell }, out_events);
        *site_cursor += 1;
        if matches!(out_events.last(), Some(Event::TowerPlaced { .. })) {
            *kind_cursor += 1;
        }
    }

    // Board full: sink the surplus into upgrades.
    let towers: Vec<_> = query::tower_view(world)
        .iter()
        .map(|snapshot| snapshot.id)
        .collect();
    for tower in towers {
        let Some(cost) = query::upgrade_cost(world, tower) else {
            continue;
        };
        if query::player(world).money < cost {
            continue;
        }
        apply(world, Command::UpgradeTower { tower }, out_events);
    }
}

/// Emergency heuristics for the automatic player's ability use.
fn ability_requests(world: &World, abilities: &Abilities) -> Vec<AbilityRequest> {
    use rampart_core::AbilityKind;

    let mut requests = Vec::new();
    let player = query::player(world);
    let enemy_count = query::enemy_view(world).len();

    if enemy_count >= 12
        && abilities.is_ready(AbilityKind::FreezeAll)
        && player.money >= AbilityKind::FreezeAll.cost() + 200
    {
        requests.push(AbilityRequest::new(AbilityKind::FreezeAll, None));
    }
    if player.health <= 5
        && abilities.is_ready(AbilityKind::HealthRestore)
        && player.money >= AbilityKind::HealthRestore.cost()
    {
        requests.push(AbilityRequest::new(AbilityKind::HealthRestore, None));
    }

    requests
}
