#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Rampart games.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use rampart_core::{GameConfig, ImpactPolicy, WaveComposition, WELCOME_BANNER};
use rampart_system_analytics::{Achievement, Analytics};
use rampart_system_waves::Waves;
use rampart_world::MapLayout;
use serde::Deserialize;

mod layout_transfer;
mod persistence;
mod runner;

use layout_transfer::{TowerLayoutSnapshot, TowerLayoutTower};
use persistence::{load_record, save_record, DEFAULT_STATS_FILE};
use runner::{run_game, RunOptions};

/// Rampart: a deterministic, headless tower-defence simulation.
#[derive(Debug, Parser)]
#[command(name = "rampart", about = "Run headless Rampart tower-defence games")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandLine>,
}

#[derive(Debug, Subcommand)]
enum CommandLine {
    /// Play a full game with the automatic builder.
    Run(RunArgs),
    /// List the built-in map layouts.
    Maps,
    /// Show persisted lifetime statistics and achievements.
    Stats(StatsArgs),
    /// Decode a shared tower-layout string.
    DecodeLayout {
        /// The `rampart:v1:...` string to decode.
        code: String,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Built-in map to play on.
    #[arg(long, default_value = "classic")]
    map: String,
    /// TOML file with a custom map layout, overriding `--map`.
    #[arg(long)]
    map_file: Option<PathBuf>,
    /// TOML file with tuning overrides.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Number of waves to play; 0 plays the whole table.
    #[arg(long, default_value_t = 0)]
    waves: u32,
    /// Seed for the deterministic spawn shuffle; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// File holding lifetime statistics.
    #[arg(long, default_value = DEFAULT_STATS_FILE)]
    stats_file: PathBuf,
    /// Print the final tower layout as a shareable string.
    #[arg(long)]
    share: bool,
    /// Suppress wave-by-wave progress lines.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct StatsArgs {
    /// File holding lifetime statistics.
    #[arg(long, default_value = DEFAULT_STATS_FILE)]
    stats_file: PathBuf,
}

/// Optional overrides loaded from a tuning TOML file.
#[derive(Debug, Default, Deserialize)]
struct Tuning {
    /// Starting lives for the player.
    starting_health: Option<u32>,
    /// Starting money for the player.
    starting_money: Option<u32>,
    /// Milliseconds between successive spawns within a wave.
    stagger_ms: Option<u64>,
    /// Resolution policy for projectiles that lose their target in flight.
    impact_policy: Option<ImpactPolicy>,
    /// Replacement wave table.
    waves: Option<Vec<WaveComposition>>,
    /// Replacement map layout.
    map: Option<MapLayout>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        None | Some(CommandLine::Maps) => list_maps(),
        Some(CommandLine::Run(args)) => run(args),
        Some(CommandLine::Stats(args)) => show_stats(&args.stats_file),
        Some(CommandLine::DecodeLayout { code }) => decode_layout(&code),
    }
}

fn list_maps() -> Result<()> {
    println!("{WELCOME_BANNER}");
    for name in ["classic", "gauntlet"] {
        let layout = MapLayout::builtin(name).expect("built-in layout exists");
        println!(
            "{:<10} {:?}  {}x{} grid, {} path cells",
            layout.name,
            layout.difficulty,
            layout.columns,
            layout.rows,
            layout.path.len()
        );
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let tuning = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };

    let layout = resolve_layout(&args, &tuning)?;
    let mut game = GameConfig::default();
    if let Some(health) = tuning.starting_health {
        game.starting_health = health;
    }
    if let Some(money) = tuning.starting_money {
        game.starting_money = money;
    }
    if let Some(policy) = tuning.impact_policy {
        game.impact_policy = policy;
    }

    let schedule = tuning
        .waves
        .clone()
        .unwrap_or_else(Waves::standard_schedule);
    let stagger = Duration::from_millis(tuning.stagger_ms.unwrap_or(500));
    let seed = args.seed.unwrap_or_else(rand::random);

    let record = load_record(&args.stats_file)?;
    let mut analytics = Analytics::from_record(record);

    println!("{WELCOME_BANNER}");
    println!(
        "map '{}' ({:?}), seed {seed}",
        layout.name, layout.difficulty
    );

    let options = RunOptions {
        layout,
        game,
        schedule,
        stagger,
        seed,
        wave_limit: args.waves,
        verbose: !args.quiet,
    };
    let (report, newly_unlocked) = run_game(&options, &mut analytics)?;

    let outcome = if report.victory {
        "victory"
    } else if report.health == 0 {
        "defeat"
    } else {
        "stopped"
    };
    println!(
        "{outcome}: {} waves, score {}, {} lives left, {} money banked",
        report.waves_completed, report.score, report.health, report.money
    );
    println!(
        "{} enemies killed, {} escaped, {} towers standing",
        report.kills,
        report.escapes,
        report.scene.towers.len()
    );
    for achievement in &newly_unlocked {
        println!("achievement unlocked: {}", achievement.name());
    }

    if args.share {
        let snapshot = TowerLayoutSnapshot {
            columns: options.layout.columns,
            rows: options.layout.rows,
            map: options.layout.name.clone(),
            towers: report
                .scene
                .towers
                .iter()
                .map(|marker| TowerLayoutTower {
                    kind: marker.kind,
                    cell: marker.cell,
                    level: marker.level,
                })
                .collect(),
        };
        println!("layout: {}", snapshot.encode());
    }

    save_record(&args.stats_file, &analytics.record())?;
    Ok(())
}

fn resolve_layout(args: &RunArgs, tuning: &Tuning) -> Result<MapLayout> {
    if let Some(path) = &args.map_file {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read map file {}", path.display()))?;
        let layout: MapLayout = toml::from_str(&contents)
            .with_context(|| format!("could not parse map file {}", path.display()))?;
        return Ok(layout);
    }
    if let Some(layout) = &tuning.map {
        return Ok(layout.clone());
    }
    MapLayout::builtin(&args.map)
        .ok_or_else(|| anyhow!("unknown built-in map '{}'; try `rampart maps`", args.map))
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("could not read tuning file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("could not parse tuning file {}", path.display()))
}

fn show_stats(path: &Path) -> Result<()> {
    let record = load_record(path)?;
    let statistics = &record.statistics;

    println!("lifetime statistics from {}", path.display());
    println!("  kills:           {}", statistics.total_kills);
    println!("  boss kills:      {}", statistics.boss_kills);
    println!("  towers built:    {}", statistics.towers_built);
    println!("  towers sold:     {}", statistics.towers_sold);
    println!("  upgrades:        {}", statistics.upgrades);
    println!("  abilities used:  {}", statistics.abilities_used);
    println!("  waves completed: {}", statistics.waves_completed);
    println!("  perfect waves:   {}", statistics.perfect_waves);
    println!("  money earned:    {}", statistics.money_earned);
    println!("  money spent:     {}", statistics.money_spent);
    println!("  damage dealt:    {:.0}", statistics.damage_dealt);
    println!("  lives lost:      {}", statistics.lives_lost);
    println!("  games played:    {}", statistics.games_played);
    println!("  highest wave:    {}", statistics.highest_wave);
    println!("  highest score:   {}", statistics.highest_score);

    println!("achievements:");
    for achievement in Achievement::ALL {
        let (current, threshold) = achievement.progress(statistics);
        let marker = if record.achievements.contains(&achievement) {
            "x"
        } else {
            " "
        };
        println!(
            "  [{marker}] {:<12} {current}/{threshold}",
            achievement.name()
        );
    }
    Ok(())
}

fn decode_layout(code: &str) -> Result<()> {
    let snapshot =
        TowerLayoutSnapshot::decode(code).map_err(|error| anyhow!(error.to_string()))?;
    println!(
        "map '{}' ({}x{}), {} towers",
        snapshot.map,
        snapshot.columns,
        snapshot.rows,
        snapshot.towers.len()
    );
    for tower in &snapshot.towers {
        println!(
            "  {:?} at ({}, {}) level {}",
            tower.kind,
            tower.cell.column(),
            tower.cell.row(),
            tower.level
        );
    }
    Ok(())
}
