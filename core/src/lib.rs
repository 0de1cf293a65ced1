#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod kinds;

pub use kinds::{
    AbilityEffect, AbilityKind, Difficulty, EnemyKind, EnemySpec, StatusKind, StatusSpec,
    TowerBehavior, TowerKind, TowerSpec, WaveComposition, WaveEntry,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rampart.";

/// Maximum upgrade level a tower may reach.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Fraction of a tower's cumulative spend refunded when it is sold.
pub const SELL_REFUND_RATIO: f32 = 0.70;

/// Computes the sell refund for a cumulative spend.
///
/// Exactly 70 % in integer arithmetic, truncating toward zero, so the result
/// never drifts with floating-point representation.
#[must_use]
pub const fn sell_refund(total_cost: u32) -> u32 {
    (total_cost as u64 * 7 / 10) as u32
}

/// Exponent base applied to a tower's base cost for each upgrade purchase.
pub const UPGRADE_COST_FACTOR: f32 = 1.5;

/// Per-level multiplier applied to a tower's damage, floored after scaling.
pub const UPGRADE_DAMAGE_FACTOR: f32 = 1.5;

/// Per-level multiplier applied to a tower's range.
pub const UPGRADE_RANGE_FACTOR: f32 = 1.1;

/// Per-level multiplier applied to a tower's fire rate.
pub const UPGRADE_FIRE_RATE_FACTOR: f32 = 1.2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Toggles the global pause flag that short-circuits the tick body.
    SetPaused {
        /// Desired pause state for the simulation.
        paused: bool,
    },
    /// Requests that the next wave begin.
    StartWave,
    /// Requests that an enemy of the provided kind enter at the path start.
    SpawnEnemy {
        /// Kind of enemy to spawn.
        kind: EnemyKind,
    },
    /// Reports that every enemy of the active wave has been resolved.
    CompleteWave {
        /// Indicates that the completed wave was the final scheduled wave.
        last: bool,
    },
    /// Requests placement of a tower at the provided grid cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell that would anchor the tower.
        cell: CellCoord,
    },
    /// Requests an in-place upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests removal of an existing tower in exchange for a refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Selects the targeting policy used by an existing tower.
    SetTargetingMode {
        /// Identifier of the tower to reconfigure.
        tower: TowerId,
        /// Targeting policy the tower should adopt.
        mode: TargetingMode,
    },
    /// Requests that a ready tower fire at the provided enemy.
    FireTower {
        /// Identifier of the firing tower.
        tower: TowerId,
        /// Identifier of the enemy selected as the target.
        target: EnemyId,
    },
    /// Assigns or clears the continuous beam emitted by a laser tower.
    AimBeam {
        /// Identifier of the beam-capable tower.
        tower: TowerId,
        /// Enemy held by the beam, or `None` to release it.
        target: Option<EnemyId>,
    },
    /// Requests activation of a special ability.
    ActivateAbility {
        /// Ability the player wants to trigger.
        ability: AbilityKind,
        /// Point targeted by the ability, when it requires one.
        target: Option<CellPoint>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces a change of the global pause flag.
    PausedChanged {
        /// Pause state that became active.
        paused: bool,
    },
    /// Confirms that a new wave began.
    WaveStarted {
        /// One-based index of the wave that started.
        wave: WaveId,
    },
    /// Reports that a wave start request was rejected.
    WaveRejected {
        /// Specific reason the wave could not start.
        reason: WaveError,
    },
    /// Confirms that an enemy entered the map at the path start.
    EnemySpawned {
        /// Identifier assigned to the enemy in spawn order.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
    },
    /// Reports damage applied to an enemy after armor and shield absorption.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Health actually removed by the hit.
        amount: f32,
    },
    /// Confirms that an enemy died and its bounty was granted.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Kind of the killed enemy.
        kind: EnemyKind,
        /// Money granted to the player, after any active reward boost.
        reward: u32,
    },
    /// Confirms that an enemy reached the path end and cost the player a life.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Kind of the escaped enemy.
        kind: EnemyKind,
        /// Player health remaining after the escape.
        remaining_health: u32,
    },
    /// Confirms that the active wave fully resolved.
    WaveCompleted {
        /// One-based index of the completed wave.
        wave: WaveId,
        /// Indicates no lives were lost while the wave was active.
        perfect: bool,
    },
    /// Confirms that a tower was placed and its cost deducted.
    TowerPlaced {
        /// Identifier allocated to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was upgraded and its stats recomputed.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower reached.
        level: u8,
        /// Money deducted for the upgrade.
        cost: u32,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold and the refund granted.
    TowerSold {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Money refunded to the player.
        refund: u32,
    },
    /// Reports that a tower sale request was rejected.
    TowerSaleRejected {
        /// Identifier of the tower targeted by the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SellError,
    },
    /// Confirms that a tower adopted a new targeting policy.
    TargetingModeChanged {
        /// Identifier of the reconfigured tower.
        tower: TowerId,
        /// Targeting policy now in effect.
        mode: TargetingMode,
    },
    /// Confirms that a tower fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired the projectile.
        tower: TowerId,
        /// Enemy captured as the projectile's target.
        target: EnemyId,
    },
    /// Reports that a projectile resolved without striking any enemy.
    ProjectileExpired {
        /// Identifier of the wasted projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a special ability activated and its cost was deducted.
    AbilityActivated {
        /// Ability that took effect.
        ability: AbilityKind,
    },
    /// Reports that an ability activation request was rejected.
    AbilityRejected {
        /// Ability named in the request.
        ability: AbilityKind,
        /// Specific reason the activation failed.
        reason: AbilityError,
    },
    /// Announces the end of the game.
    GameOver {
        /// `true` when the player survived every scheduled wave.
        victory: bool,
        /// Final score accumulated over the run.
        score: u32,
    },
}

/// Unique identifier assigned to an enemy, allocated in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
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

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
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

/// One-based index identifying a wave within the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveId(u32);

impl WaveId {
    /// Creates a new wave identifier with the provided one-based index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the one-based wave index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Center of the cell expressed in continuous cell units.
    #[must_use]
    pub fn center(self) -> CellPoint {
        CellPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position expressed in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPoint {
    x: f32,
    y: f32,
}

impl CellPoint {
    /// Creates a new point from continuous cell-unit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate measured in cell units along the column axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate measured in cell units along the row axis.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: CellPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation toward another point by the provided factor.
    #[must_use]
    pub fn lerp(self, other: CellPoint, t: f32) -> CellPoint {
        CellPoint::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Policy by which a tower selects an enemy among those in range.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TargetingMode {
    /// Prefers the enemy that has travelled furthest along the path.
    #[default]
    Furthest,
    /// Prefers the earliest-spawned enemy.
    First,
    /// Prefers the latest-spawned enemy.
    Last,
    /// Prefers the enemy nearest to the tower.
    Closest,
    /// Prefers the enemy with the most remaining health.
    Strongest,
    /// Prefers the enemy with the least remaining health.
    Weakest,
}

/// Resolution policy for a projectile whose captured target dies in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactPolicy {
    /// The projectile continues to the captured point and resolves as a no-op.
    #[default]
    Wasted,
    /// The projectile re-aims at the live enemy nearest its current position.
    Retarget,
}

/// Global tuning knobs that parameterize a fresh world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Lives the player starts with; also the health-restore cap.
    pub starting_health: u32,
    /// Money the player starts with.
    pub starting_money: u32,
    /// Resolution policy applied to projectiles that lose their target.
    pub impact_policy: ImpactPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_health: 20,
            starting_money: 650,
            impact_policy: ImpactPolicy::Wasted,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the configured grid bounds.
    OutOfBounds,
    /// The requested cell is part of the enemy path.
    OnPath,
    /// The requested cell already hosts a tower.
    Occupied,
    /// The player cannot afford the tower's cost.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower already reached the maximum upgrade level.
    MaxLevel,
    /// The player cannot afford the upgrade's cost.
    InsufficientFunds,
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SellError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Reasons an ability activation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityError {
    /// The player cannot afford the ability's cost.
    InsufficientFunds,
    /// The ability requires a target point and none was provided.
    MissingTarget,
}

/// Reasons a wave start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveError {
    /// A wave is still active; it must resolve before the next may start.
    WaveInProgress,
    /// The game already ended.
    GameOver,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy in spawn order.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position interpolated along the waypoint path.
    pub position: CellPoint,
    /// Scalar distance travelled along the path, in cell units.
    pub travelled: f32,
    /// Fraction of the path completed, in `0.0..=1.0`.
    pub progress: f32,
    /// Remaining health.
    pub health: f32,
    /// Maximum health after wave scaling.
    pub max_health: f32,
    /// Remaining shield capacity.
    pub shield: f32,
    /// Status effects currently applied to the enemy.
    pub statuses: Vec<StatusSnapshot>,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Status effect instance captured within an enemy snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusSnapshot {
    /// Kind of the applied effect.
    pub kind: StatusKind,
    /// Magnitude of the effect; interpretation depends on the kind.
    pub magnitude: f32,
    /// Seconds remaining before the effect expires.
    pub remaining: f32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Center of the tower's cell in continuous cell units.
    pub center: CellPoint,
    /// Current upgrade level, starting at 1.
    pub level: u8,
    /// Targeting policy currently in effect.
    pub mode: TargetingMode,
    /// Current damage per shot (or per second for beams) after upgrades.
    pub damage: u32,
    /// Current targeting range in cell units after upgrades.
    pub range: f32,
    /// Current fire rate in shots per second after upgrades.
    pub fire_rate: f32,
    /// Indicates the tower's cooldown elapsed and it may fire this frame.
    pub ready: bool,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Locates a snapshot by tower identifier via binary search.
    #[must_use]
    pub fn find(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Current position in continuous cell units.
    pub position: CellPoint,
    /// Captured impact point the projectile flies toward.
    pub impact_point: CellPoint,
}

/// Immutable representation of an active laser beam used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamSnapshot {
    /// Tower emitting the beam.
    pub tower: TowerId,
    /// Enemy currently held by the beam.
    pub enemy: EnemyId,
    /// Beam origin at the tower's cell center.
    pub from: CellPoint,
    /// Beam end at the held enemy's position.
    pub to: CellPoint,
}

/// Snapshot of the player-facing resources and run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Lives remaining.
    pub health: u32,
    /// Money available for construction, upgrades, and abilities.
    pub money: u32,
    /// Score accumulated from enemy bounties.
    pub score: u32,
    /// One-based index of the most recently started wave; zero before any.
    pub wave: u32,
    /// Indicates a wave is currently active.
    pub wave_active: bool,
    /// Indicates the simulation is paused.
    pub paused: bool,
    /// Indicates the run has ended.
    pub game_over: bool,
}

/// Target assignment computed by the targeting system for a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower the assignment belongs to.
    pub tower: TowerId,
    /// Enemy selected by the tower's targeting policy.
    pub enemy: EnemyId,
}
