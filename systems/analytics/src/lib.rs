#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Statistics and achievement collaborator.
//!
//! The simulation core never reads or writes persistent state; it only emits
//! events. This system folds those events into lifetime counters, unlocks
//! achievements when thresholds are crossed, and produces the flat record an
//! adapter persists between runs.

use std::collections::BTreeSet;

use rampart_core::Event;
use serde::{Deserialize, Serialize};

/// Lifetime counters accumulated across runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Enemies killed by towers, projectiles, beams, and abilities.
    pub total_kills: u64,
    /// Kills of boss-class enemies.
    pub boss_kills: u64,
    /// Towers constructed.
    pub towers_built: u64,
    /// Towers sold back.
    pub towers_sold: u64,
    /// Upgrades purchased.
    pub upgrades: u64,
    /// Special abilities activated.
    pub abilities_used: u64,
    /// Waves fully resolved.
    pub waves_completed: u64,
    /// Waves completed without losing a life.
    pub perfect_waves: u64,
    /// Money collected from bounties and refunds.
    pub money_earned: u64,
    /// Money spent on construction, upgrades, and abilities.
    pub money_spent: u64,
    /// Total health removed from enemies.
    pub damage_dealt: f64,
    /// Lives lost to escaping enemies.
    pub lives_lost: u64,
    /// Completed runs, by victory or defeat.
    pub games_played: u64,
    /// Highest wave index ever completed.
    pub highest_wave: u32,
    /// Highest final score across runs.
    pub highest_score: u32,
}

/// Achievements unlockable from lifetime statistics.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Achievement {
    /// First enemy killed.
    FirstBlood,
    /// One hundred enemies killed.
    Exterminator,
    /// One thousand enemies killed.
    Legion,
    /// First boss killed.
    BossSlayer,
    /// Ten bosses killed.
    BossHunter,
    /// Ten towers built.
    Architect,
    /// Fifty towers built.
    Fortress,
    /// Twenty-five waves completed.
    Veteran,
    /// Five perfect waves.
    Flawless,
    /// Twenty-five upgrades purchased.
    Tinkerer,
    /// Ten thousand money earned.
    Magnate,
}

impl Achievement {
    /// Every achievement in presentation order.
    pub const ALL: [Achievement; 11] = [
        Achievement::FirstBlood,
        Achievement::Exterminator,
        Achievement::Legion,
        Achievement::BossSlayer,
        Achievement::BossHunter,
        Achievement::Architect,
        Achievement::Fortress,
        Achievement::Veteran,
        Achievement::Flawless,
        Achievement::Tinkerer,
        Achievement::Magnate,
    ];

    /// Display name shown in achievement listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstBlood => "First Blood",
            Self::Exterminator => "Exterminator",
            Self::Legion => "Legion",
            Self::BossSlayer => "Boss Slayer",
            Self::BossHunter => "Boss Hunter",
            Self::Architect => "Architect",
            Self::Fortress => "Fortress",
            Self::Veteran => "Veteran",
            Self::Flawless => "Flawless",
            Self::Tinkerer => "Tinkerer",
            Self::Magnate => "Magnate",
        }
    }

    /// Current value and unlock threshold for the tracked metric.
    #[must_use]
    pub fn progress(self, statistics: &Statistics) -> (u64, u64) {
        match self {
            Self::FirstBlood => (statistics.total_kills, 1),
            Self::Exterminator => (statistics.total_kills, 100),
            Self::Legion => (statistics.total_kills, 1000),
            Self::BossSlayer => (statistics.boss_kills, 1),
            Self::BossHunter => (statistics.boss_kills, 10),
            Self::Architect => (statistics.towers_built, 10),
            Self::Fortress => (statistics.towers_built, 50),
            Self::Veteran => (statistics.waves_completed, 25),
            Self::Flawless => (statistics.perfect_waves, 5),
            Self::Tinkerer => (statistics.upgrades, 25),
            Self::Magnate => (statistics.money_earned, 10_000),
        }
    }

    /// Reports whether the statistics satisfy the unlock condition.
    #[must_use]
    pub fn is_satisfied_by(self, statistics: &Statistics) -> bool {
        let (current, threshold) = self.progress(statistics);
        current >= threshold
    }
}

/// Flat record persisted between runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Lifetime counters.
    pub statistics: Statistics,
    /// Achievements unlocked so far.
    pub achievements: Vec<Achievement>,
}

/// Event-consuming statistics and achievement system.
#[derive(Clone, Debug, Default)]
pub struct Analytics {
    statistics: Statistics,
    unlocked: BTreeSet<Achievement>,
}

impl Analytics {
    /// Creates an analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores an analytics system from a persisted record.
    #[must_use]
    pub fn from_record(record: SaveRecord) -> Self {
        Self {
            statistics: record.statistics,
            unlocked: record.achievements.into_iter().collect(),
        }
    }

    /// Lifetime counters accumulated so far.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Achievements unlocked so far, in stable order.
    #[must_use]
    pub fn unlocked(&self) -> Vec<Achievement> {
        self.unlocked.iter().copied().collect()
    }

    /// Produces the flat record an adapter persists.
    #[must_use]
    pub fn record(&self) -> SaveRecord {
        SaveRecord {
            statistics: self.statistics.clone(),
            achievements: self.unlocked(),
        }
    }

    /// Folds world events into the counters and reports new unlocks.
    pub fn handle(&mut self, events: &[Event], newly_unlocked: &mut Vec<Achievement>) {
        for event in events {
            match event {
                Event::EnemyKilled { kind, reward, .. } => {
                    self.statistics.total_kills += 1;
                    if kind.is_boss() {
                        self.statistics.boss_kills += 1;
                    }
                    self.statistics.money_earned += u64::from(*reward);
                }
                Event::EnemyDamaged { amount, .. } => {
                    self.statistics.damage_dealt += f64::from(*amount);
                }
                Event::EnemyEscaped { .. } => {
                    self.statistics.lives_lost += 1;
                }
                Event::TowerPlaced { kind, .. } => {
                    self.statistics.towers_built += 1;
                    self.statistics.money_spent += u64::from(kind.spec().cost);
                }
                Event::TowerUpgraded { cost, .. } => {
                    self.statistics.upgrades += 1;
                    self.statistics.money_spent += u64::from(*cost);
                }
                Event::TowerSold { refund, .. } => {
                    self.statistics.towers_sold += 1;
                    self.statistics.money_earned += u64::from(*refund);
                }
                Event::AbilityActivated { ability } => {
                    self.statistics.abilities_used += 1;
                    self.statistics.money_spent += u64::from(ability.cost());
                }
                Event::WaveCompleted { wave, perfect } => {
                    self.statistics.waves_completed += 1;
                    if *perfect {
                        self.statistics.perfect_waves += 1;
                    }
                    self.statistics.highest_wave = self.statistics.highest_wave.max(wave.get());
                }
                Event::GameOver { score, .. } => {
                    self.statistics.games_played += 1;
                    self.statistics.highest_score = self.statistics.highest_score.max(*score);
                }
                _ => {}
            }
        }

        for achievement in Achievement::ALL {
            if self.unlocked.contains(&achievement) {
                continue;
            }
            if achievement.is_satisfied_by(&self.statistics) {
                let _ = self.unlocked.insert(achievement);
                newly_unlocked.push(achievement);
            }
        }
    }
}
