//! Closed type tables parameterizing tower, enemy, and ability behavior.
//!
//! Every dynamic lookup of the original data tables is replaced with a closed
//! enum carrying a fixed attribute record, so unknown keys cannot exist past
//! load time and behavior dispatch stays a small match over capability data.

use serde::{Deserialize, Serialize};

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced single-target tower.
    Basic,
    /// Long-range, high-damage, slow-firing tower.
    Sniper,
    /// Short-range tower trading damage for fire rate.
    Rapid,
    /// Tower whose shells damage every enemy near the impact point.
    Splash,
    /// Tower applying continuous beam damage with no reload cycle.
    Laser,
    /// Tower whose shots slow the struck enemy.
    Frost,
    /// Tower whose shots poison the struck enemy.
    Venom,
    /// Tower whose shots ignite the struck enemy.
    Flame,
    /// Tower whose shots arc between several enemies with falloff.
    Arc,
    /// Slow siege tower with a wide splash radius.
    Artillery,
    /// Non-attacking tower that amplifies the damage of its neighbors.
    Support,
}

impl TowerKind {
    /// Every constructible tower kind in presentation order.
    pub const ALL: [TowerKind; 11] = [
        TowerKind::Basic,
        TowerKind::Sniper,
        TowerKind::Rapid,
        TowerKind::Splash,
        TowerKind::Laser,
        TowerKind::Frost,
        TowerKind::Venom,
        TowerKind::Flame,
        TowerKind::Arc,
        TowerKind::Artillery,
        TowerKind::Support,
    ];

    /// Fixed attribute record for the tower kind.
    #[must_use]
    pub const fn spec(self) -> TowerSpec {
        match self {
            Self::Basic => TowerSpec {
                cost: 100,
                damage: 10,
                range: 3.0,
                fire_rate: 1.0,
                projectile_speed: 12.0,
                behavior: TowerBehavior::Projectile,
            },
            Self::Sniper => TowerSpec {
                cost: 200,
                damage: 50,
                range: 6.25,
                fire_rate: 0.5,
                projectile_speed: 22.5,
                behavior: TowerBehavior::Projectile,
            },
            Self::Rapid => TowerSpec {
                cost: 150,
                damage: 5,
                range: 2.5,
                fire_rate: 3.0,
                projectile_speed: 15.0,
                behavior: TowerBehavior::Projectile,
            },
            Self::Splash => TowerSpec {
                cost: 250,
                damage: 15,
                range: 2.75,
                fire_rate: 0.8,
                projectile_speed: 9.0,
                behavior: TowerBehavior::Splash { radius: 1.5 },
            },
            Self::Laser => TowerSpec {
                cost: 300,
                damage: 8,
                range: 3.75,
                fire_rate: 0.0,
                projectile_speed: 0.0,
                behavior: TowerBehavior::Beam,
            },
            Self::Frost => TowerSpec {
                cost: 180,
                damage: 6,
                range: 2.75,
                fire_rate: 0.9,
                projectile_speed: 12.0,
                behavior: TowerBehavior::Status {
                    effect: StatusSpec::new(StatusKind::Slow, 0.5, 2.0),
                },
            },
            Self::Venom => TowerSpec {
                cost: 220,
                damage: 8,
                range: 3.0,
                fire_rate: 0.8,
                projectile_speed: 12.0,
                behavior: TowerBehavior::Status {
                    effect: StatusSpec::new(StatusKind::Poison, 6.0, 3.0),
                },
            },
            Self::Flame => TowerSpec {
                cost: 240,
                damage: 12,
                range: 2.25,
                fire_rate: 1.2,
                projectile_speed: 12.0,
                behavior: TowerBehavior::Status {
                    effect: StatusSpec::new(StatusKind::Burn, 10.0, 1.5),
                },
            },
            Self::Arc => TowerSpec {
                cost: 280,
                damage: 18,
                range: 3.25,
                fire_rate: 0.7,
                projectile_speed: 22.5,
                behavior: TowerBehavior::Chain {
                    targets: 3,
                    falloff: 0.3,
                    link_range: 3.75,
                },
            },
            Self::Artillery => TowerSpec {
                cost: 350,
                damage: 40,
                range: 4.5,
                fire_rate: 0.4,
                projectile_speed: 9.0,
                behavior: TowerBehavior::Splash { radius: 2.25 },
            },
            Self::Support => TowerSpec {
                cost: 200,
                damage: 0,
                range: 0.0,
                fire_rate: 0.0,
                projectile_speed: 0.0,
                behavior: TowerBehavior::Support {
                    radius: 2.5,
                    bonus: 0.25,
                },
            },
        }
    }

    /// Reports whether the kind attacks via projectiles on a cooldown cycle.
    #[must_use]
    pub const fn fires_projectiles(self) -> bool {
        !matches!(
            self.spec().behavior,
            TowerBehavior::Beam | TowerBehavior::Support { .. }
        )
    }

    /// Reports whether the kind applies continuous beam damage.
    #[must_use]
    pub const fn is_beam(self) -> bool {
        matches!(self.spec().behavior, TowerBehavior::Beam)
    }

    /// Reports whether the kind buffs neighbors instead of attacking.
    #[must_use]
    pub const fn is_support(self) -> bool {
        matches!(self.spec().behavior, TowerBehavior::Support { .. })
    }
}

/// Flat attribute record describing a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSpec {
    /// Construction cost in money.
    pub cost: u32,
    /// Base damage per shot, or per second for beams.
    pub damage: u32,
    /// Base targeting range in cell units; zero for support towers.
    pub range: f32,
    /// Base fire rate in shots per second; zero for beams and support.
    pub fire_rate: f32,
    /// Projectile travel speed in cells per second; zero when unused.
    pub projectile_speed: f32,
    /// Capability record dispatched by the combat resolution code.
    pub behavior: TowerBehavior,
}

/// Capability record describing how a tower's attacks resolve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TowerBehavior {
    /// Plain single-target projectile.
    Projectile,
    /// Projectile that damages every enemy within a radius of its impact.
    Splash {
        /// Splash radius around the impact point in cell units.
        radius: f32,
    },
    /// Continuous beam applying damage scaled by elapsed time each tick.
    Beam,
    /// Projectile that also applies a status effect to each struck enemy.
    Status {
        /// Status payload carried by each shot.
        effect: StatusSpec,
    },
    /// Projectile that jumps between enemies with diminishing damage.
    Chain {
        /// Total number of enemies a single shot may strike.
        targets: u32,
        /// Fractional damage reduction applied at each hop.
        falloff: f32,
        /// Maximum hop distance from the previous link in cell units.
        link_range: f32,
    },
    /// Aura that amplifies the damage of other towers in radius.
    Support {
        /// Buff radius measured from the support tower's center.
        radius: f32,
        /// Fractional damage bonus granted to covered towers.
        bonus: f32,
    },
}

/// Kinds of timed modifiers that can be applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    /// Multiplies effective speed by `1 - magnitude` for the duration.
    Slow,
    /// Removes `magnitude` health per second for the duration.
    Poison,
    /// Removes `magnitude` health per second for the duration.
    Burn,
    /// Forces effective speed to zero for the duration.
    Freeze,
}

/// Parameterized status effect carried by projectiles and abilities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusSpec {
    /// Kind of effect to apply.
    pub kind: StatusKind,
    /// Magnitude of the effect; interpretation depends on the kind.
    pub magnitude: f32,
    /// Duration of the effect in seconds.
    pub duration: f32,
}

impl StatusSpec {
    /// Creates a new status payload.
    #[must_use]
    pub const fn new(kind: StatusKind, magnitude: f32, duration: f32) -> Self {
        Self {
            kind,
            magnitude,
            duration,
        }
    }
}

/// Types of enemies that can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy with no abilities.
    Basic,
    /// Fragile enemy that moves quickly.
    Fast,
    /// Durable enemy with damage-reducing armor.
    Tank,
    /// Cheap enemy that arrives in numbers.
    Swarm,
    /// Enemy that regenerates health over time.
    Regen,
    /// Enemy protected by a self-recharging shield.
    Shield,
    /// Enemy that heals nearby enemies every tick.
    Healer,
    /// Enemy immune to slow and freeze effects.
    Ghost,
    /// Armored wave finisher with a large bounty.
    Boss,
}

impl EnemyKind {
    /// Fixed attribute record for the enemy kind.
    #[must_use]
    pub const fn spec(self) -> EnemySpec {
        match self {
            Self::Basic => EnemySpec {
                health: 50,
                speed: 2.0,
                reward: 10,
                size: 0.2,
                armor: 0.0,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
            Self::Fast => EnemySpec {
                health: 30,
                speed: 4.0,
                reward: 15,
                size: 0.18,
                armor: 0.0,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
            Self::Tank => EnemySpec {
                health: 200,
                speed: 1.0,
                reward: 30,
                size: 0.3,
                armor: 0.3,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
            Self::Swarm => EnemySpec {
                health: 20,
                speed: 3.0,
                reward: 5,
                size: 0.15,
                armor: 0.0,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
            Self::Regen => EnemySpec {
                health: 60,
                speed: 2.0,
                reward: 20,
                size: 0.22,
                armor: 0.0,
                regen: 5.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
            Self::Shield => EnemySpec {
                health: 80,
                speed: 1.8,
                reward: 25,
                size: 0.24,
                armor: 0.0,
                regen: 0.0,
                shield: 40.0,
                shield_regen: 10.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
            Self::Healer => EnemySpec {
                health: 70,
                speed: 1.5,
                reward: 35,
                size: 0.24,
                armor: 0.0,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 8.0,
                heal_radius: 2.5,
                slow_immune: false,
            },
            Self::Ghost => EnemySpec {
                health: 40,
                speed: 2.5,
                reward: 20,
                size: 0.2,
                armor: 0.0,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: true,
            },
            Self::Boss => EnemySpec {
                health: 500,
                speed: 0.8,
                reward: 100,
                size: 0.4,
                armor: 0.2,
                regen: 0.0,
                shield: 0.0,
                shield_regen: 0.0,
                heal_rate: 0.0,
                heal_radius: 0.0,
                slow_immune: false,
            },
        }
    }

    /// Reports whether kills of this kind count as boss kills.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }
}

/// Flat attribute record describing an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpec {
    /// Base health before wave scaling.
    pub health: u32,
    /// Movement speed in cells per second.
    pub speed: f32,
    /// Base bounty before wave scaling.
    pub reward: u32,
    /// Body radius in cell units, used by presentation layers.
    pub size: f32,
    /// Fraction of incoming impact damage negated before application.
    pub armor: f32,
    /// Health regenerated per second, capped at max health.
    pub regen: f32,
    /// Shield capacity absorbing impact damage before health.
    pub shield: f32,
    /// Shield capacity recharged per second up to the cap.
    pub shield_regen: f32,
    /// Health granted per second to other enemies inside the heal aura.
    pub heal_rate: f32,
    /// Radius of the heal aura in cell units; zero disables it.
    pub heal_radius: f32,
    /// Indicates the enemy ignores slow and freeze effects entirely.
    pub slow_immune: bool,
}

/// Special abilities the player can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Immediate area damage at a targeted point.
    Airstrike,
    /// Freezes every live enemy for a fixed duration.
    FreezeAll,
    /// Doubles enemy bounties for a fixed duration.
    CashBoost,
    /// Amplifies all tower damage for a fixed duration.
    DamageBoost,
    /// Restores a fixed amount of player health up to the starting cap.
    HealthRestore,
}

impl AbilityKind {
    /// Every ability kind in presentation order.
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::Airstrike,
        AbilityKind::FreezeAll,
        AbilityKind::CashBoost,
        AbilityKind::DamageBoost,
        AbilityKind::HealthRestore,
    ];

    /// Activation cost in money.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Airstrike => 150,
            Self::FreezeAll => 200,
            Self::CashBoost => 100,
            Self::DamageBoost => 120,
            Self::HealthRestore => 250,
        }
    }

    /// Seconds that must elapse between successive activations.
    #[must_use]
    pub const fn cooldown(self) -> f32 {
        match self {
            Self::Airstrike => 30.0,
            Self::FreezeAll => 45.0,
            Self::CashBoost => 60.0,
            Self::DamageBoost => 45.0,
            Self::HealthRestore => 90.0,
        }
    }

    /// Concrete effect applied when the ability activates.
    #[must_use]
    pub const fn effect(self) -> AbilityEffect {
        match self {
            Self::Airstrike => AbilityEffect::Strike {
                damage: 75.0,
                radius: 2.5,
            },
            Self::FreezeAll => AbilityEffect::FreezeAll { duration: 3.0 },
            Self::CashBoost => AbilityEffect::RewardBoost {
                multiplier: 2.0,
                duration: 10.0,
            },
            Self::DamageBoost => AbilityEffect::DamageBoost {
                multiplier: 1.5,
                duration: 8.0,
            },
            Self::HealthRestore => AbilityEffect::RestoreHealth { amount: 5 },
        }
    }

    /// Reports whether activation requires a target point.
    #[must_use]
    pub const fn requires_target(self) -> bool {
        matches!(self, Self::Airstrike)
    }
}

/// Concrete effect descriptor produced by [`AbilityKind::effect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbilityEffect {
    /// Immediate damage to every live enemy within a radius of a point.
    Strike {
        /// Impact damage before armor and shields.
        damage: f32,
        /// Effect radius in cell units.
        radius: f32,
    },
    /// Freeze applied to every live enemy.
    FreezeAll {
        /// Freeze duration in seconds.
        duration: f32,
    },
    /// Temporary multiplier applied to enemy bounties.
    RewardBoost {
        /// Bounty multiplier while active.
        multiplier: f32,
        /// Active duration in seconds.
        duration: f32,
    },
    /// Temporary multiplier applied to all tower damage.
    DamageBoost {
        /// Damage multiplier while active.
        multiplier: f32,
        /// Active duration in seconds.
        duration: f32,
    },
    /// Immediate restoration of player health.
    RestoreHealth {
        /// Lives restored, clamped to the starting health cap.
        amount: u32,
    },
}

/// Difficulty tag declared by a map layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Short paths and forgiving pacing.
    Easy,
    /// The reference experience.
    Normal,
    /// Long sight lines and punishing pacing.
    Hard,
}

/// Composition of a single wave as an ordered list of kind/count entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveComposition {
    /// Enemy batches that compose the wave.
    pub entries: Vec<WaveEntry>,
}

impl WaveComposition {
    /// Creates a composition from the provided entries.
    #[must_use]
    pub fn new(entries: Vec<WaveEntry>) -> Self {
        Self { entries }
    }

    /// Total number of enemies the composition will spawn.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

/// Single batch of identical enemies within a wave composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveEntry {
    /// Kind of enemy to spawn.
    pub kind: EnemyKind,
    /// Number of enemies of this kind.
    pub count: u32,
}

impl WaveEntry {
    /// Creates a new wave entry.
    #[must_use]
    pub const fn new(kind: EnemyKind, count: u32) -> Self {
        Self { kind, count }
    }
}

#[cfg(test)]
mod tests {
    use super::{AbilityKind, EnemyKind, StatusKind, TowerBehavior, TowerKind, WaveComposition, WaveEntry};

    #[test]
    fn attack_towers_carry_positive_damage_and_range() {
        for kind in TowerKind::ALL {
            let spec = kind.spec();
            if kind.is_support() {
                assert_eq!(spec.damage, 0);
            } else {
                assert!(spec.damage > 0, "{kind:?} must deal damage");
                assert!(spec.range > 0.0, "{kind:?} must have range");
            }
            assert!(spec.cost > 0, "{kind:?} must cost money");
        }
    }

    #[test]
    fn projectile_towers_declare_travel_speed() {
        for kind in TowerKind::ALL {
            if kind.fires_projectiles() {
                assert!(
                    kind.spec().projectile_speed > 0.0,
                    "{kind:?} fires projectiles and needs a travel speed"
                );
                assert!(
                    kind.spec().fire_rate > 0.0,
                    "{kind:?} fires projectiles and needs a fire rate"
                );
            }
        }
    }

    #[test]
    fn beam_and_support_towers_skip_the_cooldown_cycle() {
        assert!(TowerKind::Laser.is_beam());
        assert!(!TowerKind::Laser.fires_projectiles());
        assert!(TowerKind::Support.is_support());
        assert!(!TowerKind::Support.fires_projectiles());
    }

    #[test]
    fn frost_payload_is_a_slow() {
        match TowerKind::Frost.spec().behavior {
            TowerBehavior::Status { effect } => {
                assert_eq!(effect.kind, StatusKind::Slow);
                assert_eq!(effect.magnitude, 0.5);
            }
            other => panic!("unexpected frost behavior: {other:?}"),
        }
    }

    #[test]
    fn enemy_specs_are_positive_and_ghosts_resist_slows() {
        for kind in [
            EnemyKind::Basic,
            EnemyKind::Fast,
            EnemyKind::Tank,
            EnemyKind::Swarm,
            EnemyKind::Regen,
            EnemyKind::Shield,
            EnemyKind::Healer,
            EnemyKind::Ghost,
            EnemyKind::Boss,
        ] {
            let spec = kind.spec();
            assert!(spec.health > 0);
            assert!(spec.speed > 0.0);
            assert!(spec.reward > 0);
            assert!(spec.armor < 1.0);
        }
        assert!(EnemyKind::Ghost.spec().slow_immune);
        assert!(!EnemyKind::Basic.spec().slow_immune);
    }

    #[test]
    fn ability_cooldowns_cover_their_durations() {
        for kind in AbilityKind::ALL {
            let cooldown = kind.cooldown();
            let duration = match kind.effect() {
                super::AbilityEffect::RewardBoost { duration, .. }
                | super::AbilityEffect::DamageBoost { duration, .. }
                | super::AbilityEffect::FreezeAll { duration } => duration,
                _ => 0.0,
            };
            assert!(
                cooldown >= duration,
                "{kind:?} could overlap its own activation"
            );
        }
    }

    #[test]
    fn wave_composition_totals_sum_counts() {
        let wave = WaveComposition::new(vec![
            WaveEntry::new(EnemyKind::Basic, 10),
            WaveEntry::new(EnemyKind::Fast, 5),
        ]);
        assert_eq!(wave.total(), 15);
    }
}
