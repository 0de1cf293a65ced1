//! Enemy state, status effects, and passive ability bookkeeping.

use rampart_core::{EnemyId, EnemyKind, StatusKind, StatusSnapshot, StatusSpec};

/// Per-wave multiplier applied to enemy health.
const WAVE_HEALTH_SCALING: f32 = 0.15;

/// Per-wave multiplier applied to enemy bounties.
const WAVE_REWARD_SCALING: f32 = 0.10;

/// Live status effect applied to an enemy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StatusInstance {
    pub(crate) kind: StatusKind,
    pub(crate) magnitude: f32,
    pub(crate) remaining: f32,
}

/// Authoritative state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) max_health: f32,
    pub(crate) health: f32,
    pub(crate) shield: f32,
    pub(crate) travelled: f32,
    pub(crate) statuses: Vec<StatusInstance>,
    pub(crate) reward: u32,
    pub(crate) escaped: bool,
}

impl Enemy {
    /// Creates an enemy at the path start, scaled for the provided wave.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, wave: u32) -> Self {
        let spec = kind.spec();
        let wave_factor = wave.saturating_sub(1) as f32;
        let max_health = (spec.health as f32 * (1.0 + wave_factor * WAVE_HEALTH_SCALING)).floor();
        let reward = (spec.reward as f32 * (1.0 + wave_factor * WAVE_REWARD_SCALING)) as u32;

        Self {
            id,
            kind,
            max_health,
            health: max_health,
            shield: spec.shield,
            travelled: 0.0,
            statuses: Vec::new(),
            reward,
            escaped: false,
        }
    }

    /// Reports whether the enemy's health is exhausted.
    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Reports whether the enemy still participates in the simulation.
    pub(crate) fn is_live(&self) -> bool {
        !self.is_dead() && !self.escaped
    }

    /// Movement speed after slow and freeze effects, in cells per second.
    pub(crate) fn effective_speed(&self) -> f32 {
        let base = self.kind.spec().speed;
        let mut factor = 1.0;
        for status in &self.statuses {
            match status.kind {
                StatusKind::Freeze => return 0.0,
                StatusKind::Slow => factor *= 1.0 - status.magnitude,
                StatusKind::Poison | StatusKind::Burn => {}
            }
        }
        base * factor
    }

    /// Applies a status payload, honoring slow immunity.
    ///
    /// Re-applying a kind refreshes its duration and keeps the stronger
    /// magnitude; distinct kinds stack independently.
    pub(crate) fn apply_status(&mut self, spec: StatusSpec) {
        if self.kind.spec().slow_immune
            && matches!(spec.kind, StatusKind::Slow | StatusKind::Freeze)
        {
            return;
        }

        if let Some(existing) = self
            .statuses
            .iter_mut()
            .find(|status| status.kind == spec.kind)
        {
            existing.remaining = spec.duration;
            existing.magnitude = existing.magnitude.max(spec.magnitude);
        } else {
            self.statuses.push(StatusInstance {
                kind: spec.kind,
                magnitude: spec.magnitude,
                remaining: spec.duration,
            });
        }
    }

    /// Applies impact damage through armor and shield, returning health lost.
    pub(crate) fn take_hit(&mut self, damage: f32) -> f32 {
        let spec = self.kind.spec();
        let mut remaining = damage.max(0.0) * (1.0 - spec.armor);

        if self.shield > 0.0 {
            let absorbed = self.shield.min(remaining);
            self.shield -= absorbed;
            remaining -= absorbed;
        }

        let dealt = remaining.min(self.health.max(0.0));
        self.health -= remaining;
        dealt
    }

    /// Applies damage-over-time channels for the covered tick interval.
    ///
    /// Poison and burn subtract directly from health, bypassing armor and
    /// shields; the last partial interval is clamped so a 3 s poison removes
    /// exactly three seconds' worth of damage.
    pub(crate) fn apply_damage_over_time(&mut self, dt: f32) -> f32 {
        let mut total = 0.0;
        for status in &self.statuses {
            if matches!(status.kind, StatusKind::Poison | StatusKind::Burn) {
                total += status.magnitude * dt.min(status.remaining);
            }
        }
        if total > 0.0 {
            let dealt = total.min(self.health.max(0.0));
            self.health -= total;
            return dealt;
        }
        0.0
    }

    /// Counts down status durations and drops expired effects.
    ///
    /// Runs at the end of the tick so an effect still covers the interval in
    /// which its remaining duration reaches zero.
    pub(crate) fn expire_statuses(&mut self, dt: f32) {
        for status in &mut self.statuses {
            status.remaining -= dt;
        }
        self.statuses.retain(|status| status.remaining > 0.0);
    }

    /// Regenerates health and shield for the covered tick interval.
    pub(crate) fn apply_recovery(&mut self, dt: f32) {
        let spec = self.kind.spec();
        if spec.regen > 0.0 {
            self.health = (self.health + spec.regen * dt).min(self.max_health);
        }
        if spec.shield_regen > 0.0 && spec.shield > 0.0 {
            self.shield = (self.shield + spec.shield_regen * dt).min(spec.shield);
        }
    }

    /// Receives healing from another enemy's aura.
    pub(crate) fn receive_heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Captures the status list for snapshot construction.
    pub(crate) fn status_snapshots(&self) -> Vec<StatusSnapshot> {
        self.statuses
            .iter()
            .map(|status| StatusSnapshot {
                kind: status.kind,
                magnitude: status.magnitude,
                remaining: status.remaining,
            })
            .collect()
    }
}
