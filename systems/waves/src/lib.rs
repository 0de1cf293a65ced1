#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave manager that schedules staggered enemy spawns.
//!
//! The system owns the wave table and the per-wave state machine
//! (idle, spawning, awaiting clear). It reacts to world events: a
//! `WaveStarted` confirmation builds the spawn schedule, `TimeAdvanced`
//! drives the stagger clock, and kill/escape events track how many of the
//! wave's enemies remain. When every scheduled enemy has resolved it emits
//! `CompleteWave`, letting the world acknowledge and gate the next wave.

use std::collections::VecDeque;
use std::time::Duration;

use rampart_core::{Command, EnemyKind, Event, WaveComposition, WaveEntry};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Configuration parameters required to construct the wave system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    stagger: Duration,
    seed: u64,
}

impl Config {
    /// Creates a new configuration with the provided spawn stagger and seed.
    #[must_use]
    pub const fn new(stagger: Duration, seed: u64) -> Self {
        Self { stagger, seed }
    }

    /// The reference half-second stagger between successive spawns.
    #[must_use]
    pub const fn standard(seed: u64) -> Self {
        Self::new(Duration::from_millis(500), seed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Spawning,
    AwaitingClear,
}

/// Pure system that deterministically emits spawn and completion commands.
#[derive(Debug)]
pub struct Waves {
    schedule: Vec<WaveComposition>,
    stagger: Duration,
    seed: u64,
    phase: Phase,
    clock: Duration,
    pending: VecDeque<(Duration, EnemyKind)>,
    outstanding: u32,
    current: u32,
}

impl Waves {
    /// Creates a wave system over the provided wave table.
    #[must_use]
    pub fn new(schedule: Vec<WaveComposition>, config: Config) -> Self {
        Self {
            schedule,
            stagger: config.stagger,
            seed: config.seed,
            phase: Phase::Idle,
            clock: Duration::ZERO,
            pending: VecDeque::new(),
            outstanding: 0,
            current: 0,
        }
    }

    /// The standard fifteen-wave campaign table.
    #[must_use]
    pub fn standard_schedule() -> Vec<WaveComposition> {
        use EnemyKind::*;

        let wave = |entries: &[(EnemyKind, u32)]| {
            WaveComposition::new(
                entries
                    .iter()
                    .map(|&(kind, count)| WaveEntry::new(kind, count))
                    .collect(),
            )
        };

        vec![
            wave(&[(Basic, 10)]),
            wave(&[(Basic, 15), (Fast, 5)]),
            wave(&[(Basic, 10), (Fast, 10)]),
            wave(&[(Basic, 20), (Tank, 2)]),
            wave(&[(Fast, 15), (Tank, 3)]),
            wave(&[(Basic, 20), (Fast, 10), (Swarm, 10), (Regen, 3)]),
            wave(&[(Tank, 5), (Fast, 20), (Shield, 3)]),
            wave(&[(Basic, 25), (Fast, 15), (Tank, 5), (Healer, 2)]),
            wave(&[(Swarm, 30), (Tank, 8), (Ghost, 5)]),
            wave(&[(Boss, 1), (Basic, 20), (Fast, 20)]),
            wave(&[(Basic, 30), (Fast, 25), (Tank, 10), (Swarm, 20), (Regen, 5)]),
            wave(&[(Basic, 30), (Fast, 30), (Tank, 15), (Shield, 6), (Boss, 1)]),
            wave(&[(Swarm, 40), (Tank, 20), (Fast, 30), (Ghost, 10), (Healer, 4)]),
            wave(&[(Basic, 40), (Fast, 40), (Tank, 20), (Regen, 8), (Boss, 2)]),
            wave(&[(Swarm, 50), (Tank, 30), (Shield, 10), (Healer, 6), (Boss, 1)]),
        ]
    }

    /// Number of waves in the table.
    #[must_use]
    pub fn total_waves(&self) -> u32 {
        self.schedule.len() as u32
    }

    /// Reports whether no wave is currently spawning or awaiting clear.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Consumes world events and emits spawn/completion command batches.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WaveStarted { wave } => self.begin_wave(wave.get()),
                Event::EnemyKilled { .. } | Event::EnemyEscaped { .. } => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                }
                Event::TimeAdvanced { dt } => {
                    if self.phase != Phase::Idle {
                        self.clock = self.clock.saturating_add(*dt);
                    }
                }
                _ => {}
            }
        }

        if self.phase == Phase::Spawning {
            while let Some((offset, kind)) = self.pending.front().copied() {
                if offset > self.clock {
                    break;
                }
                let _ = self.pending.pop_front();
                self.outstanding += 1;
                out.push(Command::SpawnEnemy { kind });
            }
            if self.pending.is_empty() {
                self.phase = Phase::AwaitingClear;
            }
        }

        if self.phase == Phase::AwaitingClear && self.outstanding == 0 {
            self.phase = Phase::Idle;
            out.push(Command::CompleteWave {
                last: self.current >= self.total_waves(),
            });
        }
    }

    fn begin_wave(&mut self, wave: u32) {
        self.current = wave;
        self.phase = Phase::Spawning;
        self.clock = Duration::ZERO;
        self.outstanding = 0;
        self.pending.clear();

        // Indexes past the table reuse the final composition.
        let index = (wave.saturating_sub(1) as usize).min(self.schedule.len().saturating_sub(1));
        let Some(composition) = self.schedule.get(index) else {
            self.phase = Phase::Idle;
            return;
        };

        let mut kinds: Vec<EnemyKind> = Vec::with_capacity(composition.total() as usize);
        for entry in &composition.entries {
            for _ in 0..entry.count {
                kinds.push(entry.kind);
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.seed, wave));
        kinds.shuffle(&mut rng);

        for (index, kind) in kinds.into_iter().enumerate() {
            let offset = self.stagger.saturating_mul(index as u32);
            self.pending.push_back((offset, kind));
        }
    }
}

/// Derives a per-wave stream seed from the global seed and the wave index.
fn derive_wave_seed(seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(b"rampart.wave");
    hasher.update(seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[..8].try_into().expect("digest has at least 8 bytes");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{EnemyId, WaveId};

    fn small_schedule() -> Vec<WaveComposition> {
        vec![
            WaveComposition::new(vec![WaveEntry::new(EnemyKind::Basic, 3)]),
            WaveComposition::new(vec![
                WaveEntry::new(EnemyKind::Basic, 2),
                WaveEntry::new(EnemyKind::Fast, 2),
            ]),
        ]
    }

    fn started(wave: u32) -> Event {
        Event::WaveStarted {
            wave: WaveId::new(wave),
        }
    }

    fn advanced(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    fn killed(id: u32) -> Event {
        Event::EnemyKilled {
            enemy: EnemyId::new(id),
            kind: EnemyKind::Basic,
            reward: 10,
        }
    }

    fn spawn_count(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
            .count()
    }

    #[test]
    fn stagger_spreads_spawns_over_time() {
        let mut waves = Waves::new(
            small_schedule(),
            Config::new(Duration::from_secs(1), 7),
        );
        let mut out = Vec::new();

        // t = 0: only the first enemy spawns.
        waves.handle(&[started(1)], &mut out);
        assert_eq!(spawn_count(&out), 1);

        // t = 1: the second.
        waves.handle(&[advanced(1000)], &mut out);
        assert_eq!(spawn_count(&out), 2);

        // t = 2: the third and last.
        waves.handle(&[advanced(1000)], &mut out);
        assert_eq!(spawn_count(&out), 3);

        waves.handle(&[advanced(1000)], &mut out);
        assert_eq!(spawn_count(&out), 3, "no spawns beyond the composition");
        assert!(!waves.is_idle(), "wave is awaiting clear, not idle");
    }

    #[test]
    fn completion_requires_every_enemy_resolved() {
        let mut waves = Waves::new(
            small_schedule(),
            Config::new(Duration::from_millis(100), 7),
        );
        let mut out = Vec::new();
        waves.handle(&[started(1)], &mut out);
        waves.handle(&[advanced(1000)], &mut out);
        assert_eq!(spawn_count(&out), 3);

        out.clear();
        waves.handle(&[killed(0), killed(1)], &mut out);
        assert!(out.is_empty(), "two of three enemies remain unresolved");

        waves.handle(&[killed(2)], &mut out);
        assert_eq!(out, vec![Command::CompleteWave { last: false }]);
        assert!(waves.is_idle());
    }

    #[test]
    fn final_wave_completion_is_flagged_last() {
        let mut waves = Waves::new(
            vec![WaveComposition::new(vec![WaveEntry::new(
                EnemyKind::Basic,
                1,
            )])],
            Config::new(Duration::from_millis(100), 7),
        );
        let mut out = Vec::new();
        waves.handle(&[started(1)], &mut out);
        assert_eq!(spawn_count(&out), 1);

        out.clear();
        waves.handle(&[killed(0)], &mut out);
        assert_eq!(out, vec![Command::CompleteWave { last: true }]);
    }

    #[test]
    fn spawn_order_is_deterministic_for_a_seed() {
        let order = |seed: u64| {
            let mut waves = Waves::new(small_schedule(), Config::new(Duration::ZERO, seed));
            let mut out = Vec::new();
            waves.handle(&[started(2)], &mut out);
            out
        };

        assert_eq!(order(41), order(41));
    }

    #[test]
    fn zero_stagger_spawns_the_whole_wave_at_once() {
        let mut waves = Waves::new(small_schedule(), Config::new(Duration::ZERO, 7));
        let mut out = Vec::new();
        waves.handle(&[started(2)], &mut out);
        assert_eq!(spawn_count(&out), 4);
    }

    #[test]
    fn waves_past_the_table_reuse_the_final_composition() {
        let mut waves = Waves::new(small_schedule(), Config::new(Duration::ZERO, 7));
        let mut out = Vec::new();
        waves.handle(&[started(9)], &mut out);
        assert_eq!(spawn_count(&out), 4, "wave 9 clamps to the last table row");
    }

    #[test]
    fn standard_schedule_escalates() {
        let schedule = Waves::standard_schedule();
        assert_eq!(schedule.len(), 15);
        assert!(schedule[0].total() < schedule[14].total());
    }
}
