#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that gates special-ability activation behind cooldowns.
//!
//! The world validates funds and targets and applies the effects; this
//! system is the cooldown authority. It forwards player requests only while
//! the ability is off cooldown, and it arms the cooldown when the world
//! confirms an activation, so a rejected request (say, for lack of money)
//! leaves the ability ready to try again.

use rampart_core::{AbilityKind, CellPoint, Command, Event};

/// Player-facing readiness snapshot for a single ability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilityStatus {
    /// Ability the status describes.
    pub ability: AbilityKind,
    /// Indicates the ability may be requested right now.
    pub ready: bool,
    /// Recharge progress in `0.0..=1.0`, where `1.0` means ready.
    pub charge: f32,
}

/// Activation request captured from player input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilityRequest {
    /// Ability the player wants to trigger.
    pub ability: AbilityKind,
    /// Point targeted by the ability, when it requires one.
    pub target: Option<CellPoint>,
}

impl AbilityRequest {
    /// Creates a new activation request.
    #[must_use]
    pub const fn new(ability: AbilityKind, target: Option<CellPoint>) -> Self {
        Self { ability, target }
    }
}

/// Ability system tracking per-ability cooldown timers.
#[derive(Debug, Default)]
pub struct Abilities {
    cooldowns: [f32; AbilityKind::ALL.len()],
}

impl Abilities {
    /// Creates a new ability system with every ability ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and player requests, emitting activation commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        requests: &[AbilityRequest],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    let elapsed = dt.as_secs_f32();
                    for remaining in &mut self.cooldowns {
                        *remaining = (*remaining - elapsed).max(0.0);
                    }
                }
                Event::AbilityActivated { ability } => {
                    self.cooldowns[slot(*ability)] = ability.cooldown();
                }
                _ => {}
            }
        }

        for request in requests {
            if self.is_ready(request.ability) {
                out.push(Command::ActivateAbility {
                    ability: request.ability,
                    target: request.target,
                });
            }
        }
    }

    /// Reports whether the ability is off cooldown.
    #[must_use]
    pub fn is_ready(&self, ability: AbilityKind) -> bool {
        self.cooldowns[slot(ability)] <= 0.0
    }

    /// Captures the readiness of every ability for presentation.
    #[must_use]
    pub fn status(&self) -> Vec<AbilityStatus> {
        AbilityKind::ALL
            .iter()
            .map(|&ability| {
                let remaining = self.cooldowns[slot(ability)];
                let cooldown = ability.cooldown();
                let charge = if cooldown > 0.0 {
                    (1.0 - remaining / cooldown).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                AbilityStatus {
                    ability,
                    ready: remaining <= 0.0,
                    charge,
                }
            })
            .collect()
    }
}

fn slot(ability: AbilityKind) -> usize {
    AbilityKind::ALL
        .iter()
        .position(|&kind| kind == ability)
        .expect("every ability kind appears in ALL")
}
