//! In-flight projectile state and straight-line advancement.

use rampart_core::{CellPoint, EnemyId, ImpactPolicy, ProjectileId, StatusSpec, TowerId};

/// Chain-lightning parameters captured from the firing tower.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChainSpec {
    pub(crate) targets: u32,
    pub(crate) falloff: f32,
    pub(crate) link_range: f32,
}

/// A projectile flying toward its captured impact point.
///
/// The impact point is the target's position at spawn (or re-aim) time;
/// flight is a straight line and is never corrected toward a moving target.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) position: CellPoint,
    pub(crate) impact_point: CellPoint,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) payload: Option<StatusSpec>,
    pub(crate) splash_radius: Option<f32>,
    pub(crate) chain: Option<ChainSpec>,
    pub(crate) policy: ImpactPolicy,
}

impl Projectile {
    /// Moves the projectile toward its impact point.
    ///
    /// Returns `true` when the step covered the remaining distance.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        let remaining = self.position.distance(self.impact_point);
        let step = self.speed * dt;
        if step >= remaining {
            self.position = self.impact_point;
            return true;
        }

        let t = step / remaining;
        self.position = self.position.lerp(self.impact_point, t);
        false
    }

    /// Re-aims the projectile at a new target position mid-flight.
    pub(crate) fn redirect(&mut self, target: EnemyId, impact_point: CellPoint) {
        self.target = target;
        self.impact_point = impact_point;
    }
}
