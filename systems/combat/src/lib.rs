#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns target assignments into firing commands.

use rampart_core::{Command, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `FireTower` for ready projectile towers and `AimBeam` for lasers.
    ///
    /// Beam towers receive an aim command every frame regardless of cooldown;
    /// beams carry no reload cycle. Assignments naming towers absent from the
    /// view are skipped.
    pub fn handle(&mut self, towers: &TowerView, targets: &[TowerTarget], out: &mut Vec<Command>) {
        if targets.is_empty() {
            return;
        }

        self.scratch.clear();
        for target in targets {
            let Some(snapshot) = towers.find(target.tower) else {
                continue;
            };

            if snapshot.kind.is_beam() {
                self.scratch.push(Command::AimBeam {
                    tower: target.tower,
                    target: Some(target.enemy),
                });
            } else if snapshot.kind.fires_projectiles() && snapshot.ready {
                self.scratch.push(Command::FireTower {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        CellCoord, CellPoint, EnemyId, TargetingMode, TowerId, TowerKind, TowerSnapshot,
    };

    fn snapshot(id: u32, kind: TowerKind, ready: bool) -> TowerSnapshot {
        let spec = kind.spec();
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell: CellCoord::new(0, 0),
            center: CellPoint::new(0.5, 0.5),
            level: 1,
            mode: TargetingMode::default(),
            damage: spec.damage,
            range: spec.range,
            fire_rate: spec.fire_rate,
            ready,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
        }
    }

    #[test]
    fn ready_towers_fire_and_cooling_towers_wait() {
        let towers = TowerView::from_snapshots(vec![
            snapshot(0, TowerKind::Basic, true),
            snapshot(1, TowerKind::Rapid, false),
        ]);
        let mut system = Combat::new();
        let mut out = Vec::new();
        system.handle(&towers, &[target(0, 4), target(1, 4)], &mut out);

        assert_eq!(
            out,
            vec![Command::FireTower {
                tower: TowerId::new(0),
                target: EnemyId::new(4),
            }]
        );
    }

    #[test]
    fn beam_towers_aim_every_frame() {
        let towers = TowerView::from_snapshots(vec![snapshot(0, TowerKind::Laser, false)]);
        let mut system = Combat::new();
        let mut out = Vec::new();
        system.handle(&towers, &[target(0, 2)], &mut out);

        assert_eq!(
            out,
            vec![Command::AimBeam {
                tower: TowerId::new(0),
                target: Some(EnemyId::new(2)),
            }]
        );
    }

    #[test]
    fn assignments_for_unknown_towers_are_skipped() {
        let towers = TowerView::from_snapshots(vec![snapshot(0, TowerKind::Basic, true)]);
        let mut system = Combat::new();
        let mut out = Vec::new();
        system.handle(&towers, &[target(9, 2)], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_assignments_emit_nothing() {
        let towers = TowerView::from_snapshots(vec![snapshot(0, TowerKind::Basic, true)]);
        let mut system = Combat::new();
        let mut out = Vec::new();
        system.handle(&towers, &[], &mut out);
        assert!(out.is_empty());
    }
}
