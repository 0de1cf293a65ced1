#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use rampart_core::{EnemyId, EnemyView, TargetingMode, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes target assignments for every attacking tower.
    ///
    /// The output buffer is cleared before being populated. Support towers
    /// never receive an assignment; beam towers receive one every frame so
    /// the combat system can keep their aim current.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();
        if enemies.is_empty() {
            return;
        }

        self.candidates.clear();
        self.candidates.reserve(enemies.len());
        for snapshot in enemies.iter() {
            self.candidates.push(Candidate {
                id: snapshot.id,
                x: snapshot.position.x(),
                y: snapshot.position.y(),
                travelled: snapshot.travelled,
                health: snapshot.health,
            });
        }

        for tower in towers.iter() {
            if tower.kind.is_support() {
                continue;
            }

            let range_squared = tower.range * tower.range;
            let mut best: Option<&Candidate> = None;

            for candidate in &self.candidates {
                let dx = candidate.x - tower.center.x();
                let dy = candidate.y - tower.center.y();
                let distance_squared = dx * dx + dy * dy;
                if distance_squared > range_squared {
                    continue;
                }

                best = Some(match best {
                    None => candidate,
                    Some(current) => {
                        if candidate.precedes(current, tower.mode, distance_squared, {
                            let dx = current.x - tower.center.x();
                            let dy = current.y - tower.center.y();
                            dx * dx + dy * dy
                        }) {
                            candidate
                        } else {
                            current
                        }
                    }
                });
            }

            if let Some(candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: EnemyId,
    x: f32,
    y: f32,
    travelled: f32,
    health: f32,
}

impl Candidate {
    /// Deterministic ordering for the tower's targeting policy.
    ///
    /// Every mode breaks ties by the lower enemy identifier, which is spawn
    /// order, so replays cannot diverge on equal keys.
    fn precedes(
        &self,
        other: &Candidate,
        mode: TargetingMode,
        distance_squared: f32,
        other_distance_squared: f32,
    ) -> bool {
        let key = match mode {
            TargetingMode::Furthest => compare_f32(self.travelled, other.travelled).reverse(),
            TargetingMode::First => std::cmp::Ordering::Equal,
            TargetingMode::Last => self.id.cmp(&other.id).reverse(),
            TargetingMode::Closest => compare_f32(distance_squared, other_distance_squared),
            TargetingMode::Strongest => compare_f32(self.health, other.health).reverse(),
            TargetingMode::Weakest => compare_f32(self.health, other.health),
        };

        match key {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.id < other.id,
        }
    }
}

fn compare_f32(a: f32, b: f32) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        CellCoord, CellPoint, EnemyKind, EnemySnapshot, TargetingMode, TowerId, TowerKind,
        TowerSnapshot, TowerView,
    };

    fn enemy(id: u32, x: f32, travelled: f32, health: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            position: CellPoint::new(x, 1.5),
            travelled,
            progress: 0.0,
            health,
            max_health: 100.0,
            shield: 0.0,
            statuses: Vec::new(),
        }
    }

    fn tower(id: u32, kind: TowerKind, mode: TargetingMode) -> TowerSnapshot {
        let spec = kind.spec();
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell: CellCoord::new(0, 1),
            center: CellPoint::new(0.5, 1.5),
            level: 1,
            mode,
            damage: spec.damage,
            range: spec.range,
            fire_rate: spec.fire_rate,
            ready: true,
        }
    }

    fn assign(towers: Vec<TowerSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<TowerTarget> {
        let mut system = Targeting::new();
        let mut out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            &mut out,
        );
        out
    }

    #[test]
    fn furthest_mode_prefers_greatest_progress() {
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Furthest)],
            vec![enemy(0, 1.5, 1.0, 50.0), enemy(1, 2.5, 2.0, 50.0)],
        );
        assert_eq!(out, vec![TowerTarget {
            tower: TowerId::new(0),
            enemy: EnemyId::new(1),
        }]);
    }

    #[test]
    fn furthest_ties_break_by_spawn_order() {
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Furthest)],
            vec![enemy(7, 1.5, 2.0, 50.0), enemy(3, 2.5, 2.0, 50.0)],
        );
        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn out_of_range_enemies_are_ignored() {
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Furthest)],
            vec![enemy(0, 9.0, 8.5, 50.0)],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn range_boundary_is_inclusive() {
        // Basic range 3.0 from x 0.5: an enemy at x 3.5 sits exactly on it.
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Furthest)],
            vec![enemy(0, 3.5, 3.0, 50.0)],
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn first_mode_selects_earliest_spawn() {
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::First)],
            vec![enemy(2, 1.0, 0.5, 50.0), enemy(5, 2.0, 1.5, 50.0)],
        );
        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn last_mode_selects_latest_spawn() {
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Last)],
            vec![enemy(2, 1.0, 0.5, 50.0), enemy(5, 2.0, 1.5, 50.0)],
        );
        assert_eq!(out[0].enemy, EnemyId::new(5));
    }

    #[test]
    fn closest_mode_selects_minimum_distance() {
        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Closest)],
            vec![enemy(0, 3.0, 2.5, 50.0), enemy(1, 1.0, 0.5, 50.0)],
        );
        assert_eq!(out[0].enemy, EnemyId::new(1));
    }

    #[test]
    fn strongest_and_weakest_modes_compare_health() {
        let enemies = vec![enemy(0, 1.0, 0.5, 80.0), enemy(1, 2.0, 1.5, 20.0)];
        let strongest = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Strongest)],
            enemies.clone(),
        );
        assert_eq!(strongest[0].enemy, EnemyId::new(0));

        let weakest = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Weakest)],
            enemies,
        );
        assert_eq!(weakest[0].enemy, EnemyId::new(1));
    }

    #[test]
    fn support_towers_never_target() {
        let out = assign(
            vec![tower(0, TowerKind::Support, TargetingMode::Furthest)],
            vec![enemy(0, 1.0, 0.5, 50.0)],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn beam_towers_receive_assignments() {
        let out = assign(
            vec![tower(0, TowerKind::Laser, TargetingMode::Furthest)],
            vec![enemy(0, 1.0, 0.5, 50.0)],
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn empty_views_produce_no_assignments() {
        let out = assign(vec![], vec![enemy(0, 1.0, 0.5, 50.0)]);
        assert!(out.is_empty());

        let out = assign(
            vec![tower(0, TowerKind::Basic, TargetingMode::Furthest)],
            vec![],
        );
        assert!(out.is_empty());
    }
}
