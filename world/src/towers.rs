//! Authoritative tower state and identifier allocation.

use std::collections::BTreeMap;

use rampart_core::{
    CellCoord, CellPoint, TargetingMode, TowerId, TowerKind, MAX_TOWER_LEVEL,
    UPGRADE_COST_FACTOR, UPGRADE_DAMAGE_FACTOR, UPGRADE_FIRE_RATE_FACTOR, UPGRADE_RANGE_FACTOR,
};

/// Authoritative state of a single placed tower.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
    pub(crate) center: CellPoint,
    pub(crate) level: u8,
    pub(crate) total_cost: u32,
    pub(crate) damage: u32,
    pub(crate) range: f32,
    pub(crate) fire_rate: f32,
    pub(crate) cooldown: f32,
    pub(crate) mode: TargetingMode,
}

impl Tower {
    fn place(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        let spec = kind.spec();
        Self {
            id,
            kind,
            cell,
            center: cell.center(),
            level: 1,
            total_cost: spec.cost,
            damage: spec.damage,
            range: spec.range,
            fire_rate: spec.fire_rate,
            cooldown: 0.0,
            mode: TargetingMode::default(),
        }
    }

    /// Cost of the next upgrade, or `None` at the maximum level.
    pub(crate) fn upgrade_cost(&self) -> Option<u32> {
        if self.level >= MAX_TOWER_LEVEL {
            return None;
        }
        let cost =
            self.kind.spec().cost as f32 * UPGRADE_COST_FACTOR.powi(i32::from(self.level));
        Some(cost as u32)
    }

    /// Applies one upgrade level, compounding the stat multipliers.
    pub(crate) fn upgrade(&mut self, cost: u32) {
        self.level += 1;
        self.total_cost += cost;
        self.damage = (self.damage as f32 * UPGRADE_DAMAGE_FACTOR) as u32;
        self.range *= UPGRADE_RANGE_FACTOR;
        self.fire_rate *= UPGRADE_FIRE_RATE_FACTOR;
    }

    /// Refund granted when the tower is sold.
    pub(crate) fn sell_value(&self) -> u32 {
        rampart_core::sell_refund(self.total_cost)
    }

    /// Reports whether the tower's cooldown elapsed.
    pub(crate) fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Restarts the reload cycle after a shot.
    pub(crate) fn reset_cooldown(&mut self) {
        if self.fire_rate > 0.0 {
            self.cooldown = 1.0 / self.fire_rate;
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: 0,
        }
    }

    /// Places a new tower and returns its allocated identifier.
    pub(crate) fn place(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id += 1;
        let _ = self.entries.insert(id, Tower::place(id, kind, cell));
        id
    }

    /// Looks up a tower by identifier.
    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    /// Looks up a tower mutably by identifier.
    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Removes a tower, returning its final state.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    /// Iterates towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Iterates towers mutably in ascending identifier order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Reports whether any tower occupies the provided cell.
    pub(crate) fn occupied(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|tower| tower.cell == cell)
    }

    /// Combined support-aura damage multiplier covering the provided point.
    pub(crate) fn support_multiplier(&self, center: CellPoint, exclude: TowerId) -> f32 {
        let mut multiplier = 1.0;
        for tower in self.entries.values() {
            if tower.id == exclude {
                continue;
            }
            if let rampart_core::TowerBehavior::Support { radius, bonus } =
                tower.kind.spec().behavior
            {
                if tower.center.distance_squared(center) <= radius * radius {
                    multiplier *= 1.0 + bonus;
                }
            }
        }
        multiplier
    }
}
