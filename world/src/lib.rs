#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rampart.
//!
//! The world owns every mutable piece of the simulation: the validated map,
//! live enemies, placed towers, in-flight projectiles, beam assignments,
//! ability timers, and the player's resources. Adapters and systems never
//! mutate state directly; they submit [`Command`] values through [`apply`]
//! and observe the resulting [`Event`] stream plus the read-only accessors in
//! [`query`].

use std::collections::BTreeMap;

use rampart_core::{
    AbilityEffect, AbilityError, AbilityKind, CellCoord, CellPoint, Command, EnemyId, EnemyKind,
    Event, GameConfig, ImpactPolicy, PlacementError, ProjectileId, SellError, StatusKind,
    StatusSpec, TowerBehavior, TowerId, TowerKind, UpgradeError, WaveError, WaveId,
    WELCOME_BANNER,
};

mod enemies;
mod map;
mod projectiles;
mod towers;

pub use map::{MapError, MapLayout};

use enemies::Enemy;
use map::MapModel;
use projectiles::{ChainSpec, Projectile};
use towers::TowerRegistry;

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    map: MapModel,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
    beams: BTreeMap<TowerId, EnemyId>,
    health: u32,
    money: u32,
    score: u32,
    wave_index: u32,
    wave_active: bool,
    lives_lost_this_wave: u32,
    reward_boost_remaining: f32,
    damage_boost_remaining: f32,
    paused: bool,
    game_over: bool,
    tick_index: u64,
}

impl World {
    /// Creates a world from a validated map layout and tuning configuration.
    ///
    /// Rejects layouts whose path list does not form a connected corridor so
    /// enemies can always reach the exit.
    pub fn new(layout: &MapLayout, config: GameConfig) -> Result<Self, MapError> {
        let map = MapModel::from_layout(layout)?;
        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            map,
            enemies: Vec::new(),
            next_enemy_id: 0,
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            next_projectile_id: 0,
            beams: BTreeMap::new(),
            health: config.starting_health,
            money: config.starting_money,
            score: 0,
            wave_index: 0,
            wave_active: false,
            lives_lost_this_wave: 0,
            reward_boost_remaining: 0.0,
            damage_boost_remaining: 0.0,
            paused: false,
            game_over: false,
            tick_index: 0,
        })
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&enemy, |entry| entry.id)
            .ok()
    }

    fn live_enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemy_index(enemy)
            .filter(|&index| self.enemies[index].is_live())
    }

    fn reward_multiplier(&self) -> f32 {
        if self.reward_boost_remaining > 0.0 {
            if let AbilityEffect::RewardBoost { multiplier, .. } = AbilityKind::CashBoost.effect() {
                return multiplier;
            }
        }
        1.0
    }

    fn damage_multiplier(&self, center: CellPoint, tower: TowerId) -> f32 {
        let mut multiplier = self.towers.support_multiplier(center, tower);
        if self.damage_boost_remaining > 0.0 {
            if let AbilityEffect::DamageBoost { multiplier: boost, .. } =
                AbilityKind::DamageBoost.effect()
            {
                multiplier *= boost;
            }
        }
        multiplier
    }

    /// Fixed tick pipeline: ability timers, status effects, passives,
    /// movement, cooldowns, projectile and beam resolution, cleanup. The
    /// ordering is a tested contract; targeting depends on positions having
    /// already advanced when the systems observe the post-tick snapshot.
    fn run_tick(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.tick_ability_boosts(dt);
        self.tick_status_effects(dt, out_events);
        self.tick_passives(dt);
        self.tick_movement(dt);
        self.tick_cooldowns(dt);
        self.tick_projectiles(dt, out_events);
        self.tick_beams(dt, out_events);
        self.cleanup(dt, out_events);
    }

    fn tick_ability_boosts(&mut self, dt: f32) {
        self.reward_boost_remaining = (self.reward_boost_remaining - dt).max(0.0);
        self.damage_boost_remaining = (self.damage_boost_remaining - dt).max(0.0);
    }

    fn tick_status_effects(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            if !enemy.is_live() {
                continue;
            }
            let dealt = enemy.apply_damage_over_time(dt);
            if dealt > 0.0 {
                out_events.push(Event::EnemyDamaged {
                    enemy: enemy.id,
                    amount: dealt,
                });
            }
        }
    }

    fn tick_passives(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            if enemy.is_live() {
                enemy.apply_recovery(dt);
            }
        }

        // Heal auras read positions captured before anyone moves this tick.
        let positions: Vec<Option<CellPoint>> = self
            .enemies
            .iter()
            .map(|enemy| {
                enemy
                    .is_live()
                    .then(|| self.map.position_at(enemy.travelled))
            })
            .collect();

        for healer_index in 0..self.enemies.len() {
            let spec = self.enemies[healer_index].kind.spec();
            if spec.heal_radius <= 0.0 || !self.enemies[healer_index].is_live() {
                continue;
            }
            let Some(center) = positions[healer_index] else {
                continue;
            };
            let radius_squared = spec.heal_radius * spec.heal_radius;
            let amount = spec.heal_rate * dt;

            for other_index in 0..self.enemies.len() {
                if other_index == healer_index {
                    continue;
                }
                let Some(position) = positions[other_index] else {
                    continue;
                };
                if center.distance_squared(position) <= radius_squared {
                    self.enemies[other_index].receive_heal(amount);
                }
            }
        }
    }

    fn tick_movement(&mut self, dt: f32) {
        let total_length = self.map.total_length();
        for enemy in &mut self.enemies {
            if !enemy.is_live() {
                continue;
            }
            enemy.travelled += enemy.effective_speed() * dt;
            if enemy.travelled >= total_length {
                enemy.travelled = total_length;
                enemy.escaped = true;
            }
        }
    }

    fn tick_cooldowns(&mut self, dt: f32) {
        for tower in self.towers.iter_mut() {
            tower.cooldown = (tower.cooldown - dt).max(0.0);
        }
    }

    fn tick_projectiles(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let in_flight = std::mem::take(&mut self.projectiles);
        for mut projectile in in_flight {
            if projectile.policy == ImpactPolicy::Retarget
                && self.live_enemy_index(projectile.target).is_none()
            {
                if let Some(index) = nearest_live_enemy(&self.enemies, &self.map, projectile.position)
                {
                    let target = self.enemies[index].id;
                    let impact = self.map.position_at(self.enemies[index].travelled);
                    projectile.redirect(target, impact);
                }
            }

            if projectile.advance(dt) {
                self.resolve_arrival(&projectile, out_events);
            } else {
                self.projectiles.push(projectile);
            }
        }
    }

    fn resolve_arrival(&mut self, projectile: &Projectile, out_events: &mut Vec<Event>) {
        let mut hit_any = false;

        if let Some(radius) = projectile.splash_radius {
            let radius_squared = radius * radius;
            for index in 0..self.enemies.len() {
                if !self.enemies[index].is_live() {
                    continue;
                }
                let position = self.map.position_at(self.enemies[index].travelled);
                if position.distance_squared(projectile.impact_point) <= radius_squared {
                    strike_enemy(
                        &mut self.enemies[index],
                        projectile.damage,
                        projectile.payload,
                        out_events,
                    );
                    hit_any = true;
                }
            }
        } else if let Some(chain) = projectile.chain {
            hit_any = self.resolve_chain(projectile, chain, out_events);
        } else if let Some(index) = self.live_enemy_index(projectile.target) {
            strike_enemy(
                &mut self.enemies[index],
                projectile.damage,
                projectile.payload,
                out_events,
            );
            hit_any = true;
        }

        if !hit_any {
            out_events.push(Event::ProjectileExpired {
                projectile: projectile.id,
            });
        }
    }

    fn resolve_chain(
        &mut self,
        projectile: &Projectile,
        chain: ChainSpec,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(primary) = self.live_enemy_index(projectile.target) else {
            return false;
        };

        let mut struck = vec![projectile.target];
        let mut link_position = self.map.position_at(self.enemies[primary].travelled);
        let mut damage = projectile.damage;
        strike_enemy(
            &mut self.enemies[primary],
            damage,
            projectile.payload,
            out_events,
        );

        let link_range_squared = chain.link_range * chain.link_range;
        for _ in 1..chain.targets {
            let mut best: Option<(usize, f32)> = None;
            for index in 0..self.enemies.len() {
                let enemy = &self.enemies[index];
                if !enemy.is_live() || struck.contains(&enemy.id) {
                    continue;
                }
                let position = self.map.position_at(enemy.travelled);
                let distance_squared = link_position.distance_squared(position);
                if distance_squared > link_range_squared {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((_, best_distance)) => distance_squared < best_distance,
                };
                if better {
                    best = Some((index, distance_squared));
                }
            }

            let Some((index, _)) = best else {
                break;
            };
            damage *= 1.0 - chain.falloff;
            struck.push(self.enemies[index].id);
            link_position = self.map.position_at(self.enemies[index].travelled);
            strike_enemy(
                &mut self.enemies[index],
                damage,
                projectile.payload,
                out_events,
            );
        }

        true
    }

    fn tick_beams(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let assignments: Vec<(TowerId, EnemyId)> = self
            .beams
            .iter()
            .map(|(tower, enemy)| (*tower, *enemy))
            .collect();
        let mut stale = Vec::new();

        for (tower_id, enemy_id) in assignments {
            let Some(tower) = self.towers.get(tower_id) else {
                stale.push(tower_id);
                continue;
            };
            let center = tower.center;
            let range_squared = tower.range * tower.range;
            let damage_per_second = tower.damage as f32;

            let Some(index) = self.live_enemy_index(enemy_id) else {
                stale.push(tower_id);
                continue;
            };
            let position = self.map.position_at(self.enemies[index].travelled);
            if center.distance_squared(position) > range_squared {
                stale.push(tower_id);
                continue;
            }

            let multiplier = self.damage_multiplier(center, tower_id);
            strike_enemy(
                &mut self.enemies[index],
                damage_per_second * multiplier * dt,
                None,
                out_events,
            );
        }

        for tower in stale {
            let _ = self.beams.remove(&tower);
        }
    }

    fn cleanup(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let reward_multiplier = self.reward_multiplier();
        let mut resolved = Vec::new();

        for enemy in &self.enemies {
            if enemy.is_dead() {
                let reward = (enemy.reward as f32 * reward_multiplier) as u32;
                self.money += reward;
                self.score += enemy.reward;
                resolved.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    kind: enemy.kind,
                    reward,
                });
            } else if enemy.escaped {
                self.health = self.health.saturating_sub(1);
                self.lives_lost_this_wave += 1;
                resolved.push(Event::EnemyEscaped {
                    enemy: enemy.id,
                    kind: enemy.kind,
                    remaining_health: self.health,
                });
            }
        }

        self.enemies.retain(|enemy| enemy.is_live());
        for enemy in &mut self.enemies {
            enemy.expire_statuses(dt);
        }
        out_events.append(&mut resolved);

        if self.health == 0 && !self.game_over {
            self.game_over = true;
            out_events.push(Event::GameOver {
                victory: false,
                score: self.score,
            });
        }
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over {
            out_events.push(Event::WaveRejected {
                reason: WaveError::GameOver,
            });
            return;
        }
        if self.wave_active {
            out_events.push(Event::WaveRejected {
                reason: WaveError::WaveInProgress,
            });
            return;
        }

        self.wave_index += 1;
        self.wave_active = true;
        self.lives_lost_this_wave = 0;
        out_events.push(Event::WaveStarted {
            wave: WaveId::new(self.wave_index),
        });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id += 1;
        let wave = self.wave_index.max(1);
        self.enemies.push(Enemy::spawn(id, kind, wave));
        out_events.push(Event::EnemySpawned { enemy: id, kind });
    }

    fn complete_wave(&mut self, last: bool, out_events: &mut Vec<Event>) {
        if !self.wave_active {
            return;
        }
        self.wave_active = false;
        out_events.push(Event::WaveCompleted {
            wave: WaveId::new(self.wave_index),
            perfect: self.lives_lost_this_wave == 0,
        });

        if last && self.health > 0 && !self.game_over {
            self.game_over = true;
            out_events.push(Event::GameOver {
                victory: true,
                score: self.score,
            });
        }
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        let reason = if !self.map.in_bounds(cell) {
            Some(PlacementError::OutOfBounds)
        } else if self.map.is_path(cell) {
            Some(PlacementError::OnPath)
        } else if self.towers.occupied(cell) {
            Some(PlacementError::Occupied)
        } else if self.money < kind.spec().cost {
            Some(PlacementError::InsufficientFunds)
        } else {
            None
        };

        if let Some(reason) = reason {
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        self.money -= kind.spec().cost;
        let tower = self.towers.place(kind, cell);
        out_events.push(Event::TowerPlaced { tower, kind, cell });
    }

    fn upgrade_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(entry) = self.towers.get(tower) else {
            out_events.push(Event::TowerUpgradeRejected {
                tower,
                reason: UpgradeError::MissingTower,
            });
            return;
        };
        let Some(cost) = entry.upgrade_cost() else {
            out_events.push(Event::TowerUpgradeRejected {
                tower,
                reason: UpgradeError::MaxLevel,
            });
            return;
        };
        if self.money < cost {
            out_events.push(Event::TowerUpgradeRejected {
                tower,
                reason: UpgradeError::InsufficientFunds,
            });
            return;
        }

        self.money -= cost;
        let entry = self
            .towers
            .get_mut(tower)
            .expect("tower existed moments ago");
        entry.upgrade(cost);
        let level = entry.level;
        out_events.push(Event::TowerUpgraded { tower, level, cost });
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(entry) = self.towers.remove(tower) else {
            out_events.push(Event::TowerSaleRejected {
                tower,
                reason: SellError::MissingTower,
            });
            return;
        };

        let refund = entry.sell_value();
        self.money += refund;
        let _ = self.beams.remove(&tower);
        out_events.push(Event::TowerSold { tower, refund });
    }

    fn fire_tower(&mut self, tower_id: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get(tower_id) else {
            return;
        };
        if !tower.kind.fires_projectiles() || !tower.ready() {
            return;
        }
        let center = tower.center;
        let damage = tower.damage;
        let spec = tower.kind.spec();

        let Some(index) = self.live_enemy_index(target) else {
            return;
        };
        let impact_point = self.map.position_at(self.enemies[index].travelled);
        let multiplier = self.damage_multiplier(center, tower_id);

        let (payload, splash_radius, chain) = match spec.behavior {
            TowerBehavior::Status { effect } => (Some(effect), None, None),
            TowerBehavior::Splash { radius } => (None, Some(radius), None),
            TowerBehavior::Chain {
                targets,
                falloff,
                link_range,
            } => (
                None,
                None,
                Some(ChainSpec {
                    targets,
                    falloff,
                    link_range,
                }),
            ),
            TowerBehavior::Projectile | TowerBehavior::Beam | TowerBehavior::Support { .. } => {
                (None, None, None)
            }
        };

        let entry = self
            .towers
            .get_mut(tower_id)
            .expect("tower existed moments ago");
        entry.reset_cooldown();

        let projectile = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile {
            id: projectile,
            tower: tower_id,
            target,
            position: center,
            impact_point,
            speed: spec.projectile_speed,
            damage: damage as f32 * multiplier,
            payload,
            splash_radius,
            chain,
            policy: self.config.impact_policy,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            tower: tower_id,
            target,
        });
    }

    fn aim_beam(&mut self, tower: TowerId, target: Option<EnemyId>) {
        let Some(entry) = self.towers.get(tower) else {
            return;
        };
        if !entry.kind.is_beam() {
            return;
        }

        match target {
            Some(enemy) if self.live_enemy_index(enemy).is_some() => {
                let _ = self.beams.insert(tower, enemy);
            }
            _ => {
                let _ = self.beams.remove(&tower);
            }
        }
    }

    fn activate_ability(
        &mut self,
        ability: AbilityKind,
        target: Option<CellPoint>,
        out_events: &mut Vec<Event>,
    ) {
        if ability.requires_target() && target.is_none() {
            out_events.push(Event::AbilityRejected {
                ability,
                reason: AbilityError::MissingTarget,
            });
            return;
        }
        if self.money < ability.cost() {
            out_events.push(Event::AbilityRejected {
                ability,
                reason: AbilityError::InsufficientFunds,
            });
            return;
        }

        self.money -= ability.cost();
        match ability.effect() {
            AbilityEffect::Strike { damage, radius } => {
                let point = target.expect("strike target presence checked above");
                let radius_squared = radius * radius;
                for index in 0..self.enemies.len() {
                    if !self.enemies[index].is_live() {
                        continue;
                    }
                    let position = self.map.position_at(self.enemies[index].travelled);
                    if position.distance_squared(point) <= radius_squared {
                        strike_enemy(&mut self.enemies[index], damage, None, out_events);
                    }
                }
            }
            AbilityEffect::FreezeAll { duration } => {
                let freeze = StatusSpec::new(StatusKind::Freeze, 1.0, duration);
                for enemy in &mut self.enemies {
                    if enemy.is_live() {
                        enemy.apply_status(freeze);
                    }
                }
            }
            AbilityEffect::RewardBoost { duration, .. } => {
                self.reward_boost_remaining = duration;
            }
            AbilityEffect::DamageBoost { duration, .. } => {
                self.damage_boost_remaining = duration;
            }
            AbilityEffect::RestoreHealth { amount } => {
                self.health = (self.health + amount).min(self.config.starting_health);
            }
        }

        out_events.push(Event::AbilityActivated { ability });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.paused || world.game_over {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.run_tick(dt.as_secs_f32(), out_events);
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PausedChanged { paused });
            }
        }
        Command::StartWave => world.start_wave(out_events),
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::CompleteWave { last } => world.complete_wave(last, out_events),
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::UpgradeTower { tower } => world.upgrade_tower(tower, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::SetTargetingMode { tower, mode } => {
            if let Some(entry) = world.towers.get_mut(tower) {
                entry.mode = mode;
                out_events.push(Event::TargetingModeChanged { tower, mode });
            }
        }
        Command::FireTower { tower, target } => world.fire_tower(tower, target, out_events),
        Command::AimBeam { tower, target } => world.aim_beam(tower, target),
        Command::ActivateAbility { ability, target } => {
            world.activate_ability(ability, target, out_events);
        }
    }
}

fn strike_enemy(
    enemy: &mut Enemy,
    damage: f32,
    payload: Option<StatusSpec>,
    out_events: &mut Vec<Event>,
) {
    let dealt = enemy.take_hit(damage);
    out_events.push(Event::EnemyDamaged {
        enemy: enemy.id,
        amount: dealt,
    });
    if let Some(spec) = payload {
        enemy.apply_status(spec);
    }
}

fn nearest_live_enemy(enemies: &[Enemy], map: &MapModel, position: CellPoint) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_live() {
            continue;
        }
        let distance_squared = map.position_at(enemy.travelled).distance_squared(position);
        let better = match best {
            None => true,
            Some((_, best_distance)) => distance_squared < best_distance,
        };
        if better {
            best = Some((index, distance_squared));
        }
    }
    best.map(|(index, _)| index)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use rampart_core::{
        BeamSnapshot, CellCoord, EnemySnapshot, EnemyView, PlayerSnapshot, ProjectileSnapshot,
        TowerId, TowerSnapshot, TowerView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of columns and rows in the map grid.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> (u32, u32) {
        (world.map.columns(), world.map.rows())
    }

    /// Ordered waypoint spine shared by every enemy on the map.
    #[must_use]
    pub fn waypoints(world: &World) -> &[CellCoord] {
        world.map.waypoints()
    }

    /// Total route length in cell units.
    #[must_use]
    pub fn path_length(world: &World) -> f32 {
        world.map.total_length()
    }

    /// Entrance cell where enemies spawn.
    #[must_use]
    pub fn entrance(world: &World) -> CellCoord {
        world.map.entrance()
    }

    /// Exit cell enemies try to reach.
    #[must_use]
    pub fn exit(world: &World) -> CellCoord {
        world.map.exit()
    }

    /// Reports whether a tower could be placed on the cell right now.
    #[must_use]
    pub fn is_buildable(world: &World, cell: CellCoord) -> bool {
        world.map.is_buildable(cell) && !world.towers.occupied(cell)
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let total_length = world.map.total_length().max(f32::EPSILON);
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .filter(|enemy| enemy.is_live())
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: world.map.position_at(enemy.travelled),
                travelled: enemy.travelled,
                progress: (enemy.travelled / total_length).min(1.0),
                health: enemy.health,
                max_health: enemy.max_health,
                shield: enemy.shield,
                statuses: enemy.status_snapshots(),
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                cell: tower.cell,
                center: tower.center,
                level: tower.level,
                mode: tower.mode,
                damage: tower.damage,
                range: tower.range,
                fire_rate: tower.fire_rate,
                ready: tower.ready(),
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Upgrade cost for the provided tower, or `None` when unavailable.
    #[must_use]
    pub fn upgrade_cost(world: &World, tower: TowerId) -> Option<u32> {
        world.towers.get(tower).and_then(|entry| entry.upgrade_cost())
    }

    /// Refund the provided tower would currently sell for.
    #[must_use]
    pub fn sell_value(world: &World, tower: TowerId) -> Option<u32> {
        world.towers.get(tower).map(|entry| entry.sell_value())
    }

    /// Captures the in-flight projectiles for presentation.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                tower: projectile.tower,
                position: projectile.position,
                impact_point: projectile.impact_point,
            })
            .collect()
    }

    /// Captures the active beam assignments for presentation.
    #[must_use]
    pub fn beams(world: &World) -> Vec<BeamSnapshot> {
        world
            .beams
            .iter()
            .filter_map(|(tower, enemy)| {
                let entry = world.towers.get(*tower)?;
                let index = world.enemy_index(*enemy)?;
                let target = &world.enemies[index];
                target.is_live().then(|| BeamSnapshot {
                    tower: *tower,
                    enemy: *enemy,
                    from: entry.center,
                    to: world.map.position_at(target.travelled),
                })
            })
            .collect()
    }

    /// Snapshot of the player's resources and run state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            health: world.health,
            money: world.money,
            score: world.score,
            wave: world.wave_index,
            wave_active: world.wave_active,
            paused: world.paused,
            game_over: world.game_over,
        }
    }
}
