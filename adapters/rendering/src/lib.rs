#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rampart adapters.
//!
//! The simulation core exposes read-only snapshots; this crate reshapes them
//! into a declarative [`Scene`] that any backend can draw. No drawing happens
//! here, and nothing in this crate can mutate the world.

use anyhow::Result as AnyResult;
use glam::Vec2;
use rampart_core::{
    BeamSnapshot, CellCoord, EnemyKind, EnemyView, PlayerSnapshot, ProjectileSnapshot,
    StatusKind, TowerId, TowerKind, TowerView,
};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Reference fill color for an enemy kind.
#[must_use]
pub const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Basic => Color::from_rgb_u8(0xff, 0x00, 0x00),
        EnemyKind::Fast => Color::from_rgb_u8(0xff, 0xff, 0x00),
        EnemyKind::Tank => Color::from_rgb_u8(0x8b, 0x00, 0x00),
        EnemyKind::Swarm => Color::from_rgb_u8(0xff, 0x00, 0xff),
        EnemyKind::Regen => Color::from_rgb_u8(0x2e, 0x8b, 0x57),
        EnemyKind::Shield => Color::from_rgb_u8(0x46, 0x82, 0xb4),
        EnemyKind::Healer => Color::from_rgb_u8(0xdd, 0xa0, 0xdd),
        EnemyKind::Ghost => Color::from_rgb_u8(0xc0, 0xc0, 0xc0),
        EnemyKind::Boss => Color::from_rgb_u8(0x00, 0x00, 0x00),
    }
}

/// Reference fill color for a tower kind.
#[must_use]
pub const fn tower_color(kind: TowerKind) -> Color {
    match kind {
        TowerKind::Basic => Color::from_rgb_u8(0x00, 0x00, 0xff),
        TowerKind::Sniper => Color::from_rgb_u8(0x00, 0x80, 0x00),
        TowerKind::Rapid => Color::from_rgb_u8(0xff, 0xa5, 0x00),
        TowerKind::Splash => Color::from_rgb_u8(0x80, 0x00, 0x80),
        TowerKind::Laser => Color::from_rgb_u8(0x00, 0xff, 0xff),
        TowerKind::Frost => Color::from_rgb_u8(0x87, 0xce, 0xfa),
        TowerKind::Venom => Color::from_rgb_u8(0x6b, 0x8e, 0x23),
        TowerKind::Flame => Color::from_rgb_u8(0xff, 0x45, 0x00),
        TowerKind::Arc => Color::from_rgb_u8(0x4b, 0x00, 0x82),
        TowerKind::Artillery => Color::from_rgb_u8(0x8b, 0x45, 0x13),
        TowerKind::Support => Color::from_rgb_u8(0xff, 0xd7, 0x00),
    }
}

/// Describes the static grid: dimensions, path cells, entrance, and exit.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Ordered path cells from entrance to exit.
    pub path: Vec<CellCoord>,
    /// Cell where enemies enter.
    pub entrance: CellCoord,
    /// Cell enemies try to reach.
    pub exit: CellCoord,
}

impl GridPresentation {
    /// Creates a grid descriptor from the world's waypoint query.
    ///
    /// Returns `None` when the waypoint list is empty, which a validated
    /// world never produces.
    #[must_use]
    pub fn from_waypoints(columns: u32, rows: u32, waypoints: &[CellCoord]) -> Option<Self> {
        let entrance = *waypoints.first()?;
        let exit = *waypoints.last()?;
        Some(Self {
            columns,
            rows,
            path: waypoints.to_vec(),
            entrance,
            exit,
        })
    }
}

/// Enemy marker positioned in continuous cell units.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyMarker {
    /// Position of the enemy's center.
    pub position: Vec2,
    /// Fill color derived from the enemy kind.
    pub color: Color,
    /// Body radius in cell units.
    pub radius: f32,
    /// Remaining health as a fraction of maximum.
    pub health_fraction: f32,
    /// Remaining shield as a fraction of the kind's capacity; zero when none.
    pub shield_fraction: f32,
    /// Status badges to draw above the marker.
    pub statuses: Vec<StatusKind>,
}

/// Tower marker anchored to its grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerMarker {
    /// Identifier of the tower, for selection feedback.
    pub id: TowerId,
    /// Kind of the tower, which determines its color and glyph.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Upgrade level badge to draw, starting at 1.
    pub level: u8,
    /// Targeting radius for range overlays.
    pub range: f32,
}

/// Line segment for an in-flight projectile's position and heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotMarker {
    /// Current projectile position.
    pub position: Vec2,
    /// Captured impact point the shot is flying toward.
    pub heading: Vec2,
}

/// Line segment for an active laser beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamMarker {
    /// Beam origin at the tower center.
    pub from: Vec2,
    /// Beam end at the held enemy.
    pub to: Vec2,
}

/// Player-facing heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Lives remaining.
    pub health: u32,
    /// Money available.
    pub money: u32,
    /// Score accumulated.
    pub score: u32,
    /// Most recently started wave.
    pub wave: u32,
    /// Indicates a wave is in progress.
    pub wave_active: bool,
    /// Indicates the simulation is paused.
    pub paused: bool,
}

/// Scene description combining the grid and every live entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Static grid backdrop.
    pub grid: GridPresentation,
    /// Enemy markers in spawn order.
    pub enemies: Vec<EnemyMarker>,
    /// Tower markers in identifier order.
    pub towers: Vec<TowerMarker>,
    /// In-flight projectiles.
    pub shots: Vec<ShotMarker>,
    /// Active laser beams.
    pub beams: Vec<BeamMarker>,
    /// Heads-up display values.
    pub hud: HudPresentation,
}

impl Scene {
    /// Assembles a scene from the world's read-only snapshots.
    #[must_use]
    pub fn compose(
        grid: GridPresentation,
        enemies: &EnemyView,
        towers: &TowerView,
        projectiles: &[ProjectileSnapshot],
        beams: &[BeamSnapshot],
        player: PlayerSnapshot,
    ) -> Self {
        let enemy_markers = enemies
            .iter()
            .map(|snapshot| {
                let spec = snapshot.kind.spec();
                let shield_fraction = if spec.shield > 0.0 {
                    (snapshot.shield / spec.shield).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                EnemyMarker {
                    position: Vec2::new(snapshot.position.x(), snapshot.position.y()),
                    color: enemy_color(snapshot.kind),
                    radius: spec.size,
                    health_fraction: (snapshot.health / snapshot.max_health).clamp(0.0, 1.0),
                    shield_fraction,
                    statuses: snapshot.statuses.iter().map(|status| status.kind).collect(),
                }
            })
            .collect();

        let tower_markers = towers
            .iter()
            .map(|snapshot| TowerMarker {
                id: snapshot.id,
                kind: snapshot.kind,
                cell: snapshot.cell,
                level: snapshot.level,
                range: snapshot.range,
            })
            .collect();

        let shots = projectiles
            .iter()
            .map(|snapshot| ShotMarker {
                position: Vec2::new(snapshot.position.x(), snapshot.position.y()),
                heading: Vec2::new(snapshot.impact_point.x(), snapshot.impact_point.y()),
            })
            .collect();

        let beam_markers = beams
            .iter()
            .map(|snapshot| BeamMarker {
                from: Vec2::new(snapshot.from.x(), snapshot.from.y()),
                to: Vec2::new(snapshot.to.x(), snapshot.to.y()),
            })
            .collect();

        Self {
            grid,
            enemies: enemy_markers,
            towers: tower_markers,
            shots,
            beams: beam_markers,
            hud: HudPresentation {
                health: player.health,
                money: player.money,
                score: player.score,
                wave: player.wave,
                wave_active: player.wave_active,
                paused: player.paused,
            },
        }
    }
}

/// Rendering backend capable of presenting Rampart scenes.
pub trait RenderingBackend {
    /// Runs the backend until it is requested to exit.
    ///
    /// The `update_scene` closure receives the simulated frame delta and may
    /// replace the scene before it is rendered, letting adapters animate
    /// world snapshots deterministically.
    fn run<F>(self, initial: Scene, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}
