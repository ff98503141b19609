//! Game state and core simulation types
//!
//! `GameState` is the single root aggregate. Only the simulation mutates it;
//! everything else reads it through a shared reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::form::Form;
use super::level::{LevelId, generate_level};
use super::rect::{Body, Rect};
use crate::tuning::{self, INTRO_MESSAGE, INTRO_MESSAGE_TICKS, MESSAGE_TICKS};

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, simulation idle
    Menu,
    /// Active gameplay
    Playing,
    /// Player died or fell out of the world
    GameOver,
    /// Spirit of Gravity defeated
    Victory,
    /// Game is paused
    Paused,
}

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub form: Form,
    pub facing: Facing,
    pub grounded: bool,
    pub hp: i32,
    pub max_hp: i32,
    /// Carried for the HUD; no rule consumes it
    pub spirit: i32,
    pub attack_cooldown: u32,
    pub invincibility_timer: u32,
    pub attacking: bool,
    pub attack_frame: u32,
    /// Walk animation phase, advanced while moving on the ground
    pub walk_frame: f32,
    pub color: u32,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        let form = Form::default();
        let t = form.tuning();
        Self {
            body: Body::new(spawn.x, spawn.y, t.width, t.height),
            form,
            facing: Facing::Right,
            grounded: false,
            hp: tuning::PLAYER_MAX_HP,
            max_hp: tuning::PLAYER_MAX_HP,
            spirit: tuning::PLAYER_SPIRIT,
            attack_cooldown: 0,
            invincibility_timer: 0,
            attacking: false,
            attack_frame: 0,
            walk_frame: 0.0,
            color: t.color,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }
}

/// Walker patrol bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub center: f32,
    pub range: f32,
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Paces back and forth around a patrol center
    Walker { patrol: Option<Patrol> },
    /// Spirit of Gravity: cycles global gravity through four phases
    BossGravity { phase: u8, timer: u32 },
    /// One-hit enemy holding the recurrence loop together
    LoopAnchor,
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    pub hp: i32,
    pub max_hp: i32,
    pub color: u32,
}

impl Enemy {
    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::BossGravity { .. })
    }

    pub fn is_loop_anchor(&self) -> bool {
        matches!(self.kind, EnemyKind::LoopAnchor)
    }

    /// Current boss phase, if this is the boss
    pub fn boss_phase(&self) -> Option<u8> {
        match self.kind {
            EnemyKind::BossGravity { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Blocks movement
    Solid,
    /// Hurts the player on contact, does not block
    Danger,
    /// Player contact loads the target level
    Door { target: LevelId },
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
    pub color: u32,
}

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Thrown by the Child, wobbles vertically
    Star,
    /// Fired by the boss, homes in during phase 3
    GravityOrb,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub owner: Owner,
    pub body: Body,
    /// Ticks left before removal
    pub ttl: u32,
    pub color: u32,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub life: u32,
    pub color: u32,
}

/// Eternal recurrence: crossing `end_x` teleports back toward `start_x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub start_x: f32,
    pub end_x: f32,
    pub active: bool,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub level: LevelId,
    pub level_width: f32,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    /// Camera offset (y is never tracked)
    pub camera: Vec2,
    pub status: GameStatus,
    /// Global gravity scalar driven by the boss phase
    pub boss_gravity_modifier: f32,
    pub message: String,
    pub message_timer: u32,
    pub loop_config: Option<LoopConfig>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds, advanced by the fixed step (drives sine motion)
    pub clock: f32,
    /// Seeded RNG for particles and orb spreads
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh state for a level, in the Menu status
    pub fn new(level: LevelId, seed: u64) -> Self {
        let mut state = Self {
            level,
            level_width: 0.0,
            player: Player::new(Vec2::ZERO),
            platforms: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            camera: Vec2::ZERO,
            status: GameStatus::Menu,
            boss_gravity_modifier: 0.0,
            message: String::new(),
            message_timer: 0,
            loop_config: None,
            time_ticks: 0,
            clock: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.load_level(level);
        state
    }

    /// Replace everything level-related with the level's initial layout.
    ///
    /// Keeps the RNG stream and the status; callers decide the status.
    pub fn load_level(&mut self, level: LevelId) {
        let layout = generate_level(level);
        log::info!(
            "Loading level '{}' ({} platforms, {} enemies)",
            level.name(),
            layout.platforms.len(),
            layout.enemies.len()
        );

        self.next_id = layout.enemies.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.level = level;
        self.level_width = layout.level_width;
        self.player = Player::new(layout.player_start);
        self.platforms = layout.platforms;
        self.enemies = layout.enemies;
        self.projectiles.clear();
        self.particles.clear();
        self.camera = Vec2::ZERO;
        self.boss_gravity_modifier = 0.0;
        self.message = INTRO_MESSAGE.to_string();
        self.message_timer = INTRO_MESSAGE_TICKS;
        self.loop_config = layout.loop_config;
        self.time_ticks = 0;
        self.clock = 0.0;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Show a transient message for the standard duration
    pub fn show_message(&mut self, msg: &str) {
        self.message = msg.to_string();
        self.message_timer = MESSAGE_TICKS;
    }

    /// The boss, if the level has one and it is still listed
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    pub fn loop_active(&self) -> bool {
        self.loop_config.is_some_and(|lc| lc.active)
    }

    /// Serialize for an external renderer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu() {
        let state = GameState::new(LevelId::TightropeWalker, 1);
        assert_eq!(state.status, GameStatus::Menu);
        assert_eq!(state.player.form, Form::Camel);
        assert_eq!(state.player.hp, 100);
        assert_eq!(state.message, INTRO_MESSAGE);
        assert_eq!(state.message_timer, INTRO_MESSAGE_TICKS);
    }

    #[test]
    fn test_entity_ids_continue_after_layout() {
        let mut state = GameState::new(LevelId::VisionAndEnigma, 1);
        let max_layout_id = state.enemies.iter().map(|e| e.id).max().unwrap();
        let id = state.next_entity_id();
        assert!(id > max_layout_id);
        assert_eq!(state.next_entity_id(), id + 1);
    }

    #[test]
    fn test_load_level_keeps_status() {
        let mut state = GameState::new(LevelId::TightropeWalker, 1);
        state.status = GameStatus::Playing;
        state.player.hp = 3;
        state.load_level(LevelId::ThreeMetamorphoses);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.level, LevelId::ThreeMetamorphoses);
        assert_eq!(state.player.hp, state.player.max_hp);
    }

    #[test]
    fn test_boss_lookup() {
        let state = GameState::new(LevelId::VisionAndEnigma, 1);
        let boss = state.boss().expect("final level has a boss");
        assert_eq!(boss.hp, tuning::BOSS_HP);
        assert_eq!(boss.boss_phase(), Some(0));
        assert!(GameState::new(LevelId::TightropeWalker, 1).boss().is_none());
    }

    #[test]
    fn test_snapshot_json() {
        let state = GameState::new(LevelId::TightropeWalker, 1);
        let json = state.to_json().unwrap();
        assert!(json.contains("\"status\":\"Menu\""));
        assert!(!json.contains("rng"));
    }
}
