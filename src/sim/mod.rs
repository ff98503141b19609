//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (list order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod engine;
pub mod events;
pub mod form;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Axis, AxisResolution, Contact, resolve_axis};
pub use engine::Engine;
pub use events::{SoundEvent, SoundQueue};
pub use form::Form;
pub use level::{LevelId, LevelLayout, generate_level};
pub use rect::{Body, Rect};
pub use state::{
    Enemy, EnemyKind, Facing, GameState, GameStatus, LoopConfig, Owner, Particle, Patrol,
    Platform, PlatformKind, Player, Projectile, ProjectileKind,
};
pub use tick::{
    apply_loop_wrap, damage_enemy, damage_player, effective_gravity, melee_hitbox, tick,
    transform_player,
};
