//! Zarathustra's Ascent - A form-shifting 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, combat, game state)
//! - `input`: Logical actions, key bindings and the per-tick input source
//! - `settings`: Player preferences persisted in LocalStorage
//! - `tuning`: Data-driven game balance

pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::{Action, InputSource, InputState, KeyBindings};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one physics step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical canvas dimensions (world units are pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 450.0;

    /// Base downward acceleration per tick
    pub const GRAVITY: f32 = 0.5;
    /// Max vertical speed per tick in the direction of gravity
    pub const TERMINAL_VELOCITY: f32 = 12.0;

    /// Vertical distance past the canvas edges that counts as falling out
    pub const FALL_OUT_MARGIN: f32 = 200.0;
    /// Camera follow interpolation factor per tick
    pub const CAMERA_LERP: f32 = 0.1;
}

/// Sign of a float as -1/0/+1 (0 stays 0, unlike `f32::signum`)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
