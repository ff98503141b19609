//! Engine: the single owner of the game state
//!
//! Outside code gets `&GameState` only. Every mutation goes through the
//! lifecycle entry points here or through [`tick`].

use super::events::SoundEvent;
use super::level::LevelId;
use super::state::{GameState, GameStatus};
use super::tick::tick;
use crate::input::{Action, InputSource};

#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    /// Level a new game begins on
    start_level: LevelId,
}

impl Engine {
    /// Engine on the title screen with the first level loaded
    pub fn new(seed: u64) -> Self {
        Self::with_start_level(seed, LevelId::first())
    }

    /// Engine whose new games begin on `start_level`
    pub fn with_start_level(seed: u64, start_level: LevelId) -> Self {
        Self {
            state: GameState::new(start_level, seed),
            start_level,
        }
    }

    /// Read-only view for renderers and audio
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Reset to the start level and play
    pub fn start_game(&mut self) -> Vec<SoundEvent> {
        self.state.load_level(self.start_level);
        self.state.status = GameStatus::Playing;
        log::info!("Game started on '{}'", self.start_level.name());
        vec![SoundEvent::Transform]
    }

    /// Reload the current level from its initial layout and play
    pub fn restart_level(&mut self) {
        let level = self.state.level;
        self.state.load_level(level);
        self.state.status = GameStatus::Playing;
        log::info!("Restarted '{}'", level.name());
    }

    /// Flip Playing <-> Paused; other statuses are left alone
    pub fn toggle_pause(&mut self) {
        self.state.status = match self.state.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            other => other,
        };
    }

    /// Advance one fixed step
    pub fn update<I: InputSource + ?Sized>(&mut self, input: &mut I, dt: f32) -> Vec<SoundEvent> {
        tick(&mut self.state, input, dt)
    }

    /// One frame-driver step: handle pause/restart actions, then tick.
    ///
    /// Restart from the title, game over or victory screens starts over.
    pub fn step<I: InputSource + ?Sized>(&mut self, input: &mut I, dt: f32) -> Vec<SoundEvent> {
        let mut events = Vec::new();

        if input.is_pressed(Action::Pause) {
            self.toggle_pause();
        }
        if input.is_pressed(Action::Restart) {
            match self.state.status {
                GameStatus::Menu | GameStatus::Victory => events.extend(self.start_game()),
                _ => self.restart_level(),
            }
        }

        events.extend(self.update(input, dt));
        events
    }
}
