//! Sound events emitted by a tick
//!
//! A tick returns its events as an owned list. The frame driver collects a
//! frame's ticks in a [`SoundQueue`] for the audio layer; nothing accumulates
//! across frames.

use serde::{Serialize, Serializer};

use super::form::Form;

const THEME_CHANGE_PREFIX: &str = "THEME_CHANGE_";

/// Something the audio layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    /// Metamorphosis, level entry, or boss phase change
    Transform,
    /// Background theme should switch to the given form
    ThemeChange(Form),
    Jump(Form),
    Attack(Form),
    Damage,
    Victory,
    /// Loop anchor destroyed
    Break,
}

impl SoundEvent {
    /// Wire identifier, e.g. `JUMP_LION` or `THEME_CHANGE_CHILD`
    pub fn id(&self) -> String {
        match self {
            SoundEvent::Transform => "TRANSFORM".to_string(),
            SoundEvent::ThemeChange(form) => format!("{THEME_CHANGE_PREFIX}{}", form.as_str()),
            SoundEvent::Jump(form) => format!("JUMP_{}", form.as_str()),
            SoundEvent::Attack(form) => format!("ATTACK_{}", form.as_str()),
            SoundEvent::Damage => "DAMAGE".to_string(),
            SoundEvent::Victory => "VICTORY".to_string(),
            SoundEvent::Break => "BREAK".to_string(),
        }
    }
}

impl Serialize for SoundEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id())
    }
}

/// Sound events waiting for the audio layer.
///
/// Holds at most one frame's worth of events: [`SoundQueue::begin_frame`]
/// throws away whatever the previous frame left behind, drained or not.
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    events: Vec<SoundEvent>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame, dropping undrained events
    pub fn begin_frame(&mut self) {
        self.events.clear();
    }

    /// Append the events of one tick
    pub fn push_tick(&mut self, events: impl IntoIterator<Item = SoundEvent>) {
        self.events.extend(events);
    }

    /// Hand the queued events to the audio layer
    pub fn drain(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
