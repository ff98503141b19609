//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage. The simulation never reads these;
//! the frame driver and the presentation layer do.

use serde::{Deserialize, Serialize};

use crate::input::KeyBindings;
use crate::sim::LevelId;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physical keys for each logical action
    pub key_bindings: KeyBindings,
    /// Fixed RNG seed (replays); a time-based seed is used when unset
    pub seed: Option<u64>,
    /// Display name of the level new games begin on (practice)
    pub start_level: Option<String>,

    // === Audio (consumed by the presentation layer) ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Show transform/boss/loop messages
    pub show_messages: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_bindings: KeyBindings::default(),
            seed: None,
            start_level: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            show_messages: true,
        }
    }
}

impl Settings {
    /// Volume to play effects at, after mute
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Level new games begin on; unknown names fall back to the first level
    pub fn start_level(&self) -> LevelId {
        let Some(name) = self.start_level.as_deref() else {
            return LevelId::first();
        };
        LevelId::from_name(name).unwrap_or_else(|| {
            log::warn!(
                "Unknown start level '{}', starting on '{}'",
                name,
                LevelId::first().name()
            );
            LevelId::first()
        })
    }

    /// Parse stored JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "zarathustra_ascent_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::info!("Using default settings ({} not persisted natively)", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
