//! Keyboard input
//!
//! Physical key names (DOM `KeyboardEvent.key` values) are mapped to logical
//! actions through [`KeyBindings`]. The simulation only ever asks about
//! actions.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    CycleNext,
    CyclePrevious,
    Restart,
    Pause,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Attack,
        Action::CycleNext,
        Action::CyclePrevious,
        Action::Restart,
        Action::Pause,
    ];
}

/// What the simulation reads each tick
pub trait InputSource {
    /// Any key bound to `action` is currently held
    fn is_down(&self, action: Action) -> bool;
    /// A key bound to `action` went down since the last `reset_edges`
    fn is_pressed(&self, action: Action) -> bool;
    /// Forget this tick's presses. Called once per tick, after all queries.
    fn reset_edges(&mut self);
}

/// Logical action -> physical key names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings(BTreeMap<Action, Vec<String>>);

impl Default for KeyBindings {
    fn default() -> Self {
        let table: [(Action, &[&str]); 8] = [
            (Action::MoveLeft, &["ArrowLeft", "a", "A"]),
            (Action::MoveRight, &["ArrowRight", "d", "D"]),
            (Action::Jump, &[" ", "ArrowUp", "w", "W"]),
            (Action::Attack, &["x", "X"]),
            (Action::CycleNext, &["c", "C"]),
            (Action::CyclePrevious, &["v", "V"]),
            (Action::Restart, &["r", "R"]),
            (Action::Pause, &["Escape", "p", "P"]),
        ];
        Self(
            table
                .into_iter()
                .map(|(action, keys)| (action, keys.iter().map(|k| k.to_string()).collect()))
                .collect(),
        )
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[String] {
        self.0.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the keys for one action
    pub fn bind(&mut self, action: Action, keys: Vec<String>) {
        self.0.insert(action, keys);
    }

    /// First action a key is bound to
    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.0
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| k == key))
            .map(|(action, _)| *action)
    }
}

/// Held and just-pressed key sets fed by keyboard events
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: HashSet<String>,
    pressed: HashSet<String>,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pressed: HashSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Key went down. Auto-repeat of an already held key is not a new press.
    pub fn key_down(&mut self, key: &str) {
        if self.held.insert(key.to_string()) {
            self.pressed.insert(key.to_string());
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

impl InputSource for InputState {
    fn is_down(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .iter()
            .any(|k| self.held.contains(k))
    }

    fn is_pressed(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .iter()
            .any(|k| self.pressed.contains(k))
    }

    fn reset_edges(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_one_tick_edge() {
        let mut input = InputState::new(KeyBindings::default());
        input.key_down("c");
        assert!(input.is_pressed(Action::CycleNext));
        assert!(input.is_down(Action::CycleNext));

        input.reset_edges();
        assert!(!input.is_pressed(Action::CycleNext));
        assert!(input.is_down(Action::CycleNext));

        // Key repeat while held is not a new press
        input.key_down("c");
        assert!(!input.is_pressed(Action::CycleNext));

        input.key_up("c");
        assert!(!input.is_down(Action::CycleNext));
    }

    #[test]
    fn test_multiple_keys_per_action() {
        let mut input = InputState::new(KeyBindings::default());
        input.key_down("A");
        assert!(input.is_down(Action::MoveLeft));
        input.key_up("A");
        input.key_down("ArrowLeft");
        assert!(input.is_down(Action::MoveLeft));
        assert!(!input.is_down(Action::MoveRight));
    }

    #[test]
    fn test_space_jumps() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(" "), Some(Action::Jump));
        assert_eq!(bindings.action_for("Escape"), Some(Action::Pause));
        assert_eq!(bindings.action_for("q"), None);
    }

    #[test]
    fn test_every_action_bound_by_default() {
        let bindings = KeyBindings::default();
        for action in Action::ALL {
            assert!(!bindings.keys_for(action).is_empty(), "{:?}", action);
        }
    }

    #[test]
    fn test_rebind() {
        let mut input = InputState::new(KeyBindings::default());
        let mut bindings = input.bindings().clone();
        bindings.bind(Action::Attack, vec!["j".to_string()]);
        input = InputState::new(bindings);
        input.key_down("x");
        assert!(!input.is_pressed(Action::Attack));
        input.key_down("j");
        assert!(input.is_pressed(Action::Attack));
    }

    #[test]
    fn test_clear_releases_all() {
        let mut input = InputState::new(KeyBindings::default());
        input.key_down("d");
        input.key_down("x");
        input.clear();
        assert!(!input.is_down(Action::MoveRight));
        assert!(!input.is_pressed(Action::Attack));
    }
}
