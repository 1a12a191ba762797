// Input remapping

use super::action::{default_bindings, global_bindings, Action, InputSource};
use std::collections::HashMap;

/// Mouse-look scaling applied to raw mouse deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseSettings {
    /// Look-axis units per pixel of mouse motion
    pub sensitivity: f32,
    /// Flip vertical mouse look
    pub invert_y: bool,
}

impl Default for MouseSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            invert_y: false,
        }
    }
}

/// Maps input sources (keys/buttons) to actions
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,
    pub mouse: MouseSettings,
}

impl InputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with the default bindings plus the global ones
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.reset_to_defaults();
        config
    }

    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Bind a source to an action, replacing whatever it was bound to
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.bindings.insert(source, action);
    }

    pub fn unbind_source(&mut self, source: InputSource) {
        self.bindings.remove(&source);
    }

    pub fn unbind_action(&mut self, action: Action) {
        self.bindings.retain(|_, a| *a != action);
    }

    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    pub fn get_sources(&self, action: Action) -> Vec<InputSource> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(s, _)| *s)
            .collect()
    }

    pub fn has_binding(&self, action: Action) -> bool {
        self.bindings.values().any(|a| *a == action)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (source, action) in default_bindings().into_iter().chain(global_bindings()) {
            self.bind(source, action);
        }
        self.mouse = MouseSettings::default();
    }
}
