// Input manager - turns winit events into player input

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::player::PlayerInput;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Routes window events through the bindings into the local player's input
#[derive(Debug, Default)]
pub struct InputManager {
    config: InputConfig,
    player: PlayerInput,
}

impl InputManager {
    pub fn new() -> Self {
        Self::with_config(InputConfig::with_defaults())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            // Held keys auto-repeat; only the first press counts
            if event.repeat {
                return;
            }
            self.process_source(InputSource::key(key_code), event.state);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state);
    }

    /// Process raw mouse motion (pixels, +y = down)
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        let settings = self.config.mouse;
        let vertical = if settings.invert_y {
            delta.1 as f32
        } else {
            -(delta.1 as f32)
        };
        self.player.add_mouse_look(
            Vec2::new(delta.0 as f32, vertical) * settings.sensitivity,
        );
    }

    /// Apply a bound source directly (used by event processing and tests)
    pub fn process_source(&mut self, source: InputSource, state: ElementState) {
        let Some(action) = self.config.get_action(source) else {
            return;
        };

        match state {
            ElementState::Pressed => self.player.press(action),
            ElementState::Released => self.player.release(action),
        }
    }

    /// Clear per-frame state; call once after the frame's gameplay update
    pub fn update(&mut self) {
        self.player.update();
    }

    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerInput {
        &mut self.player
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.player.just_pressed(action)
    }

    pub fn reset(&mut self) {
        self.player.reset();
    }
}
