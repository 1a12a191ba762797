// Local player input state

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Button and axis state for one frame of player input
#[derive(Debug, Default)]
pub struct PlayerInput {
    pressed: HashSet<Action>,
    just_pressed: HashSet<Action>,
    just_released: HashSet<Action>,
    /// Mouse-look delta accumulated since the last update, already scaled
    mouse_look: Vec2,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Add mouse-look motion (x = turn right, y = look up)
    pub fn add_mouse_look(&mut self, delta: Vec2) {
        self.mouse_look += delta;
    }

    /// Clear per-frame edges and consumed mouse motion
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_look = Vec2::ZERO;
    }

    pub fn reset(&mut self) {
        self.pressed.clear();
        self.update();
    }

    /// Movement axis: x = forward, y = right, each in [-1, 1]
    pub fn move_axis(&self) -> Vec2 {
        Vec2::new(
            self.axis(Action::MoveForward, Action::MoveBackward),
            self.axis(Action::MoveRight, Action::MoveLeft),
        )
    }

    /// Look axis: x = turn right, y = look up. Keys contribute ±1 and mouse
    /// motion is added on top.
    pub fn look_axis(&self) -> Vec2 {
        Vec2::new(
            self.axis(Action::TurnRight, Action::TurnLeft),
            self.axis(Action::LookUp, Action::LookDown),
        ) + self.mouse_look
    }

    fn axis(&self, positive: Action, negative: Action) -> f32 {
        let mut value = 0.0;
        if self.is_pressed(positive) {
            value += 1.0;
        }
        if self.is_pressed(negative) {
            value -= 1.0;
        }
        value
    }
}
