// Gameplay action definitions and default bindings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Every input-driven gameplay action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement (2D move axis)
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,

    // Keyboard look (2D look axis); mouse motion feeds the same axis
    LookUp,
    LookDown,
    TurnLeft,
    TurnRight,

    Jump,

    // Combat
    Fire,
    Aim,

    // Items
    Select,
    Drop,

    // Meta actions
    Pause,
    Menu,
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings for the local player
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::KeyW), Action::MoveForward),
        (InputSource::key(KeyCode::KeyS), Action::MoveBackward),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowUp), Action::LookUp),
        (InputSource::key(KeyCode::ArrowDown), Action::LookDown),
        (InputSource::key(KeyCode::ArrowLeft), Action::TurnLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::TurnRight),
        (InputSource::key(KeyCode::Space), Action::Jump),
        (InputSource::mouse(MouseButton::Left), Action::Fire),
        (InputSource::mouse(MouseButton::Right), Action::Aim),
        (InputSource::key(KeyCode::KeyE), Action::Select),
        (InputSource::key(KeyCode::KeyQ), Action::Drop),
    ]
}

/// Global bindings, active regardless of remapping
pub fn global_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::Escape), Action::Menu),
        (InputSource::key(KeyCode::KeyP), Action::Pause),
    ]
}
