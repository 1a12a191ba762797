// Input handling
//
// - `action`: gameplay actions and default key/mouse bindings
// - `config`: remapping and mouse-look settings
// - `player`: pressed/edge state plus move and look axes
// - `manager`: feeds winit events through the bindings
//
// The window loop forwards keyboard, mouse button and raw mouse motion events
// to the `InputManager`, the world reads `player()` during its update, and
// `update()` clears the frame edges afterwards.

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use config::{InputConfig, MouseSettings};
pub use manager::InputManager;
pub use player::PlayerInput;
