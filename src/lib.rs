// Third-person shooter gameplay
//
// - `core`: math helpers for the per-frame blends
// - `engine`: host layer (physics, input, timers, effects, frame clock)
// - `game`: the shooter character, weapons and pickup items

pub mod core;
pub mod engine;
pub mod error;
pub mod game;

pub use error::GameError;
