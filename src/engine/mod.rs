// Engine layer: physics, input, timers, effect outputs and the frame clock

pub mod effects;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod timer;
