// Core utilities shared by the engine and gameplay layers

pub mod math;
