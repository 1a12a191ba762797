// Gameplay layer
//
// - `characters`: the shooter character, its camera, crosshair and firing
// - `items`: pickup items, rarity stars and throwable weapons
// - `world`: owns the simulation and routes physics and timer events

pub mod characters;
pub mod items;
pub mod world;

pub use world::GameWorld;
