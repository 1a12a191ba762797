// Game world - owns the simulation and routes engine events to gameplay
//
// One `tick` runs: physics step, overlap routing, timers, items, characters,
// then animation.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::effects::{EffectLog, EffectSink, Transform};
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{presets, OverlapEvent, Owner, PhysicsWorld, RigidBodyHandle};
use crate::engine::timer::{TimerEvent, TimerManager};
use crate::error::GameError;
use crate::game::characters::{
    CharacterId, CharacterManager, CharacterTuning, FrameContext, ShooterCharacter,
};
use crate::game::items::{ItemActor, ItemDesc, ItemId, ItemManager, Weapon};

pub struct GameWorld<E: EffectSink = EffectLog> {
    physics: PhysicsWorld,
    timers: TimerManager,
    characters: CharacterManager,
    items: ItemManager,
    effects: E,
    rng: StdRng,
}

impl GameWorld<EffectLog> {
    pub fn new() -> Self {
        Self::with_effects(EffectLog::new(), StdRng::from_entropy())
    }
}

impl Default for GameWorld<EffectLog> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EffectSink> GameWorld<E> {
    pub fn with_effects(effects: E, rng: StdRng) -> Self {
        Self {
            physics: PhysicsWorld::new(),
            timers: TimerManager::new(),
            characters: CharacterManager::new(),
            items: ItemManager::new(),
            effects,
            rng,
        }
    }

    /// Characters plus everything they may touch, borrowed separately
    fn split(&mut self) -> (&mut CharacterManager, FrameContext<'_>) {
        (
            &mut self.characters,
            FrameContext {
                physics: &mut self.physics,
                timers: &mut self.timers,
                items: &mut self.items,
                effects: &mut self.effects,
                rng: &mut self.rng,
            },
        )
    }

    // Spawning

    /// Static level geometry: a box centred at `location`
    pub fn spawn_block(&mut self, location: Vec3, half_extents: Vec3) -> RigidBodyHandle {
        let body = self.physics.add_rigid_body(presets::static_body(location));
        self.physics
            .add_collider(presets::static_block(half_extents), body, Owner::Level);
        body
    }

    /// Flat floor whose top face sits at `height`
    pub fn spawn_floor(&mut self, height: f32, half_size: f32) -> RigidBodyHandle {
        const THICKNESS: f32 = 50.0;
        self.spawn_block(
            Vec3::new(0.0, height - THICKNESS, 0.0),
            Vec3::new(half_size, THICKNESS, half_size),
        )
    }

    pub fn spawn_character(
        &mut self,
        name: &str,
        tuning: CharacterTuning,
        location: Vec3,
    ) -> Result<CharacterId, GameError> {
        self.characters
            .spawn(name, tuning, &mut self.physics, location)
    }

    pub fn spawn_item(&mut self, desc: ItemDesc, transform: Transform) -> ItemId {
        self.items.spawn_item(desc, &mut self.physics, transform)
    }

    pub fn spawn_weapon(&mut self, desc: ItemDesc, transform: Transform) -> ItemId {
        self.items.spawn_weapon(desc, &mut self.physics, transform)
    }

    /// Spawn a weapon directly into a character's hand
    pub fn give_default_weapon(
        &mut self,
        character: CharacterId,
        desc: ItemDesc,
    ) -> Result<ItemId, GameError> {
        let (characters, mut ctx) = self.split();
        let character = characters
            .get_mut(character)
            .ok_or(GameError::UnknownCharacter(character))?;
        character.spawn_default_weapon(desc, &mut ctx)
    }

    // Input

    /// Feed one frame of player input to a character
    pub fn apply_player_input(
        &mut self,
        id: CharacterId,
        input: &PlayerInput,
        dt: f32,
    ) -> Result<(), GameError> {
        let (characters, mut ctx) = self.split();
        let character = characters
            .get_mut(id)
            .ok_or(GameError::UnknownCharacter(id))?;

        character.move_input(input.move_axis());
        character.look(input.look_axis(), dt);

        if input.just_pressed(Action::Jump) {
            character.jump();
        }
        if input.just_released(Action::Jump) {
            character.stop_jumping();
        }

        if input.just_pressed(Action::Fire) {
            character.fire_button_pressed(&mut ctx);
        }
        if input.just_released(Action::Fire) {
            character.fire_button_released();
        }

        if input.just_pressed(Action::Aim) {
            character.aiming_button_pressed();
        }
        if input.just_released(Action::Aim) {
            character.aiming_button_released();
        }

        if input.just_pressed(Action::Select) {
            character.select_button_pressed(&mut ctx);
        }
        if input.just_released(Action::Select) {
            character.select_button_released();
        }

        if input.just_pressed(Action::Drop) {
            character.drop_button_pressed(&mut ctx);
        }

        Ok(())
    }

    // Update

    pub fn tick(&mut self, dt: f32) {
        self.physics.step(dt);
        self.route_overlap_events();
        self.route_timer_events(dt);
        self.items.tick(&mut self.physics);

        let (characters, mut ctx) = self.split();
        for character in characters.all_mut() {
            character.tick(dt, &mut ctx);
        }
        for character in characters.all_mut() {
            character.update_animation(dt);
        }
    }

    fn route_overlap_events(&mut self) {
        for event in self.physics.overlap_events() {
            let (sensor, other, begin) = match event {
                OverlapEvent::Begin { sensor, other } => (sensor, other, true),
                OverlapEvent::End { sensor, other } => (sensor, other, false),
            };
            let Owner::Item(item_id) = sensor else {
                continue;
            };
            let Some(item) = self.items.item(item_id) else {
                continue;
            };

            let character = match other {
                Owner::Character(id) => self.characters.get_mut(id),
                _ => None,
            };
            if begin {
                item.on_sphere_overlap(character);
            } else {
                item.on_sphere_end_overlap(character);
            }
        }
    }

    fn route_timer_events(&mut self, dt: f32) {
        for event in self.timers.tick(dt) {
            log::debug!("Timer fired: {:?}", event);

            let (characters, mut ctx) = self.split();
            match event {
                TimerEvent::AutoFireReset(id) => {
                    if let Some(character) = characters.get_mut(id) {
                        character.auto_fire_reset(&mut ctx);
                    }
                }
                TimerEvent::FinishCrosshairBulletFire(id) => {
                    if let Some(character) = characters.get_mut(id) {
                        character.finish_crosshair_bullet_fire();
                    }
                }
                TimerEvent::StopFalling(id) => {
                    if let Some(weapon) = ctx.items.weapon_mut(id) {
                        weapon.stop_falling(ctx.physics);
                    }
                }
            }
        }
    }

    /// Tell every camera the new window size
    pub fn resize_viewport(&mut self, viewport: Vec2) {
        for character in self.characters.all_mut() {
            character.camera_mut().resize(viewport);
        }
    }

    // Lookups

    pub fn character(&self, id: CharacterId) -> Result<&ShooterCharacter, GameError> {
        self.characters
            .get(id)
            .ok_or(GameError::UnknownCharacter(id))
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Result<&mut ShooterCharacter, GameError> {
        self.characters
            .get_mut(id)
            .ok_or(GameError::UnknownCharacter(id))
    }

    pub fn item(&self, id: ItemId) -> Result<&ItemActor, GameError> {
        self.items.get(id).ok_or(GameError::UnknownItem(id))
    }

    pub fn weapon(&self, id: ItemId) -> Result<&Weapon, GameError> {
        self.item(id)?
            .as_weapon()
            .ok_or(GameError::NotAWeapon(id))
    }

    /// Weapon in a character's hand
    pub fn equipped_weapon(&self, character: CharacterId) -> Result<&Weapon, GameError> {
        let id = self
            .character(character)?
            .equipped_weapon()
            .ok_or(GameError::NoWeaponEquipped(character))?;
        self.weapon(id)
    }

    pub fn characters(&self) -> &CharacterManager {
        &self.characters
    }

    pub fn items(&self) -> &ItemManager {
        &self.items
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn timers(&self) -> &TimerManager {
        &self.timers
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::effects::LogSink;
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::game::items::{weapon_desc, ItemRarity, ItemState};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 64.0;

    fn world() -> (GameWorld, CharacterId) {
        let mut world = GameWorld::with_effects(EffectLog::new(), StdRng::seed_from_u64(7));
        world.spawn_floor(0.0, 5000.0);
        let player = world
            .spawn_character("Player", CharacterTuning::standard(), Vec3::new(0.0, 95.0, 0.0))
            .expect("valid tuning");
        (world, player)
    }

    fn run(world: &mut GameWorld, player: CharacterId, input: &mut PlayerInput, frames: usize) {
        for _ in 0..frames {
            world
                .apply_player_input(player, input, DT)
                .expect("player exists");
            input.update();
            world.tick(DT);
        }
    }

    #[test]
    fn test_character_stands_on_floor() {
        let (mut world, player) = world();
        let mut input = PlayerInput::new();
        run(&mut world, player, &mut input, 30);

        let character = world.character(player).expect("player exists");
        assert!(!character.is_falling());
        assert_relative_eq!(character.location().y, 95.0, epsilon = 1e-2);
    }

    #[test]
    fn test_overlaps_update_item_count() {
        let (mut world, player) = world();
        world.spawn_weapon(
            weapon_desc("Pistol", ItemRarity::Rare),
            Transform::from_location(Vec3::new(0.0, 30.0, -100.0)),
        );

        let mut input = PlayerInput::new();
        run(&mut world, player, &mut input, 2);
        assert_eq!(
            world.character(player).map(|c| c.overlapped_item_count()),
            Ok(1)
        );

        // Walk backwards out of the pickup sphere
        input.press(Action::MoveBackward);
        run(&mut world, player, &mut input, 64);
        let character = world.character(player).expect("player exists");
        assert!(character.location().z > 500.0);
        assert_eq!(character.overlapped_item_count(), 0);
        assert!(!character.should_trace_for_items());
    }

    #[test]
    fn test_held_trigger_fires_through_timers() {
        let (mut world, player) = world();
        world
            .give_default_weapon(player, weapon_desc("Rifle", ItemRarity::Common))
            .expect("weapon spawns");

        let mut input = PlayerInput::new();
        input.press(Action::Fire);
        run(&mut world, player, &mut input, 16);

        // 0.25 s at a 0.1 s fire rate
        assert_eq!(world.effects().sound_count("SniperShot"), 3);

        input.release(Action::Fire);
        run(&mut world, player, &mut input, 32);
        assert_eq!(world.effects().sound_count("SniperShot"), 3);
    }

    #[test]
    fn test_held_trigger_at_fixed_timestep() {
        let (mut world, player) = world();
        world
            .give_default_weapon(player, weapon_desc("Rifle", ItemRarity::Common))
            .expect("weapon spawns");

        let mut input = PlayerInput::new();
        input.press(Action::Fire);
        for _ in 0..60 {
            world
                .apply_player_input(player, &input, FIXED_TIMESTEP)
                .expect("player exists");
            input.update();
            world.tick(FIXED_TIMESTEP);
        }

        // One second at a 0.1 s fire rate: floor(1.0 / 0.1) + 1
        assert_eq!(world.effects().sound_count("SniperShot"), 11);
    }

    #[test]
    fn test_world_runs_on_log_sink() {
        let mut world = GameWorld::with_effects(LogSink::new(), StdRng::seed_from_u64(7));
        world.spawn_floor(0.0, 5000.0);
        let player = world
            .spawn_character("Player", CharacterTuning::standard(), Vec3::new(0.0, 95.0, 0.0))
            .expect("valid tuning");
        world
            .give_default_weapon(player, weapon_desc("Rifle", ItemRarity::Common))
            .expect("weapon spawns");

        let mut input = PlayerInput::new();
        input.press(Action::Fire);
        for _ in 0..16 {
            world
                .apply_player_input(player, &input, DT)
                .expect("player exists");
            input.update();
            world.tick(DT);
        }

        // Three shots, each with at least a sound and a beam
        assert!(world.effects().requests() >= 6);
    }

    #[test]
    fn test_dropped_weapon_returns_to_pickup() {
        let (mut world, player) = world();
        let weapon = world
            .give_default_weapon(player, weapon_desc("Rifle", ItemRarity::Legendary))
            .expect("weapon spawns");
        assert_eq!(world.equipped_weapon(player).map(|w| w.id()), Ok(weapon));

        let mut input = PlayerInput::new();
        input.press(Action::Drop);
        run(&mut world, player, &mut input, 1);
        assert_eq!(
            world.item(weapon).map(|a| a.item().state()),
            Ok(ItemState::Falling)
        );

        // Throw window is 0.7 s
        run(&mut world, player, &mut input, 48);
        let weapon = world.weapon(weapon).expect("still a weapon");
        assert!(!weapon.is_falling());
        assert_eq!(weapon.item.state(), ItemState::Pickup);
        assert_eq!(
            world.character(player).map(|c| c.equipped_weapon()),
            Ok(None)
        );
    }

    #[test]
    fn test_aim_input_toggles_aiming() {
        let (mut world, player) = world();
        let mut input = PlayerInput::new();

        input.press(Action::Aim);
        run(&mut world, player, &mut input, 1);
        assert_eq!(world.character(player).map(|c| c.is_aiming()), Ok(true));

        input.release(Action::Aim);
        run(&mut world, player, &mut input, 1);
        assert_eq!(world.character(player).map(|c| c.is_aiming()), Ok(false));
    }

    #[test]
    fn test_lookup_errors() {
        let (mut world, _) = world();
        let ammo = world.spawn_item(ItemDesc::default(), Transform::IDENTITY);

        assert!(matches!(world.character(42), Err(GameError::UnknownCharacter(42))));
        assert!(matches!(world.item(42), Err(GameError::UnknownItem(42))));
        assert!(matches!(world.weapon(ammo), Err(GameError::NotAWeapon(_))));
        assert_eq!(
            world.equipped_weapon(0).map(|w| w.id()),
            Err(GameError::NoWeaponEquipped(0))
        );
        assert!(matches!(
            world.apply_player_input(42, &PlayerInput::new(), DT),
            Err(GameError::UnknownCharacter(42))
        ));
    }
}
