// Shooter character entity and management

use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;

use super::anim_instance::{AnimSnapshot, ShooterAnimInstance};
use super::camera::{ControlRotation, ShooterCamera};
use super::crosshair::CrosshairSpread;
use super::fire_control::FireControl;
use super::tuning::{CharacterTuning, LookRates};
use crate::engine::effects::{EffectSink, Transform};
use crate::engine::physics::{
    presets, ColliderHandle, CollisionChannel, Owner, PhysicsWorld, RigidBodyHandle, TraceHit,
};
use crate::engine::timer::{TimerEvent, TimerHandle, TimerManager};
use crate::error::GameError;
use crate::game::items::{ItemDesc, ItemId, ItemManager, ItemState};

/// Unique identifier for a character
pub type CharacterId = u32;

/// Viewport assumed until the window reports its size
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Extra distance below the feet that still counts as standing
const GROUND_PROBE: f32 = 2.0;

/// World state a character may touch while handling a frame or an event
pub struct FrameContext<'a> {
    pub physics: &'a mut PhysicsWorld,
    pub timers: &'a mut TimerManager,
    pub items: &'a mut ItemManager,
    pub effects: &'a mut dyn EffectSink,
    pub rng: &'a mut StdRng,
}

/// Result of the crosshair trace. `location` is the hit point, or the end of
/// the trace when nothing was hit.
#[derive(Debug, Clone, Copy)]
pub struct CrosshairTrace {
    pub hit: Option<TraceHit>,
    pub location: Vec3,
}

/// Player-controlled third-person shooter
#[derive(Debug)]
pub struct ShooterCharacter {
    pub id: CharacterId,
    pub name: String,
    tuning: CharacterTuning,

    // Physics
    body: RigidBodyHandle,
    capsule: ColliderHandle,
    location: Vec3,
    velocity: Vec3,
    is_falling: bool,
    jump_held: bool,

    // Input
    control: ControlRotation,
    /// x = forward, y = right
    move_input: Vec2,
    look_rates: LookRates,
    aiming: bool,

    camera: ShooterCamera,
    crosshair: CrosshairSpread,
    fire: FireControl,
    firing_bullet: bool,
    crosshair_shoot_timer: TimerHandle,

    // Items
    overlapped_item_count: i8,
    trace_hit_item: Option<ItemId>,
    trace_hit_item_last_frame: Option<ItemId>,
    equipped_weapon: Option<ItemId>,

    anim: ShooterAnimInstance,
}

impl ShooterCharacter {
    /// Create a character and add its capsule to the physics world
    pub fn new(
        id: CharacterId,
        name: &str,
        tuning: CharacterTuning,
        physics: &mut PhysicsWorld,
        location: Vec3,
    ) -> Self {
        let body = physics.add_rigid_body(presets::character_body(location));
        let capsule = physics.add_collider(
            presets::character_capsule(
                tuning.movement.capsule_half_height,
                tuning.movement.capsule_radius,
            ),
            body,
            Owner::Character(id),
        );

        let control = ControlRotation::default();
        let mut camera = ShooterCamera::new(&tuning.camera, DEFAULT_VIEWPORT);
        camera.update(location, control.yaw_quat(), control);

        Self {
            id,
            name: name.to_string(),
            body,
            capsule,
            location,
            velocity: Vec3::ZERO,
            is_falling: false,
            jump_held: false,
            control,
            move_input: Vec2::ZERO,
            look_rates: tuning.look,
            aiming: false,
            camera,
            crosshair: CrosshairSpread::new(tuning.crosshair),
            fire: FireControl::new(tuning.combat.automatic_fire_rate),
            firing_bullet: false,
            crosshair_shoot_timer: TimerHandle::default(),
            overlapped_item_count: 0,
            trace_hit_item: None,
            trace_hit_item_last_frame: None,
            equipped_weapon: None,
            anim: ShooterAnimInstance::new(),
            tuning,
        }
    }

    // Input handlers

    /// Movement axis: x = forward, y = right
    pub fn move_input(&mut self, axis: Vec2) {
        self.move_input = axis;
    }

    /// Turn/look at the current base rates. x = turn right, y = look up.
    pub fn look(&mut self, axis: Vec2, dt: f32) {
        self.control.add_yaw(-axis.x * self.look_rates.base_turn_rate * dt);
        self.control.add_pitch(axis.y * self.look_rates.base_look_up_rate * dt);
    }

    pub fn jump(&mut self) {
        self.jump_held = true;
        if self.is_falling {
            return;
        }
        self.velocity.y = self.tuning.movement.jump_z_velocity;
        self.is_falling = true;
    }

    pub fn stop_jumping(&mut self) {
        self.jump_held = false;
    }

    pub fn fire_button_pressed(&mut self, ctx: &mut FrameContext<'_>) {
        if self.fire.press(ctx.timers, self.id) {
            self.fire_weapon(ctx);
        }
    }

    pub fn fire_button_released(&mut self) {
        self.fire.release();
    }

    pub fn aiming_button_pressed(&mut self) {
        self.aiming = true;
    }

    pub fn aiming_button_released(&mut self) {
        self.aiming = false;
    }

    /// Pick up the weapon under the crosshair, dropping the current one
    pub fn select_button_pressed(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(id) = self.trace_hit_item else {
            return;
        };
        if ctx.items.weapon(id).is_none() {
            return;
        }
        if let Err(err) = self.swap_weapon(id, ctx) {
            log::warn!("{} could not pick up {}: {}", self.name, id, err);
        }
    }

    pub fn select_button_released(&mut self) {}

    pub fn drop_button_pressed(&mut self, ctx: &mut FrameContext<'_>) {
        self.drop_weapon(ctx);
    }

    // Combat

    /// One shot: sound, muzzle flash, beam to the resolved target, impact,
    /// recoil montage and crosshair spread
    pub fn fire_weapon(&mut self, ctx: &mut FrameContext<'_>) {
        let assets = &self.tuning.assets;

        if let Some(sound) = &assets.fire_sound {
            ctx.effects.play_sound(sound, self.location);
        }

        if let Some(barrel) = self.barrel_transform(ctx.items, ctx.physics) {
            if let Some(flash) = &assets.muzzle_flash {
                ctx.effects.spawn_emitter(flash, barrel);
            }

            if let Some((beam_end, hit)) = self.get_beam_end_location(barrel.location, ctx.physics)
            {
                if hit {
                    if let Some(impact) = &assets.impact_particles {
                        ctx.effects
                            .spawn_emitter(impact, Transform::from_location(beam_end));
                    }
                }
                if let Some(beam) = &assets.beam_particles {
                    ctx.effects.spawn_beam(beam, barrel, beam_end);
                }
            }
        }

        if let Some(montage) = &self.tuning.assets.hip_fire_montage {
            self.anim.montage_play(montage);
            self.anim.montage_jump_to_section(&self.tuning.combat.fire_section);
        }

        self.start_crosshair_bullet_fire(ctx.timers);
        log::debug!("{} fired", self.name);
    }

    /// Resolve where a shot from `muzzle` lands. Returns the end point and
    /// whether the muzzle trace hit something.
    pub fn get_beam_end_location(
        &self,
        muzzle: Vec3,
        physics: &PhysicsWorld,
    ) -> Option<(Vec3, bool)> {
        let crosshair = self.trace_under_crosshairs(physics)?;

        // Trace again from the muzzle, a bit past the crosshair target, so
        // anything between the barrel and the target stops the shot
        let trace_end = muzzle + (crosshair.location - muzzle) * self.tuning.combat.beam_overshoot;
        match physics.line_trace(muzzle, trace_end, CollisionChannel::Visibility, Some(self.body)) {
            Some(hit) => Some((hit.location, true)),
            None => Some((crosshair.location, false)),
        }
    }

    /// Trace from the camera through the crosshair
    pub fn trace_under_crosshairs(&self, physics: &PhysicsWorld) -> Option<CrosshairTrace> {
        let screen = self
            .camera
            .crosshair_screen_location(self.tuning.camera.crosshair_offset);
        let (origin, direction) = self.camera.deproject_screen_to_world(screen)?;
        let end = origin + direction * self.tuning.combat.trace_range;

        let hit = physics.line_trace(origin, end, CollisionChannel::Visibility, Some(self.body));
        Some(CrosshairTrace {
            hit,
            location: hit.map(|h| h.location).unwrap_or(end),
        })
    }

    fn start_crosshair_bullet_fire(&mut self, timers: &mut TimerManager) {
        self.firing_bullet = true;
        timers.set_timer(
            &mut self.crosshair_shoot_timer,
            self.tuning.crosshair.shoot_time_duration,
            TimerEvent::FinishCrosshairBulletFire(self.id),
        );
    }

    /// Timer callback: the shot spread window is over
    pub fn finish_crosshair_bullet_fire(&mut self) {
        self.firing_bullet = false;
    }

    /// Timer callback: the fire-rate cooldown is over
    pub fn auto_fire_reset(&mut self, ctx: &mut FrameContext<'_>) {
        if self.fire.auto_fire_reset(ctx.timers, self.id) {
            self.fire_weapon(ctx);
        }
    }

    // Items

    /// Adjust the number of item pickup spheres the character stands in
    pub fn increment_overlapped_item_count(&mut self, amount: i8) {
        self.overlapped_item_count = self.overlapped_item_count.saturating_add(amount);
    }

    pub fn should_trace_for_items(&self) -> bool {
        self.overlapped_item_count > 0
    }

    /// Show the pickup widget of the item under the crosshair and hide the
    /// one shown last frame
    pub fn trace_for_items(&mut self, ctx: &mut FrameContext<'_>) {
        if !self.should_trace_for_items() {
            self.trace_hit_item = None;
            if let Some(last) = self.trace_hit_item_last_frame.take() {
                if let Some(item) = ctx.items.item_mut(last) {
                    item.set_pickup_widget_visible(false);
                }
            }
            return;
        }

        let traced = self
            .trace_under_crosshairs(ctx.physics)
            .and_then(|trace| trace.hit)
            .and_then(|hit| match hit.owner {
                Some(Owner::Item(id)) => Some(id),
                _ => None,
            });
        self.trace_hit_item = traced;

        if let Some(id) = traced {
            if let Some(item) = ctx.items.item_mut(id) {
                item.set_pickup_widget_visible(true);
            }
        }

        if let Some(last) = self.trace_hit_item_last_frame {
            if traced != Some(last) {
                if let Some(item) = ctx.items.item_mut(last) {
                    item.set_pickup_widget_visible(false);
                }
            }
        }

        self.trace_hit_item_last_frame = traced;
    }

    /// Take a weapon into the right hand
    pub fn equip_weapon(
        &mut self,
        id: ItemId,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), GameError> {
        let hand = self.socket_transform(&self.tuning.combat.hand_socket);
        let actor = ctx.items.get_mut(id).ok_or(GameError::UnknownItem(id))?;
        let weapon = actor.as_weapon_mut().ok_or(GameError::NotAWeapon(id))?;

        weapon.cancel_throw(ctx.timers);
        weapon.item.set_item_state(ItemState::Equipped, ctx.physics);
        if let Some(hand) = hand {
            weapon.item.attach_to(hand, ctx.physics);
        }

        if self.trace_hit_item == Some(id) {
            self.trace_hit_item = None;
        }
        if self.trace_hit_item_last_frame == Some(id) {
            self.trace_hit_item_last_frame = None;
        }

        self.equipped_weapon = Some(id);
        log::info!("{} equipped {} ({})", self.name, weapon.item.name, id);
        Ok(())
    }

    /// Throw the equipped weapon. Returns the dropped weapon, if any.
    pub fn drop_weapon(&mut self, ctx: &mut FrameContext<'_>) -> Option<ItemId> {
        let id = self.equipped_weapon.take()?;
        if let Some(weapon) = ctx.items.weapon_mut(id) {
            weapon.throw_weapon(ctx.physics, ctx.timers, ctx.rng);
            log::info!("{} dropped {} ({})", self.name, weapon.item.name, id);
        }
        Some(id)
    }

    /// Drop the current weapon and equip `id`
    pub fn swap_weapon(&mut self, id: ItemId, ctx: &mut FrameContext<'_>) -> Result<(), GameError> {
        match ctx.items.get(id) {
            None => return Err(GameError::UnknownItem(id)),
            Some(actor) if !actor.is_weapon() => return Err(GameError::NotAWeapon(id)),
            Some(_) => {}
        }

        self.drop_weapon(ctx);
        self.equip_weapon(id, ctx)
    }

    /// Spawn a weapon in the hand and equip it
    pub fn spawn_default_weapon(
        &mut self,
        desc: ItemDesc,
        ctx: &mut FrameContext<'_>,
    ) -> Result<ItemId, GameError> {
        let at = self
            .socket_transform(&self.tuning.combat.hand_socket)
            .unwrap_or_else(|| Transform::from_location(self.location));
        let id = ctx.items.spawn_weapon(desc, ctx.physics, at);
        self.equip_weapon(id, ctx)?;
        Ok(id)
    }

    /// World transform of a named socket on the character
    pub fn socket_transform(&self, name: &str) -> Option<Transform> {
        if name != self.tuning.combat.hand_socket {
            return None;
        }
        let offset = self.body_rotation() * self.tuning.movement.right_hand_offset;
        Some(Transform::from_location_rotation(
            self.location + offset,
            self.control.quat(),
        ))
    }

    fn barrel_transform(&self, items: &ItemManager, physics: &PhysicsWorld) -> Option<Transform> {
        let weapon = items.weapon(self.equipped_weapon?)?;
        weapon.barrel_transform(&self.tuning.combat.muzzle_socket, physics)
    }

    // Per-frame update

    pub fn tick(&mut self, dt: f32, ctx: &mut FrameContext<'_>) {
        self.update_movement(dt, ctx.physics);
        self.camera.update(self.location, self.body_rotation(), self.control);
        self.camera.follow.interp_zoom(dt, self.aiming);
        self.set_look_rates();
        self.calculate_crosshair_spread(dt, ctx.timers);
        self.trace_for_items(ctx);
        self.attach_equipped_weapon(ctx);
    }

    fn update_movement(&mut self, dt: f32, physics: &mut PhysicsWorld) {
        let movement = self.tuning.movement;
        let heading = self.body_rotation();

        let mut wish =
            heading * Vec3::NEG_Z * self.move_input.x + heading * Vec3::X * self.move_input.y;
        if wish.length_squared() > 1.0 {
            wish = wish.normalize();
        }
        let target = wish * movement.max_walk_speed;

        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let horizontal = if self.is_falling {
            let max_delta = movement.max_acceleration * movement.air_control * dt;
            horizontal + (target - horizontal).clamp_length_max(max_delta)
        } else {
            target
        };
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;

        if self.is_falling {
            self.velocity.y -= movement.gravity * dt;
        }
        self.location += self.velocity * dt;

        self.check_ground(physics);
        physics.set_kinematic_target(
            self.body,
            Transform::from_location_rotation(self.location, heading),
        );
    }

    fn check_ground(&mut self, physics: &PhysicsWorld) {
        if self.velocity.y > 0.0 {
            self.is_falling = true;
            return;
        }

        let movement = self.tuning.movement;
        let foot = movement.capsule_half_height + movement.capsule_radius;
        let end = self.location - Vec3::Y * (foot + GROUND_PROBE);

        match physics.line_trace(self.location, end, CollisionChannel::Pawn, Some(self.body)) {
            Some(hit) => {
                if self.is_falling {
                    log::debug!("{} landed", self.name);
                }
                self.location.y = hit.location.y + foot;
                self.velocity.y = 0.0;
                self.is_falling = false;
            }
            None => self.is_falling = true,
        }
    }

    fn set_look_rates(&mut self) {
        let rates = &mut self.look_rates;
        if self.aiming {
            rates.base_turn_rate = rates.aiming_turn_rate;
            rates.base_look_up_rate = rates.aiming_look_up_rate;
        } else {
            rates.base_turn_rate = rates.hip_turn_rate;
            rates.base_look_up_rate = rates.hip_look_up_rate;
        }
    }

    fn calculate_crosshair_spread(&mut self, dt: f32, timers: &TimerManager) {
        let shot_time_remaining = if self.firing_bullet {
            timers.time_remaining(self.crosshair_shoot_timer)
        } else {
            -1.0
        };
        self.crosshair.update(
            dt,
            self.horizontal_speed(),
            self.is_falling,
            self.aiming,
            shot_time_remaining,
        );
    }

    fn attach_equipped_weapon(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(id) = self.equipped_weapon else {
            return;
        };
        let Some(hand) = self.socket_transform(&self.tuning.combat.hand_socket) else {
            return;
        };
        if let Some(item) = ctx.items.item_mut(id) {
            item.attach_to(hand, ctx.physics);
        }
    }

    /// Sample the character for its animation instance and advance montages
    pub fn update_animation(&mut self, dt: f32) {
        let snapshot = AnimSnapshot {
            velocity: self.velocity,
            is_falling: self.is_falling,
            is_accelerating: self.move_input.length_squared() > 0.0,
            aim_yaw: self.control.yaw,
            aiming: self.aiming,
        };
        self.anim.update_animation_properties(dt, &snapshot);
        self.anim.tick(dt);
    }

    // Accessors

    fn body_rotation(&self) -> Quat {
        self.control.yaw_quat()
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_falling(&self) -> bool {
        self.is_falling
    }

    pub fn is_jump_held(&self) -> bool {
        self.jump_held
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn is_firing_bullet(&self) -> bool {
        self.firing_bullet
    }

    pub fn control_rotation(&self) -> ControlRotation {
        self.control
    }

    pub fn set_control_rotation(&mut self, control: ControlRotation) {
        self.control = control;
        self.camera.update(self.location, self.body_rotation(), self.control);
    }

    pub fn look_rates(&self) -> LookRates {
        self.look_rates
    }

    pub fn crosshair_spread_multiplier(&self) -> f32 {
        self.crosshair.multiplier()
    }

    pub fn crosshair(&self) -> &CrosshairSpread {
        &self.crosshair
    }

    pub fn camera(&self) -> &ShooterCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ShooterCamera {
        &mut self.camera
    }

    pub fn fire_control(&self) -> &FireControl {
        &self.fire
    }

    pub fn overlapped_item_count(&self) -> i8 {
        self.overlapped_item_count
    }

    pub fn trace_hit_item(&self) -> Option<ItemId> {
        self.trace_hit_item
    }

    pub fn trace_hit_item_last_frame(&self) -> Option<ItemId> {
        self.trace_hit_item_last_frame
    }

    pub fn equipped_weapon(&self) -> Option<ItemId> {
        self.equipped_weapon
    }

    pub fn anim(&self) -> &ShooterAnimInstance {
        &self.anim
    }

    pub fn tuning(&self) -> &CharacterTuning {
        &self.tuning
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn capsule(&self) -> ColliderHandle {
        self.capsule
    }
}

/// Manages all characters in the game
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<ShooterCharacter>,
    next_id: CharacterId,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new character after validating its tuning
    pub fn spawn(
        &mut self,
        name: &str,
        tuning: CharacterTuning,
        physics: &mut PhysicsWorld,
        location: Vec3,
    ) -> Result<CharacterId, GameError> {
        tuning.validate()?;

        let id = self.next_id;
        self.next_id += 1;

        self.characters.push(ShooterCharacter::new(id, name, tuning, physics, location));
        log::info!("Spawned character {} ({})", name, id);
        Ok(id)
    }

    pub fn get(&self, id: CharacterId) -> Option<&ShooterCharacter> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut ShooterCharacter> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Character owning a physics body
    pub fn by_body_mut(&mut self, body: RigidBodyHandle) -> Option<&mut ShooterCharacter> {
        self.characters.iter_mut().find(|c| c.body == body)
    }

    pub fn all(&self) -> &[ShooterCharacter] {
        &self.characters
    }

    pub fn all_mut(&mut self) -> &mut [ShooterCharacter] {
        &mut self.characters
    }

    /// Remove a character along with its body and pending timers
    pub fn remove(
        &mut self,
        id: CharacterId,
        physics: &mut PhysicsWorld,
        timers: &mut TimerManager,
    ) -> Option<ShooterCharacter> {
        let index = self.characters.iter().position(|c| c.id == id)?;
        let character = self.characters.remove(index);
        physics.remove_rigid_body(character.body);
        timers.clear_all_for_character(id);
        Some(character)
    }

    pub fn count(&self) -> usize {
        self.characters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::effects::EffectLog;
    use crate::game::items::{weapon_desc, ItemRarity};
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;
    const STANDING_Y: f32 = 95.0;

    struct Sandbox {
        physics: PhysicsWorld,
        timers: TimerManager,
        items: ItemManager,
        effects: EffectLog,
        rng: StdRng,
    }

    impl Sandbox {
        fn new(with_wall: bool) -> Self {
            let mut physics = PhysicsWorld::new();
            let floor = physics.add_rigid_body(presets::static_body(Vec3::new(0.0, -50.0, 0.0)));
            physics.add_collider(
                presets::static_block(Vec3::new(5000.0, 50.0, 5000.0)),
                floor,
                Owner::Level,
            );
            if with_wall {
                let wall =
                    physics.add_rigid_body(presets::static_body(Vec3::new(0.0, 1000.0, -1000.0)));
                physics.add_collider(
                    presets::static_block(Vec3::new(2000.0, 1000.0, 50.0)),
                    wall,
                    Owner::Level,
                );
            }
            physics.step(DT);

            Self {
                physics,
                timers: TimerManager::new(),
                items: ItemManager::new(),
                effects: EffectLog::new(),
                rng: StdRng::seed_from_u64(42),
            }
        }

        fn ctx(&mut self) -> FrameContext<'_> {
            FrameContext {
                physics: &mut self.physics,
                timers: &mut self.timers,
                items: &mut self.items,
                effects: &mut self.effects,
                rng: &mut self.rng,
            }
        }

        fn player(&mut self) -> ShooterCharacter {
            ShooterCharacter::new(
                0,
                "Player",
                CharacterTuning::standard(),
                &mut self.physics,
                Vec3::new(0.0, STANDING_Y, 0.0),
            )
        }

        /// Spawn a weapon straight under the player's crosshair
        fn weapon_under_crosshair(&mut self, player: &ShooterCharacter, distance: f32) -> ItemId {
            let camera = player.camera();
            let screen = camera.crosshair_screen_location(player.tuning().camera.crosshair_offset);
            let (origin, direction) = camera
                .deproject_screen_to_world(screen)
                .expect("valid viewport");

            let id = self.items.spawn_weapon(
                weapon_desc("Pistol", ItemRarity::UnCommon),
                &mut self.physics,
                Transform::from_location(origin + direction * distance),
            );
            self.physics.step(DT);
            id
        }
    }

    #[test]
    fn test_fire_spawns_all_effects() {
        let mut sandbox = Sandbox::new(true);
        let mut player = sandbox.player();

        let mut ctx = sandbox.ctx();
        player
            .spawn_default_weapon(weapon_desc("Rifle", ItemRarity::Common), &mut ctx)
            .expect("weapon spawns");
        player.fire_button_pressed(&mut ctx);

        let effects = &sandbox.effects;
        assert_eq!(effects.sound_count("SniperShot"), 1);
        assert_eq!(effects.emitter_count("MuzzleFlash"), 1);
        assert_eq!(effects.emitter_count("ImpactSparks"), 1);
        assert_eq!(effects.beam_count("SmokeTrail"), 1);

        // The wall's front face is at z = -950
        let target = effects.last_beam_target().expect("beam spawned");
        assert_relative_eq!(target.z, -950.0, epsilon = 1e-2);

        assert_eq!(player.anim().current_section(), Some("StartFire"));
        assert!(player.is_firing_bullet());
    }

    #[test]
    fn test_fire_skips_missing_assets() {
        let mut sandbox = Sandbox::new(true);
        let mut tuning = CharacterTuning::standard();
        tuning.assets = Default::default();
        let mut player = ShooterCharacter::new(
            0,
            "Bare",
            tuning,
            &mut sandbox.physics,
            Vec3::new(0.0, STANDING_Y, 0.0),
        );

        let mut ctx = sandbox.ctx();
        player
            .spawn_default_weapon(weapon_desc("Rifle", ItemRarity::Common), &mut ctx)
            .expect("weapon spawns");
        player.fire_button_pressed(&mut ctx);

        assert!(sandbox.effects.events().is_empty());
        assert!(player.anim().current_montage().is_none());
        assert!(player.is_firing_bullet());
    }

    #[test]
    fn test_fire_uses_tuned_muzzle_socket() {
        let mut sandbox = Sandbox::new(true);
        let mut tuning = CharacterTuning::standard();
        tuning.combat.muzzle_socket = "Muzzle".to_string();
        let mut player = ShooterCharacter::new(
            0,
            "Player",
            tuning,
            &mut sandbox.physics,
            Vec3::new(0.0, STANDING_Y, 0.0),
        );

        let mut desc = weapon_desc("Rifle", ItemRarity::Common);
        desc.sockets[0].0 = "Muzzle".to_string();
        let mut ctx = sandbox.ctx();
        player.spawn_default_weapon(desc, &mut ctx).expect("weapon spawns");
        player.fire_button_pressed(&mut ctx);
        assert_eq!(sandbox.effects.emitter_count("MuzzleFlash"), 1);
        assert_eq!(sandbox.effects.beam_count("SmokeTrail"), 1);
    }

    #[test]
    fn test_fire_without_weapon_skips_barrel_effects() {
        let mut sandbox = Sandbox::new(true);
        let mut player = sandbox.player();

        player.fire_button_pressed(&mut sandbox.ctx());

        assert_eq!(sandbox.effects.sound_count("SniperShot"), 1);
        assert_eq!(sandbox.effects.emitter_count("MuzzleFlash"), 0);
        assert_eq!(sandbox.effects.beam_count("SmokeTrail"), 0);
    }

    #[test]
    fn test_open_sky_beam_ends_at_trace_range() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();
        player.set_control_rotation(ControlRotation::new(0.0, 30.0));

        let trace = player
            .trace_under_crosshairs(&sandbox.physics)
            .expect("valid viewport");
        assert!(trace.hit.is_none());

        let distance = (trace.location - player.camera().location()).length();
        assert_relative_eq!(distance, 50_000.0, epsilon = 0.5);

        let muzzle = player.location();
        let (end, hit) = player
            .get_beam_end_location(muzzle, &sandbox.physics)
            .expect("valid viewport");
        assert!(!hit);
        assert_eq!(end, trace.location);
    }

    #[test]
    fn test_held_trigger_keeps_firing() {
        let mut sandbox = Sandbox::new(true);
        let mut player = sandbox.player();

        player.fire_button_pressed(&mut sandbox.ctx());
        for event in sandbox.timers.tick(0.1) {
            if event == TimerEvent::AutoFireReset(player.id) {
                player.auto_fire_reset(&mut sandbox.ctx());
            }
        }
        assert_eq!(sandbox.effects.sound_count("SniperShot"), 2);

        player.fire_button_released();
        for event in sandbox.timers.tick(0.1) {
            if event == TimerEvent::AutoFireReset(player.id) {
                player.auto_fire_reset(&mut sandbox.ctx());
            }
        }
        assert_eq!(sandbox.effects.sound_count("SniperShot"), 2);
    }

    #[test]
    fn test_crosshair_shot_window() {
        let mut sandbox = Sandbox::new(true);
        let mut player = sandbox.player();

        player.tick(DT, &mut sandbox.ctx());
        assert_relative_eq!(player.crosshair_spread_multiplier(), 0.5, epsilon = 1e-5);

        player.fire_button_pressed(&mut sandbox.ctx());
        player.tick(0.0, &mut sandbox.ctx());
        assert_relative_eq!(player.crosshair_spread_multiplier(), 0.8, epsilon = 1e-5);

        for event in sandbox.timers.tick(0.06) {
            if event == TimerEvent::FinishCrosshairBulletFire(player.id) {
                player.finish_crosshair_bullet_fire();
            }
        }
        player.tick(DT, &mut sandbox.ctx());
        assert!(!player.is_firing_bullet());
        assert_relative_eq!(player.crosshair_spread_multiplier(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_look_rates_follow_aiming() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();

        player.aiming_button_pressed();
        player.tick(DT, &mut sandbox.ctx());
        assert_eq!(player.look_rates().base_turn_rate, 20.0);

        player.look(Vec2::new(1.0, 0.0), 0.5);
        assert_relative_eq!(player.control_rotation().yaw, -10.0, epsilon = 1e-4);

        player.aiming_button_released();
        player.tick(DT, &mut sandbox.ctx());
        assert_eq!(player.look_rates().base_turn_rate, 90.0);
        assert_eq!(player.look_rates().base_look_up_rate, 90.0);
    }

    #[test]
    fn test_aiming_zooms_camera() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();

        player.aiming_button_pressed();
        for _ in 0..120 {
            player.tick(DT, &mut sandbox.ctx());
        }
        assert_relative_eq!(player.camera().follow.current_fov, 35.0, epsilon = 1e-3);
    }

    #[test]
    fn test_walk_forward() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();

        player.move_input(Vec2::new(1.0, 0.0));
        for _ in 0..60 {
            player.tick(DT, &mut sandbox.ctx());
            sandbox.physics.step(DT);
        }

        assert!(!player.is_falling());
        assert_relative_eq!(player.location().z, -600.0, epsilon = 1e-1);
        assert_relative_eq!(player.location().y, STANDING_Y, epsilon = 1e-2);
        assert_relative_eq!(player.horizontal_speed(), 600.0, epsilon = 1e-2);
    }

    #[test]
    fn test_jump_and_land() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();

        player.jump();
        player.tick(DT, &mut sandbox.ctx());
        assert!(player.is_falling());
        assert!(player.location().y > STANDING_Y);

        // No double jump in the air
        let vy = player.velocity().y;
        player.jump();
        assert_eq!(player.velocity().y, vy);

        for _ in 0..120 {
            player.tick(DT, &mut sandbox.ctx());
        }
        assert!(!player.is_falling());
        assert_relative_eq!(player.location().y, STANDING_Y, epsilon = 1e-2);
    }

    #[test]
    fn test_overlap_count_gates_tracing() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();
        assert!(!player.should_trace_for_items());

        player.increment_overlapped_item_count(2);
        player.increment_overlapped_item_count(-1);
        assert!(player.should_trace_for_items());

        player.increment_overlapped_item_count(-1);
        assert_eq!(player.overlapped_item_count(), 0);
        assert!(!player.should_trace_for_items());
    }

    #[test]
    fn test_trace_for_items_toggles_widget() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();
        let id = sandbox.weapon_under_crosshair(&player, 400.0);

        // Out of range: nothing traced
        player.trace_for_items(&mut sandbox.ctx());
        assert_eq!(player.trace_hit_item(), None);

        player.increment_overlapped_item_count(1);
        player.trace_for_items(&mut sandbox.ctx());
        assert_eq!(player.trace_hit_item(), Some(id));
        assert_eq!(player.trace_hit_item_last_frame(), Some(id));
        assert!(sandbox.items.item(id).map(|i| i.is_pickup_widget_visible()).unwrap_or(false));

        // Look away: the widget hides
        player.set_control_rotation(ControlRotation::new(180.0, 0.0));
        player.trace_for_items(&mut sandbox.ctx());
        assert_eq!(player.trace_hit_item(), None);
        assert!(!sandbox.items.item(id).map(|i| i.is_pickup_widget_visible()).unwrap_or(true));

        // Look back, then leave the sphere
        player.set_control_rotation(ControlRotation::default());
        player.trace_for_items(&mut sandbox.ctx());
        assert!(sandbox.items.item(id).map(|i| i.is_pickup_widget_visible()).unwrap_or(false));

        player.increment_overlapped_item_count(-1);
        player.trace_for_items(&mut sandbox.ctx());
        assert_eq!(player.trace_hit_item_last_frame(), None);
        assert!(!sandbox.items.item(id).map(|i| i.is_pickup_widget_visible()).unwrap_or(true));
    }

    #[test]
    fn test_select_swaps_weapons() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();

        let old = player
            .spawn_default_weapon(weapon_desc("Rifle", ItemRarity::Common), &mut sandbox.ctx())
            .expect("weapon spawns");
        let new = sandbox.weapon_under_crosshair(&player, 400.0);

        player.increment_overlapped_item_count(1);
        player.trace_for_items(&mut sandbox.ctx());
        player.select_button_pressed(&mut sandbox.ctx());
        player.select_button_released();

        assert_eq!(player.equipped_weapon(), Some(new));
        assert_eq!(player.trace_hit_item(), None);
        assert_eq!(sandbox.items.item(new).map(|i| i.state()), Some(ItemState::Equipped));
        assert_eq!(sandbox.items.item(old).map(|i| i.state()), Some(ItemState::Falling));
        assert!(!sandbox.items.item(new).map(|i| i.is_pickup_widget_visible()).unwrap_or(true));
    }

    #[test]
    fn test_drop_weapon() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();

        let id = player
            .spawn_default_weapon(weapon_desc("Rifle", ItemRarity::Common), &mut sandbox.ctx())
            .expect("weapon spawns");
        player.drop_button_pressed(&mut sandbox.ctx());

        assert_eq!(player.equipped_weapon(), None);
        assert!(sandbox.items.weapon(id).map(|w| w.is_falling()).unwrap_or(false));
        assert_eq!(sandbox.timers.pending_count(), 1);

        // Nothing left to drop
        assert_eq!(player.drop_weapon(&mut sandbox.ctx()), None);
    }

    #[test]
    fn test_equip_rejects_non_weapons() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();
        let ammo = sandbox
            .items
            .spawn_item(ItemDesc::default(), &mut sandbox.physics, Transform::IDENTITY);

        assert!(matches!(
            player.equip_weapon(ammo, &mut sandbox.ctx()),
            Err(GameError::NotAWeapon(_))
        ));
        assert!(matches!(
            player.swap_weapon(99, &mut sandbox.ctx()),
            Err(GameError::UnknownItem(99))
        ));
        assert_eq!(player.equipped_weapon(), None);
    }

    #[test]
    fn test_equipped_weapon_follows_hand() {
        let mut sandbox = Sandbox::new(false);
        let mut player = sandbox.player();
        let id = player
            .spawn_default_weapon(weapon_desc("Rifle", ItemRarity::Common), &mut sandbox.ctx())
            .expect("weapon spawns");

        player.move_input(Vec2::new(0.0, 1.0));
        for _ in 0..30 {
            player.tick(DT, &mut sandbox.ctx());
        }

        let hand = player
            .socket_transform("RightHandSocket")
            .expect("hand socket");
        let weapon = sandbox
            .items
            .item(id)
            .and_then(|item| item.transform(&sandbox.physics))
            .expect("weapon body");
        assert_relative_eq!(weapon.location.x, hand.location.x, epsilon = 1e-3);
        assert!(player.socket_transform("Missing").is_none());
    }

    #[test]
    fn test_character_manager() {
        let mut physics = PhysicsWorld::new();
        let mut timers = TimerManager::new();
        let mut manager = CharacterManager::new();

        let a = manager
            .spawn("A", CharacterTuning::standard(), &mut physics, Vec3::ZERO)
            .expect("valid tuning");
        let b = manager
            .spawn("B", CharacterTuning::standard(), &mut physics, Vec3::X * 200.0)
            .expect("valid tuning");
        assert_ne!(a, b);
        assert_eq!(manager.count(), 2);

        let mut bad = CharacterTuning::standard();
        bad.combat.trace_range = -1.0;
        assert!(manager.spawn("C", bad, &mut physics, Vec3::ZERO).is_err());

        assert!(manager.remove(a, &mut physics, &mut timers).is_some());
        assert!(manager.get(a).is_none());
        assert_eq!(manager.count(), 1);
        assert_eq!(physics.body_count(), 1);
    }
}
