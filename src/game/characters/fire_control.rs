// Automatic fire gating
//
// Holding the trigger fires once immediately, then once every
// `automatic_fire_rate` seconds while the button stays down.

use crate::engine::timer::{TimerEvent, TimerHandle, TimerManager};
use crate::game::characters::CharacterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireState {
    /// Ready to shoot
    Idle,
    /// Waiting out the fire-rate cooldown
    Firing,
}

#[derive(Debug, Clone)]
pub struct FireControl {
    fire_button_pressed: bool,
    should_fire: bool,
    automatic_fire_rate: f32,
    auto_fire_timer: TimerHandle,
}

impl FireControl {
    pub fn new(automatic_fire_rate: f32) -> Self {
        Self {
            fire_button_pressed: false,
            should_fire: true,
            automatic_fire_rate,
            auto_fire_timer: TimerHandle::default(),
        }
    }

    /// Latch the trigger. Returns true when a shot goes out now.
    pub fn press(&mut self, timers: &mut TimerManager, owner: CharacterId) -> bool {
        self.fire_button_pressed = true;
        self.start_fire_timer(timers, owner, 0.0)
    }

    pub fn release(&mut self) {
        self.fire_button_pressed = false;
    }

    /// `late` is how far the previous cooldown overran, taken off this one so
    /// the average period stays at the fire rate
    fn start_fire_timer(
        &mut self,
        timers: &mut TimerManager,
        owner: CharacterId,
        late: f32,
    ) -> bool {
        if !self.should_fire {
            return false;
        }

        self.should_fire = false;
        timers.set_timer(
            &mut self.auto_fire_timer,
            (self.automatic_fire_rate - late).max(0.0),
            TimerEvent::AutoFireReset(owner),
        );
        true
    }

    /// Cooldown elapsed. Returns true when the held trigger fires again.
    pub fn auto_fire_reset(&mut self, timers: &mut TimerManager, owner: CharacterId) -> bool {
        self.should_fire = true;
        if self.fire_button_pressed {
            let late = timers.overshoot(self.auto_fire_timer);
            self.start_fire_timer(timers, owner, late)
        } else {
            false
        }
    }

    pub fn state(&self) -> FireState {
        if self.should_fire {
            FireState::Idle
        } else {
            FireState::Firing
        }
    }

    pub fn is_fire_button_pressed(&self) -> bool {
        self.fire_button_pressed
    }

    pub fn should_fire(&self) -> bool {
        self.should_fire
    }

    pub fn automatic_fire_rate(&self) -> f32 {
        self.automatic_fire_rate
    }
}
