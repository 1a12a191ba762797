// One-shot gameplay timers
//
// Timers are owned by the world and ticked once per frame. Expired timers are
// returned as `TimerEvent`s so the world can route them back to their owners.

use crate::game::characters::CharacterId;
use crate::game::items::ItemId;

/// Remaining time at or below which a timer counts as expired. Absorbs the
/// rounding left after summing fixed frame steps, e.g. six 1/60 s steps
/// against a 0.1 s delay.
const EXPIRY_TOLERANCE: f32 = 1e-5;

/// Callback a timer delivers when it expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Fire-rate cooldown elapsed; the character may shoot again
    AutoFireReset(CharacterId),
    /// Crosshair shot spread window elapsed
    FinishCrosshairBulletFire(CharacterId),
    /// Thrown weapon settles back into the pickup state
    StopFalling(ItemId),
}

impl TimerEvent {
    fn character(&self) -> Option<CharacterId> {
        match self {
            Self::AutoFireReset(id) | Self::FinishCrosshairBulletFire(id) => Some(*id),
            Self::StopFalling(_) => None,
        }
    }

    fn item(&self) -> Option<ItemId> {
        match self {
            Self::StopFalling(id) => Some(*id),
            _ => None,
        }
    }
}

/// Handle to a pending timer. The default handle refers to no timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Check whether this handle was ever assigned
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Forget the timer this handle points at
    pub fn invalidate(&mut self) {
        self.0 = 0;
    }
}

#[derive(Debug)]
struct PendingTimer {
    handle: TimerHandle,
    remaining: f32,
    event: TimerEvent,
}

/// Schedules one-shot timers against game time
#[derive(Debug)]
pub struct TimerManager {
    timers: Vec<PendingTimer>,
    /// Timers that expired during the latest `tick`, with how late they were
    expired: Vec<(TimerHandle, f32)>,
    next_id: u64,
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerManager {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            expired: Vec::new(),
            next_id: 1,
        }
    }

    /// Arm a timer that delivers `event` after `delay` seconds.
    ///
    /// If `handle` already points at a pending timer, that timer is replaced.
    pub fn set_timer(&mut self, handle: &mut TimerHandle, delay: f32, event: TimerEvent) {
        self.clear_timer(handle);

        let id = TimerHandle(self.next_id);
        self.next_id += 1;

        self.timers.push(PendingTimer {
            handle: id,
            remaining: delay.max(0.0),
            event,
        });
        *handle = id;
    }

    /// Cancel a pending timer and invalidate the handle
    pub fn clear_timer(&mut self, handle: &mut TimerHandle) {
        if handle.is_valid() {
            self.timers.retain(|t| t.handle != *handle);
            handle.invalidate();
        }
    }

    /// Check if the timer behind `handle` is still pending
    pub fn is_timer_active(&self, handle: TimerHandle) -> bool {
        handle.is_valid() && self.timers.iter().any(|t| t.handle == handle)
    }

    /// Seconds until the timer fires, or -1.0 if it is not pending
    pub fn time_remaining(&self, handle: TimerHandle) -> f32 {
        self.timers
            .iter()
            .find(|t| handle.is_valid() && t.handle == handle)
            .map(|t| t.remaining)
            .unwrap_or(-1.0)
    }

    /// Advance all timers and return the events of those that expired,
    /// earliest expiry first
    pub fn tick(&mut self, dt: f32) -> Vec<TimerEvent> {
        self.expired.clear();
        let mut expired = Vec::new();

        for timer in &mut self.timers {
            timer.remaining -= dt;
            if timer.remaining <= EXPIRY_TOLERANCE {
                expired.push((timer.remaining, timer.handle, timer.event));
            }
        }

        if expired.is_empty() {
            return Vec::new();
        }

        self.timers.retain(|t| t.remaining > EXPIRY_TOLERANCE);
        self.expired.extend(
            expired
                .iter()
                .map(|(remaining, handle, _)| (*handle, (-remaining).max(0.0))),
        );

        // Most negative remaining time expired first
        expired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1 .0.cmp(&b.1 .0)));
        expired.into_iter().map(|(_, _, event)| event).collect()
    }

    /// How far past its expiry the timer behind `handle` was when the latest
    /// `tick` fired it. Zero for timers that did not fire in that tick.
    pub fn overshoot(&self, handle: TimerHandle) -> f32 {
        self.expired
            .iter()
            .find(|(h, _)| handle.is_valid() && *h == handle)
            .map(|(_, late)| *late)
            .unwrap_or(0.0)
    }

    /// Drop every pending timer that would call back into a character
    pub fn clear_all_for_character(&mut self, id: CharacterId) {
        self.timers.retain(|t| t.event.character() != Some(id));
    }

    /// Drop every pending timer that would call back into an item
    pub fn clear_all_for_item(&mut self, id: ItemId) {
        self.timers.retain(|t| t.event.item() != Some(id));
    }

    /// Number of pending timers
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_handle_is_invalid() {
        let handle = TimerHandle::default();
        assert!(!handle.is_valid());
    }

    #[test]
    fn test_timer_fires_once() {
        let mut timers = TimerManager::new();
        let mut handle = TimerHandle::default();
        timers.set_timer(&mut handle, 0.25, TimerEvent::AutoFireReset(0));

        assert!(timers.tick(0.125).is_empty());
        assert!(timers.is_timer_active(handle));

        assert_eq!(timers.tick(0.125), vec![TimerEvent::AutoFireReset(0)]);
        assert!(!timers.is_timer_active(handle));
        assert!(timers.tick(1.0).is_empty());
    }

    #[test]
    fn test_time_remaining() {
        let mut timers = TimerManager::new();
        let mut handle = TimerHandle::default();
        assert_eq!(timers.time_remaining(handle), -1.0);

        timers.set_timer(&mut handle, 0.5, TimerEvent::StopFalling(3));
        timers.tick(0.25);
        assert_eq!(timers.time_remaining(handle), 0.25);
    }

    #[test]
    fn test_reset_replaces_pending_timer() {
        let mut timers = TimerManager::new();
        let mut handle = TimerHandle::default();
        timers.set_timer(&mut handle, 0.25, TimerEvent::FinishCrosshairBulletFire(1));
        timers.tick(0.125);

        timers.set_timer(&mut handle, 0.25, TimerEvent::FinishCrosshairBulletFire(1));
        assert_eq!(timers.pending_count(), 1);

        assert!(timers.tick(0.125).is_empty());
        assert_eq!(timers.tick(0.125).len(), 1);
    }

    #[test]
    fn test_clear_timer() {
        let mut timers = TimerManager::new();
        let mut handle = TimerHandle::default();
        timers.set_timer(&mut handle, 0.1, TimerEvent::AutoFireReset(0));
        timers.clear_timer(&mut handle);

        assert!(!handle.is_valid());
        assert!(timers.tick(1.0).is_empty());
    }

    #[test]
    fn test_expiry_order() {
        let mut timers = TimerManager::new();
        let mut a = TimerHandle::default();
        let mut b = TimerHandle::default();
        timers.set_timer(&mut a, 0.5, TimerEvent::StopFalling(1));
        timers.set_timer(&mut b, 0.25, TimerEvent::StopFalling(2));

        let events = timers.tick(1.0);
        assert_eq!(
            events,
            vec![TimerEvent::StopFalling(2), TimerEvent::StopFalling(1)]
        );
    }

    #[test]
    fn test_fixed_steps_expire_on_time() {
        let mut timers = TimerManager::new();
        let mut handle = TimerHandle::default();
        timers.set_timer(&mut handle, 0.1, TimerEvent::AutoFireReset(0));

        for _ in 0..5 {
            assert!(timers.tick(1.0 / 60.0).is_empty());
        }
        assert_eq!(timers.tick(1.0 / 60.0), vec![TimerEvent::AutoFireReset(0)]);
        assert_eq!(timers.overshoot(handle), 0.0);
    }

    #[test]
    fn test_overshoot_of_late_expiry() {
        let mut timers = TimerManager::new();
        let mut handle = TimerHandle::default();
        timers.set_timer(&mut handle, 0.1, TimerEvent::AutoFireReset(0));

        timers.tick(0.0625);
        assert_eq!(timers.tick(0.0625).len(), 1);
        assert!((timers.overshoot(handle) - 0.025).abs() < 1e-6);

        // Only the latest tick is remembered
        timers.tick(0.0625);
        assert_eq!(timers.overshoot(handle), 0.0);
    }

    #[test]
    fn test_clear_all_for_owner() {
        let mut timers = TimerManager::new();
        let mut a = TimerHandle::default();
        let mut b = TimerHandle::default();
        let mut c = TimerHandle::default();
        timers.set_timer(&mut a, 0.5, TimerEvent::AutoFireReset(1));
        timers.set_timer(&mut b, 0.5, TimerEvent::FinishCrosshairBulletFire(1));
        timers.set_timer(&mut c, 0.5, TimerEvent::StopFalling(1));

        timers.clear_all_for_character(1);
        assert_eq!(timers.pending_count(), 1);

        timers.clear_all_for_item(1);
        assert_eq!(timers.pending_count(), 0);
    }
}
