/// Fixed timestep frame clock
///
/// Gameplay (physics, timers, character ticks) advances in fixed 1/60 s steps
/// while the window loop runs as fast as it likes. `advance` takes the real
/// frame time explicitly so the stepping logic can be driven from tests.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Target gameplay tick rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Upper bound on catch-up steps so a long hitch can't stall the loop
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Frames averaged for the FPS readout
const FPS_WINDOW_SIZE: usize = 60;

pub struct GameLoop {
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    pause_held: bool,
    frame_times: VecDeque<Duration>,
    frame_count: u64,
    update_count: u64,
    game_time: f64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            pause_held: false,
            frame_times: VecDeque::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            update_count: 0,
            game_time: 0.0,
        }
    }

    /// Begin a frame using wall-clock time, returns the number of fixed steps to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Feed one frame worth of real time, returns the number of fixed steps to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.pop_front();
        }

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop whatever a hitch left behind instead of replaying it next frame
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.update_count += steps as u64;
        self.game_time += steps as f64 * FIXED_TIMESTEP as f64;
        steps
    }

    /// Length of one gameplay step in seconds
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Gameplay time simulated so far, in seconds
    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Average frames per second over the recent window
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg = total.as_secs_f32() / self.frame_times.len() as f32;
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Don't replay the time spent paused
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Feed the held state of the pause button once per frame. Toggles on
    /// the press only, so a frame that runs no fixed steps can't toggle twice.
    pub fn update_pause_button(&mut self, held: bool) -> bool {
        let toggled = held && !self.pause_held;
        self.pause_held = held;
        if toggled {
            self.toggle_pause();
        }
        toggled
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
