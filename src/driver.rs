//! Fixed-step scheduler for the outer frame loop
//!
//! The host calls `frame` once per display frame with the wall-clock delta.
//! The driver converts that into whole simulation ticks at the configured
//! rate, capped per frame so a long stall can't snowball.

use crate::consts::MAX_SUBSTEPS;
use crate::sim::{Session, autopilot};

/// Longest frame delta honoured; anything beyond is dropped
pub const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates frame time and runs ticks in fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    accumulator: f32,
    /// Seconds per tick
    step: f32,
    paused: bool,
    /// Let the autopilot steer the player before each tick
    pub autopilot: bool,
}

impl FixedStepDriver {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            accumulator: 0.0,
            step: 1.0 / tick_rate_hz.max(1) as f32,
            paused: false,
            autopilot: false,
        }
    }

    /// Driver matching a session's configured tick rate
    pub fn for_session(session: &Session) -> Self {
        Self::new(session.config.tick_rate_hz)
    }

    /// Seconds per tick
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's delta (seconds); returns how many ticks ran
    pub fn frame(&mut self, session: &mut Session, dt: f32) -> u32 {
        if self.paused {
            return 0;
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            if self.autopilot {
                if let Some(steer) = autopilot::suggest(session) {
                    let target = steer.target();
                    session.set_player_target(target.x, target.y);
                }
            }
            session.step();
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.step {
            log::debug!("Frame budget hit, dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Stop ticking; calling it again is harmless
    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Simulation paused");
        }
        self.paused = true;
        self.accumulator = 0.0;
    }

    /// Resume ticking; calling it again is harmless
    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Simulation resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forget any partial tick, e.g. after a restart
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self::new(crate::consts::TICK_RATE_HZ)
    }
}
