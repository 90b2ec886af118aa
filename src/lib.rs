//! WAFE Arena - Water/Air/Fire/Earth absorption arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, population, effects)
//! - `highscores`: Top-10 leaderboard backed by a key-value store
//! - `persistence`: Key-value stores (memory, file, LocalStorage)
//! - `settings`: Data-driven world configuration
//! - `driver`: Fixed-step scheduler for the outer frame loop
//! - `platform`: Wall clock at the outermost boundary

pub mod driver;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::FixedStepDriver;
pub use error::{ConfigError, SessionError, StorageError};
pub use highscores::{HighScoreEntry, HighScores};
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::SimConfig;
pub use sim::{Session, SessionPhase, SimulationSnapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh driving one tick per frame
    pub const TICK_RATE_HZ: u32 = 60;
    /// Maximum ticks the driver runs per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 3000.0;
    pub const WORLD_HEIGHT: f32 = 3000.0;
    /// Fraction of the world area the player must cover to win
    pub const WIN_AREA_FRACTION: f32 = 0.01;

    /// Bots kept alive while a session exists
    pub const BOT_COUNT: usize = 5;
    /// Upper bound accepted from any config source
    pub const MAX_BOT_COUNT: usize = 100;

    /// Collision radius = BASE_RADIUS + size * RADIUS_PER_SIZE
    pub const BASE_RADIUS: f32 = 20.0;
    pub const RADIUS_PER_SIZE: f32 = 5.0;
    /// Score = floor(size * SCORE_PER_SIZE)
    pub const SCORE_PER_SIZE: f32 = 500.0;

    /// Absorption on an elemental win
    pub const ELEMENTAL_ABSORB: f32 = 0.2;
    /// Absorption on a size win
    pub const SIZE_ABSORB: f32 = 0.1;
    /// Size ratio needed to win without an elemental edge
    pub const SIZE_WIN_RATIO: f32 = 1.5;

    /// Player defaults
    pub const PLAYER_START_SIZE: f32 = 1.0;
    pub const PLAYER_BASE_SPEED: f32 = 2.0;
    pub const INVULNERABILITY_MS: u32 = 3000;

    /// Bot wander defaults
    pub const BOT_WAYPOINT_INTERVAL_MS: u32 = 3000;
    pub const BOT_WAYPOINT_RANGE: f32 = 1000.0;
    pub const BOT_WAYPOINT_REACHED: f32 = 10.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Clamp a point into `[margin, size - margin]` on both axes.
///
/// When the margin exceeds half the extent the point is pinned to the middle
/// of that axis instead of producing an inverted range.
#[inline]
pub fn clamp_to_world(pos: Vec2, world: Vec2, margin: f32) -> Vec2 {
    Vec2::new(
        clamp_axis(pos.x, world.x, margin),
        clamp_axis(pos.y, world.y, margin),
    )
}

#[inline]
fn clamp_axis(v: f32, extent: f32, margin: f32) -> f32 {
    let lo = margin;
    let hi = extent - margin;
    if lo > hi {
        extent / 2.0
    } else {
        v.clamp(lo, hi)
    }
}

/// Convert a millisecond duration to whole ticks at the given rate (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32, tick_rate_hz: u32) -> u32 {
    let ticks = ms as u64 * tick_rate_hz as u64;
    ticks.div_ceil(1000) as u32
}

/// Convert a tick count to milliseconds at the given rate
#[inline]
pub fn ticks_to_ms(ticks: u64, tick_rate_hz: u32) -> u64 {
    if tick_rate_hz == 0 {
        return 0;
    }
    ticks * 1000 / tick_rate_hz as u64
}
