//! Simulation configuration
//!
//! Persisted separately from high scores; every field has a default so older
//! saved blobs keep loading.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::ms_to_ticks;
use crate::persistence::KeyValueStore;
use crate::sim::spawn::Placement;

/// World and timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Bots kept alive while a session exists
    pub bot_count: usize,

    // === Timing ===
    /// Ticks per second the scheduler aims for
    pub tick_rate_hz: u32,
    /// Player immunity after (re)start
    pub invulnerability_ms: u32,
    /// Bot waypoint re-pick interval
    pub bot_waypoint_interval_ms: u32,

    // === Spawning ===
    pub spawn_placement: Placement,
    /// Bots never spawn closer than this to the player
    pub spawn_min_player_distance: f32,
    /// Farthest a bot waypoint is picked from its position
    pub bot_waypoint_range: f32,

    /// RNG seed (None = random per run)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            bot_count: BOT_COUNT,

            tick_rate_hz: TICK_RATE_HZ,
            invulnerability_ms: INVULNERABILITY_MS,
            bot_waypoint_interval_ms: BOT_WAYPOINT_INTERVAL_MS,

            spawn_placement: Placement::Uniform,
            spawn_min_player_distance: 500.0,
            bot_waypoint_range: BOT_WAYPOINT_RANGE,

            seed: None,
        }
    }
}

impl SimConfig {
    /// Storage key for persisted config
    const STORAGE_KEY: &'static str = "wafe_config";

    /// World extent as a vector
    pub fn world(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    pub fn world_area(&self) -> f32 {
        self.world_width * self.world_height
    }

    pub fn invulnerability_ticks(&self) -> u32 {
        ms_to_ticks(self.invulnerability_ms, self.tick_rate_hz)
    }

    pub fn bot_waypoint_interval_ticks(&self) -> u32 {
        ms_to_ticks(self.bot_waypoint_interval_ms, self.tick_rate_hz)
    }

    /// Convert a millisecond delay into ticks at this config's rate
    pub fn ticks(&self, ms: u32) -> u32 {
        ms_to_ticks(ms, self.tick_rate_hz)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.world_width.is_finite() && self.world_height.is_finite();
        if !finite || self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(ConfigError::WorldSize(self.world_width, self.world_height));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::TickRate);
        }
        if self.bot_count > MAX_BOT_COUNT {
            return Err(ConfigError::BotCount(self.bot_count));
        }
        Ok(())
    }

    /// Parse and validate a JSON config blob
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides; invalid values are logged and ignored
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("WAFE_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => log::warn!("Invalid WAFE_SEED '{}', using random seed", seed),
            }
        }

        if let Ok(count) = std::env::var("WAFE_BOT_COUNT") {
            match count.parse::<usize>() {
                Ok(parsed) if parsed <= MAX_BOT_COUNT => config.bot_count = parsed,
                _ => log::warn!(
                    "WAFE_BOT_COUNT must be 0-{}, got '{}'",
                    MAX_BOT_COUNT,
                    count
                ),
            }
        }

        if let Ok(size) = std::env::var("WAFE_WORLD_SIZE") {
            match size.parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed > 0.0 => {
                    config.world_width = parsed;
                    config.world_height = parsed;
                }
                _ => log::warn!("Invalid WAFE_WORLD_SIZE '{}', using default", size),
            }
        }

        if let Ok(strategy) = std::env::var("WAFE_SPAWN_STRATEGY") {
            match Placement::from_str(&strategy) {
                Some(p) => config.spawn_placement = p,
                None => log::warn!("Unknown WAFE_SPAWN_STRATEGY '{}', using default", strategy),
            }
        }

        config
    }

    /// Load persisted config, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from store");
                    return config;
                }
                Err(e) => log::warn!("Ignoring stored config: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Config store unavailable: {}", e),
        }

        log::info!("Using default config");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Config saved"),
                Err(e) => log::warn!("Failed to save config: {}", e),
            },
            Err(e) => log::warn!("Failed to encode config: {}", e),
        }
    }
}
