//! Error types surfaced to callers of the simulation

/// Errors from session lifecycle calls
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Player name is empty")]
    EmptyName,
    #[error("No finished session to restart")]
    NotOver,
    #[error("Rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from configuration loading/validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("World dimensions must be positive, got {0}x{1}")]
    WorldSize(f32, f32),
    #[error("Tick rate must be non-zero")]
    TickRate,
    #[error("Bot count must be at most {max}, got {0}", max = crate::consts::MAX_BOT_COUNT)]
    BotCount(usize),
    #[error("Malformed config JSON: {0}")]
    Json(String),
}

/// Errors from key-value stores
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
