//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (durations are tick counts)
//! - Seeded RNG only
//! - Stable iteration order (bots are kept in id order)
//! - No rendering or platform dependencies beyond the score store

pub mod animation;
pub mod autopilot;
pub mod collision;
pub mod element;
pub mod entity;
pub mod movement;
pub mod population;
pub mod spawn;
pub mod state;
pub mod tick;

pub use animation::{Animations, Effect, EffectKind, Particle};
pub use autopilot::{Steering, suggest};
pub use collision::{Interaction, Verdict, WinKind, overlaps, resolve, verdict};
pub use element::Element;
pub use entity::{Body, Bot, EntityId, Player, PlayerStats, collision_radius, score_for_size};
pub use population::{BOT_NAMES, win_condition_met};
pub use spawn::{Placement, SpawnPlan, SpawnPolicy};
pub use state::{EntityView, Outcome, Session, SessionPhase, SimulationSnapshot};
pub use tick::tick;
