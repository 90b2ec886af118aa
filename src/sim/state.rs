//! Session state and lifecycle
//!
//! `NotStarted -> Playing -> Over(Win | Loss)`, and `Over -> Playing` on
//! restart. The session owns every entity and effect; callers get snapshots.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{Animations, Effect};
use super::element::Element;
use super::entity::{Body, Bot, EntityId, Player, PlayerStats};
use super::population;
use super::spawn::SpawnPolicy;
use crate::error::SessionError;
use crate::highscores::{HighScoreEntry, HighScores};
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::settings::SimConfig;
use crate::{clamp_to_world, platform, ticks_to_ms};

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

/// Current lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    Playing,
    /// Bots and effects keep running; the player is frozen
    Over(Outcome),
}

/// Read-only projection of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub name: String,
    pub element: Element,
    pub color: &'static str,
    pub size: f32,
    pub radius: f32,
    pub score: u64,
    pub pos: Vec2,
}

impl From<&Body> for EntityView {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            name: body.name.clone(),
            element: body.element,
            color: body.element.color(),
            size: body.size,
            radius: body.radius(),
            score: body.score(),
            pos: body.pos,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub phase: SessionPhase,
    pub player: EntityView,
    pub player_target: Vec2,
    pub invulnerable: bool,
    pub bots: Vec<EntityView>,
    pub effects: Vec<Effect>,
    pub score: u64,
    pub elapsed_ticks: u64,
    pub elapsed_ms: u64,
    pub stats: PlayerStats,
    /// Leaderboard rank of the last finished game, if it made the list
    pub rank: Option<usize>,
}

/// One game session
pub struct Session {
    pub config: SimConfig,
    pub phase: SessionPhase,
    pub player: Player,
    /// Sorted by id
    pub bots: Vec<Bot>,
    pub(crate) animations: Animations,
    pub(crate) rng: Pcg32,
    pub(crate) spawn_policy: SpawnPolicy,
    /// Ticks since the session object was created
    pub time_ticks: u64,
    start_tick: u64,
    end_tick: Option<u64>,
    pending_target: Option<Vec2>,
    next_id: u32,
    store: Box<dyn KeyValueStore>,
    last_rank: Option<usize>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("time_ticks", &self.time_ticks)
            .field("player", &self.player.body.name)
            .field("bots", &self.bots.len())
            .field("effects", &self.animations.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create an idle session; nothing is spawned until `start`
    pub fn new(config: SimConfig, store: Box<dyn KeyValueStore>) -> Result<Self, SessionError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(platform::default_seed);
        log::info!("Session created with seed: {}", seed);

        let center = config.world() / 2.0;
        let spawn_policy = SpawnPolicy::from_config(&config);
        Ok(Self {
            player: Player::new(EntityId(0), "", Element::Fire, center),
            config,
            phase: SessionPhase::NotStarted,
            bots: Vec::new(),
            animations: Animations::new(),
            rng: Pcg32::seed_from_u64(seed),
            spawn_policy,
            time_ticks: 0,
            start_tick: 0,
            end_tick: None,
            pending_target: None,
            next_id: 1,
            store,
            last_rank: None,
        })
    }

    /// Idle session with an in-memory score store
    pub fn in_memory(config: SimConfig) -> Result<Self, SessionError> {
        Self::new(config, Box::new(MemoryStore::new()))
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Begin (or begin again) with a player of the given name.
    ///
    /// Rejects names that are empty after trimming without touching state.
    pub fn start(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let center = self.config.world() / 2.0;
        let element = Element::random(&mut self.rng);
        let id = self.next_entity_id();
        let mut player = Player::new(id, name, element, center);
        player.invulnerable_until = self.time_ticks + self.config.invulnerability_ticks() as u64;
        self.player = player;

        self.animations.clear();
        self.bots.clear();
        self.pending_target = None;
        self.start_tick = self.time_ticks;
        self.end_tick = None;
        self.last_rank = None;
        self.phase = SessionPhase::Playing;

        population::replenish(self);

        log::info!(
            "Session started: {} as {} with {} bots",
            name,
            element,
            self.bots.len()
        );
        Ok(())
    }

    /// Start again with the same player name after a finished game
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, SessionPhase::Over(_)) {
            return Err(SessionError::NotOver);
        }
        let name = self.player.body.name.clone();
        self.start(&name)
    }

    /// Buffer a pointer target (world coordinates); applied at the next tick
    pub fn set_player_target(&mut self, x: f32, y: f32) {
        let target = Vec2::new(x, y);
        if !target.is_finite() {
            log::warn!("Ignoring non-finite pointer target ({}, {})", x, y);
            return;
        }
        self.pending_target = Some(target);
    }

    /// Take the buffered pointer target, clamped into the world
    pub(crate) fn take_target(&mut self) -> Option<Vec2> {
        let world = self.config.world();
        self.pending_target
            .take()
            .map(|t| clamp_to_world(t, world, 0.0))
    }

    /// Advance one tick and return the resulting snapshot
    pub fn tick(&mut self) -> SimulationSnapshot {
        super::tick::tick(self);
        self.snapshot()
    }

    /// Advance one tick without building a snapshot
    pub fn step(&mut self) {
        super::tick::tick(self);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Over(_))
    }

    pub fn score(&self) -> u64 {
        self.player.body.score()
    }

    pub fn animations(&self) -> &Animations {
        &self.animations
    }

    /// Ticks spent in the current (or last) game; frozen once it ends
    pub fn elapsed_ticks(&self) -> u64 {
        match self.phase {
            SessionPhase::NotStarted => 0,
            _ => self.end_tick.unwrap_or(self.time_ticks) - self.start_tick,
        }
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Current leaderboard, read from the store
    pub fn high_scores(&self) -> HighScores {
        HighScores::load(self.store.as_ref())
    }

    /// Finish the game: freeze the player, play the death sequence on a
    /// loss, and record the score.
    pub(crate) fn end(&mut self, outcome: Outcome, killer: Option<Element>) {
        if !self.is_playing() {
            return;
        }
        self.phase = SessionPhase::Over(outcome);
        self.end_tick = Some(self.time_ticks);
        self.player.vel = Vec2::ZERO;

        if outcome == Outcome::Loss {
            if let Some(killer) = killer {
                self.player.stats.record_death(killer);
            }
            let body = &self.player.body;
            let config = &self.config;
            self.animations.emit_player_death(
                &mut self.rng,
                body.pos,
                body.size,
                body.radius(),
                body.element,
                |ms| config.ticks(ms),
            );
        }

        let entry = HighScoreEntry {
            name: self.player.body.name.clone(),
            element: self.player.body.element,
            score: self.player.body.score(),
            size: self.player.body.size,
            timestamp: platform::now_ms(),
        };
        self.last_rank = HighScores::record(self.store.as_mut(), entry);

        log::info!(
            "Game over ({:?}): {} scored {} after {} ticks",
            outcome,
            self.player.body.name,
            self.player.body.score(),
            self.elapsed_ticks()
        );
    }

    /// Build a read-only view of the current state
    pub fn snapshot(&self) -> SimulationSnapshot {
        let elapsed_ticks = self.elapsed_ticks();
        SimulationSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            player: EntityView::from(&self.player.body),
            player_target: self.player.target,
            invulnerable: self.is_playing() && self.player.is_invulnerable(self.time_ticks),
            bots: self.bots.iter().map(|b| EntityView::from(&b.body)).collect(),
            effects: self.animations.iter().cloned().collect(),
            score: self.score(),
            elapsed_ticks,
            elapsed_ms: ticks_to_ms(elapsed_ticks, self.config.tick_rate_hz),
            stats: self.player.stats.clone(),
            rank: self.last_rank,
        }
    }
}
