//! Player and bot entities
//!
//! Radius and score are always derived from `size`; neither is stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::element::Element;
use crate::consts::*;

/// Stable entity identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Shared physical state of every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub name: String,
    pub element: Element,
    /// Grows on absorption, never shrinks
    pub size: f32,
    pub pos: Vec2,
}

impl Body {
    pub fn new(id: EntityId, name: impl Into<String>, element: Element, size: f32, pos: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            element,
            size,
            pos,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        collision_radius(self.size)
    }

    #[inline]
    pub fn score(&self) -> u64 {
        score_for_size(self.size)
    }

    /// Absorb a fraction of another entity's size
    pub fn absorb(&mut self, other_size: f32, fraction: f32) {
        self.size += other_size * fraction;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.size.is_finite() && self.size > 0.0
    }
}

#[inline]
pub fn collision_radius(size: f32) -> f32 {
    BASE_RADIUS + size * RADIUS_PER_SIZE
}

#[inline]
pub fn score_for_size(size: f32) -> u64 {
    (size * SCORE_PER_SIZE).floor().max(0.0) as u64
}

/// Per-element kill/death tallies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub bots_defeated: u32,
    /// Indexed by element: fire, water, earth, air
    pub defeated: [u32; 4],
    pub defeated_by: [u32; 4],
}

impl PlayerStats {
    pub fn record_kill(&mut self, victim: Element) {
        self.bots_defeated += 1;
        self.defeated[victim.index()] += 1;
    }

    pub fn record_death(&mut self, killer: Element) {
        self.defeated_by[killer.index()] += 1;
    }

    pub fn defeated_count(&self, element: Element) -> u32 {
        self.defeated[element.index()]
    }

    pub fn defeated_by_count(&self, element: Element) -> u32 {
        self.defeated_by[element.index()]
    }
}

/// The pointer-driven entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Momentum vector, integrated every tick
    pub vel: Vec2,
    /// Seek target from pointer input
    pub target: Vec2,
    pub speed: f32,
    /// Last tick (inclusive) on which player-bot collisions are skipped
    pub invulnerable_until: u64,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(id: EntityId, name: impl Into<String>, element: Element, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, name, element, PLAYER_START_SIZE, pos),
            vel: Vec2::ZERO,
            target: pos,
            speed: PLAYER_BASE_SPEED,
            invulnerable_until: 0,
            stats: PlayerStats::default(),
        }
    }

    #[inline]
    pub fn is_invulnerable(&self, tick: u64) -> bool {
        tick <= self.invulnerable_until
    }

    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }
}

/// An autonomous wandering entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub body: Body,
    /// Constant travel speed (units per tick)
    pub speed: f32,
    /// Current wander target
    pub waypoint: Vec2,
    /// Ticks since the waypoint was last picked
    pub waypoint_age: u32,
}

impl Bot {
    pub fn new(body: Body, speed: f32, waypoint: Vec2) -> Self {
        Self {
            body,
            speed,
            waypoint,
            waypoint_age: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_defaults() {
        let p = Player::new(EntityId(1), "Ana", Element::Fire, Vec2::new(1500.0, 1500.0));
        assert_eq!(p.body.size, 1.0);
        assert_eq!(p.body.radius(), 25.0);
        assert_eq!(p.body.score(), 500);
        assert_eq!(p.target, p.body.pos);
        assert!(!p.is_moving());
    }

    #[test]
    fn test_stats() {
        let mut stats = PlayerStats::default();
        stats.record_kill(Element::Air);
        stats.record_kill(Element::Air);
        stats.record_death(Element::Water);
        assert_eq!(stats.bots_defeated, 2);
        assert_eq!(stats.defeated_count(Element::Air), 2);
        assert_eq!(stats.defeated_by_count(Element::Water), 1);
        assert_eq!(stats.defeated_by_count(Element::Fire), 0);
    }

    proptest! {
        #[test]
        fn prop_radius_and_score_track_size(start in 0.5f32..5.0, gains in prop::collection::vec(0.0f32..3.0, 0..10)) {
            let mut body = Body::new(EntityId(7), "b", Element::Earth, start, Vec2::ZERO);
            for g in gains {
                body.absorb(g, 0.2);
                prop_assert_eq!(body.radius(), 20.0 + body.size * 5.0);
                prop_assert_eq!(body.score(), (body.size * 500.0).floor() as u64);
            }
        }
    }
}
