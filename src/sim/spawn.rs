//! Bot placement
//!
//! One rejection-sampling loop, two candidate generators:
//! - `Uniform`: anywhere inside the world minus an edge margin
//! - `FarthestCorner`: the four world corners (jittered), farthest from the
//!   player first
//!
//! Placement never fails: after `max_attempts` the last candidate is used.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::SimConfig;
use crate::{clamp_to_world, distance};

/// Attempts before settling for a best-effort position
pub const MAX_SPAWN_ATTEMPTS: u32 = 20;

/// Candidate generator for the spawn loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Uniform,
    FarthestCorner,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Uniform => "uniform",
            Placement::FarthestCorner => "farthest_corner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" | "random" => Some(Placement::Uniform),
            "farthest_corner" | "corner" | "corners" => Some(Placement::FarthestCorner),
            _ => None,
        }
    }

    /// Extra clearance from the world edge beyond the entity radius
    fn edge_pad(&self) -> f32 {
        match self {
            Placement::Uniform => 50.0,
            Placement::FarthestCorner => 20.0,
        }
    }

    /// Required bot-bot spacing as a multiple of the new bot's radius
    fn spacing_factor(&self) -> f32 {
        match self {
            Placement::Uniform => 4.0,
            Placement::FarthestCorner => 3.0,
        }
    }

    /// Half-extent of the box the first waypoint is picked from
    pub fn waypoint_jitter(&self) -> f32 {
        match self {
            Placement::Uniform => 200.0,
            Placement::FarthestCorner => 100.0,
        }
    }
}

/// Result of a placement run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub pos: Vec2,
    /// Candidates generated (1..=max_attempts)
    pub attempts: u32,
    /// Whether every distance constraint holds at `pos`
    pub satisfied: bool,
}

/// Placement parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    pub placement: Placement,
    pub min_player_distance: f32,
    pub max_attempts: u32,
}

impl SpawnPolicy {
    pub fn new(placement: Placement, min_player_distance: f32) -> Self {
        Self {
            placement,
            min_player_distance,
            max_attempts: MAX_SPAWN_ATTEMPTS,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.spawn_placement, config.spawn_min_player_distance)
    }

    /// Pick a position for an entity of `radius`, away from the player and
    /// from every existing bot.
    pub fn plan(
        &self,
        rng: &mut impl Rng,
        world: Vec2,
        radius: f32,
        player: Vec2,
        bots: &[Vec2],
    ) -> SpawnPlan {
        let margin = radius + self.placement.edge_pad();
        let max_attempts = self.max_attempts.max(1);
        let mut corners = [Vec2::ZERO; 4];
        let mut pos = Vec2::new(world.x / 2.0, world.y / 2.0);

        for attempt in 0..max_attempts {
            pos = match self.placement {
                Placement::Uniform => uniform_candidate(rng, world, margin),
                Placement::FarthestCorner => {
                    let slot = (attempt % 4) as usize;
                    if slot == 0 {
                        corners = jittered_corners(rng, world, margin, player);
                    }
                    corners[slot]
                }
            };

            if self.is_clear(pos, radius, player, bots) {
                return SpawnPlan {
                    pos,
                    attempts: attempt + 1,
                    satisfied: true,
                };
            }
        }

        SpawnPlan {
            pos,
            attempts: max_attempts,
            satisfied: false,
        }
    }

    fn is_clear(&self, pos: Vec2, radius: f32, player: Vec2, bots: &[Vec2]) -> bool {
        if distance(pos, player) < self.min_player_distance {
            return false;
        }
        let spacing = radius * self.placement.spacing_factor();
        bots.iter().all(|&b| distance(pos, b) >= spacing)
    }
}

fn uniform_candidate(rng: &mut impl Rng, world: Vec2, margin: f32) -> Vec2 {
    let span = (world - Vec2::splat(2.0 * margin)).max(Vec2::ZERO);
    let raw = Vec2::new(
        margin + rng.random::<f32>() * span.x,
        margin + rng.random::<f32>() * span.y,
    );
    clamp_to_world(raw, world, margin)
}

/// World corners inset by `margin`, jittered ±50, sorted farthest from the
/// player first
fn jittered_corners(rng: &mut impl Rng, world: Vec2, margin: f32, player: Vec2) -> [Vec2; 4] {
    let mut corners = [
        Vec2::new(margin, margin),
        Vec2::new(world.x - margin, margin),
        Vec2::new(margin, world.y - margin),
        Vec2::new(world.x - margin, world.y - margin),
    ]
    .map(|c| {
        let jitter = Vec2::new(
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
        );
        clamp_to_world(c + jitter, world, margin)
    });
    corners.sort_by(|a, b| distance(*b, player).total_cmp(&distance(*a, player)));
    corners
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WORLD: Vec2 = Vec2::new(3000.0, 3000.0);
    const CENTER: Vec2 = Vec2::new(1500.0, 1500.0);

    #[test]
    fn test_uniform_clear_world() {
        let mut rng = Pcg32::seed_from_u64(1);
        let policy = SpawnPolicy::new(Placement::Uniform, 500.0);
        let plan = policy.plan(&mut rng, WORLD, 30.0, CENTER, &[]);
        assert!(plan.satisfied);
        assert!(plan.attempts <= MAX_SPAWN_ATTEMPTS);
        assert!(distance(plan.pos, CENTER) >= 500.0);
    }

    #[test]
    fn test_impossible_constraints_take_all_attempts() {
        let mut rng = Pcg32::seed_from_u64(2);
        // No point in a 3000 world is 10000 away from its center
        let policy = SpawnPolicy::new(Placement::Uniform, 10_000.0);
        let plan = policy.plan(&mut rng, WORLD, 30.0, CENTER, &[]);
        assert!(!plan.satisfied);
        assert_eq!(plan.attempts, MAX_SPAWN_ATTEMPTS);
        // Best effort still lands inside the world margin
        assert!(plan.pos.x >= 80.0 && plan.pos.x <= 2920.0);
        assert!(plan.pos.y >= 80.0 && plan.pos.y <= 2920.0);
    }

    #[test]
    fn test_farthest_corner_prefers_far_side() {
        let mut rng = Pcg32::seed_from_u64(3);
        let player = Vec2::new(200.0, 200.0);
        let policy = SpawnPolicy::new(Placement::FarthestCorner, 500.0);
        let plan = policy.plan(&mut rng, WORLD, 30.0, player, &[]);
        assert!(plan.satisfied);
        assert_eq!(plan.attempts, 1);
        // Opposite corner, within jitter
        assert!(plan.pos.x > 2800.0 && plan.pos.y > 2800.0);
    }

    #[test]
    fn test_farthest_corner_skips_occupied_corner() {
        let mut rng = Pcg32::seed_from_u64(4);
        let player = Vec2::new(200.0, 200.0);
        let occupied = [Vec2::new(2950.0, 2950.0)];
        let policy = SpawnPolicy::new(Placement::FarthestCorner, 500.0);
        let plan = policy.plan(&mut rng, WORLD, 30.0, player, &occupied);
        assert!(plan.satisfied);
        assert!(distance(plan.pos, occupied[0]) >= 90.0);
    }

    #[test]
    fn test_placement_names() {
        assert_eq!(Placement::from_str("Corner"), Some(Placement::FarthestCorner));
        assert_eq!(Placement::from_str(Placement::Uniform.as_str()), Some(Placement::Uniform));
        assert_eq!(Placement::from_str("spiral"), None);
    }

    proptest! {
        #[test]
        fn prop_plan_either_satisfied_or_exhausted(
            seed in any::<u64>(),
            radius in 24.0f32..40.0,
            bots in prop::collection::vec((0.0f32..3000.0, 0.0f32..3000.0), 0..6),
            corner in any::<bool>(),
        ) {
            let placement = if corner { Placement::FarthestCorner } else { Placement::Uniform };
            let bots: Vec<Vec2> = bots.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let mut rng = Pcg32::seed_from_u64(seed);
            let policy = SpawnPolicy::new(placement, 500.0);
            let plan = policy.plan(&mut rng, WORLD, radius, CENTER, &bots);

            if plan.satisfied {
                prop_assert!(distance(plan.pos, CENTER) >= 500.0);
                prop_assert!(plan.attempts <= MAX_SPAWN_ATTEMPTS);
            } else {
                prop_assert_eq!(plan.attempts, MAX_SPAWN_ATTEMPTS);
            }
            prop_assert!(plan.pos.x >= radius && plan.pos.x <= 3000.0 - radius);
            prop_assert!(plan.pos.y >= radius && plan.pos.y <= 3000.0 - radius);
        }
    }
}
