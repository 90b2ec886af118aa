//! Population management: removals, replenishment, win/loss checks
//!
//! Runs after all pairwise resolutions of a tick. Defeated bots are removed
//! and replaced in the same step, so the bot count is back at target before
//! the tick returns. A defeated player is never removed; the session ends
//! instead and the player's last state stays renderable.

use glam::Vec2;
use rand::Rng;

use super::element::Element;
use super::entity::{Body, Bot, EntityId, collision_radius};
use super::movement::pick_waypoint;
use super::state::{Outcome, Session};
use crate::clamp_to_world;
use crate::consts::*;

pub const BOT_NAMES: [&str; 10] = [
    "Aqua", "Blaze", "Storm", "Terra", "Spark", "Frost", "Gust", "Ember", "Quake", "Dew",
];

/// What the collision scan decided this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    /// Bots to remove, in defeat order
    pub defeated: Vec<EntityId>,
    /// Element of the bot that beat the player, if any
    pub player_defeated_by: Option<Element>,
}

impl Contacts {
    pub fn is_defeated(&self, id: EntityId) -> bool {
        self.defeated.contains(&id)
    }
}

/// Player wins once their disc covers `WIN_AREA_FRACTION` of the world
#[inline]
pub fn win_condition_met(player_radius: f32, world_area: f32) -> bool {
    std::f32::consts::PI * player_radius * player_radius > world_area * WIN_AREA_FRACTION
}

/// Apply the tick's contacts: end the game on player defeat, drop defeated
/// bots, refill, then check for a win.
pub fn settle(session: &mut Session, contacts: Contacts) {
    if let Some(killer) = contacts.player_defeated_by {
        session.end(Outcome::Loss, Some(killer));
    }

    let removed = remove_defeated(&mut session.bots, &contacts.defeated);
    if removed > 0 {
        log::debug!("Removed {} defeated bots", removed);
    }
    replenish(session);

    if session.is_playing()
        && win_condition_met(session.player.body.radius(), session.config.world_area())
    {
        session.end(Outcome::Win, None);
    }
}

/// Remove every bot whose id is listed; returns how many went
pub fn remove_defeated(bots: &mut Vec<Bot>, defeated: &[EntityId]) -> usize {
    let before = bots.len();
    bots.retain(|b| !defeated.contains(&b.body.id));
    before - bots.len()
}

/// Spawn bots until the configured count is reached
pub fn replenish(session: &mut Session) -> usize {
    let mut spawned = 0;
    while session.bots.len() < session.config.bot_count {
        let id = session.next_entity_id();
        let bot = spawn_bot(session, id);
        session.bots.push(bot);
        spawned += 1;
    }
    spawned
}

/// Roll a new bot and place it with the session's spawn policy
fn spawn_bot(session: &mut Session, id: EntityId) -> Bot {
    let world = session.config.world();
    let rng = &mut session.rng;

    let name = BOT_NAMES[rng.random_range(0..BOT_NAMES.len())];
    let element = Element::random(rng);
    let size = rng.random_range(0.8..2.3);
    let speed = rng.random_range(1.0..2.5);

    let others: Vec<Vec2> = session.bots.iter().map(|b| b.body.pos).collect();
    let plan = session.spawn_policy.plan(
        rng,
        world,
        collision_radius(size),
        session.player.body.pos,
        &others,
    );
    if !plan.satisfied {
        log::debug!(
            "Spawn for {} settled after {} attempts at ({:.0}, {:.0})",
            name,
            plan.attempts,
            plan.pos.x,
            plan.pos.y
        );
    }

    let jitter = session.spawn_policy.placement.waypoint_jitter();
    let waypoint = pick_waypoint(rng, plan.pos, jitter, world);
    Bot::new(Body::new(id, name, element, size, plan.pos), speed, waypoint)
}

/// Drop or repair entities carrying non-finite data; returns anomalies found
pub fn sweep_anomalies(session: &mut Session) -> usize {
    let before = session.bots.len();
    session.bots.retain(|b| {
        let ok = b.body.is_finite() && b.waypoint.is_finite() && b.speed.is_finite();
        if !ok {
            log::warn!("Dropping malformed bot {:?} ({})", b.body.id, b.body.name);
        }
        ok
    });
    let mut anomalies = before - session.bots.len();

    let world = session.config.world();
    let player = &mut session.player;
    if !player.body.size.is_finite() || player.body.size <= 0.0 {
        log::warn!("Player size was {}, resetting", player.body.size);
        player.body.size = PLAYER_START_SIZE;
        anomalies += 1;
    }
    if !player.body.pos.is_finite() || !player.vel.is_finite() || !player.target.is_finite() {
        log::warn!("Player motion was non-finite, recentering");
        let center = world / 2.0;
        let pos = if player.body.pos.is_finite() {
            player.body.pos
        } else {
            center
        };
        player.body.pos = clamp_to_world(pos, world, player.body.radius());
        player.target = player.body.pos;
        player.vel = Vec2::ZERO;
        anomalies += 1;
    }
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::state::SessionPhase;

    fn started() -> Session {
        let config = SimConfig {
            seed: Some(777),
            ..Default::default()
        };
        let mut session = Session::in_memory(config).unwrap();
        session.start("Ana").unwrap();
        session
    }

    #[test]
    fn test_win_threshold_boundary() {
        let area = 3000.0 * 3000.0;
        // pi * r^2 > 90000  <=>  r > 169.2569
        let r_star = (area * WIN_AREA_FRACTION / std::f32::consts::PI).sqrt();
        let size_star = (r_star - BASE_RADIUS) / RADIUS_PER_SIZE;
        assert!(!win_condition_met(collision_radius(size_star - 0.01), area));
        assert!(win_condition_met(collision_radius(size_star + 0.01), area));
        assert!(!win_condition_met(collision_radius(1.0), area));
    }

    #[test]
    fn test_settle_replaces_defeated_bots() {
        let mut session = started();
        let victims: Vec<_> = session.bots.iter().take(2).map(|b| b.body.id).collect();
        settle(
            &mut session,
            Contacts {
                defeated: victims.clone(),
                player_defeated_by: None,
            },
        );
        assert_eq!(session.bots.len(), BOT_COUNT);
        assert!(session.bots.iter().all(|b| !victims.contains(&b.body.id)));
    }

    #[test]
    fn test_settle_player_defeat_ends_session() {
        let mut session = started();
        let player_id = session.player.body.id;
        settle(
            &mut session,
            Contacts {
                defeated: Vec::new(),
                player_defeated_by: Some(Element::Water),
            },
        );
        assert_eq!(session.phase, SessionPhase::Over(Outcome::Loss));
        assert_eq!(session.player.body.id, player_id);
        assert_eq!(session.player.stats.defeated_by_count(Element::Water), 1);
        assert_eq!(session.high_scores().len(), 1);
    }

    #[test]
    fn test_settle_detects_win() {
        let mut session = started();
        session.player.body.size = 31.0;
        settle(&mut session, Contacts::default());
        assert_eq!(session.phase, SessionPhase::Over(Outcome::Win));
    }

    #[test]
    fn test_spawned_bots_respect_ranges() {
        let session = started();
        for bot in &session.bots {
            assert!(BOT_NAMES.contains(&bot.body.name.as_str()));
            assert!((0.8f32..2.3).contains(&bot.body.size));
            assert!((1.0f32..2.5).contains(&bot.speed));
            let r = bot.body.radius();
            assert!(bot.body.pos.x >= r && bot.body.pos.x <= 3000.0 - r);
        }
    }

    #[test]
    fn test_sweep_repairs_bad_data() {
        let mut session = started();
        session.bots[0].body.pos = Vec2::new(f32::NAN, 10.0);
        session.player.body.pos = Vec2::new(f32::INFINITY, 0.0);
        session.player.body.size = f32::NAN;
        assert_eq!(sweep_anomalies(&mut session), 3);
        assert_eq!(session.bots.len(), BOT_COUNT - 1);
        assert_eq!(session.player.body.size, PLAYER_START_SIZE);
        assert_eq!(session.player.body.pos, Vec2::new(1500.0, 1500.0));
    }
}
