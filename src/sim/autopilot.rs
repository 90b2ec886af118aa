//! Demo-mode steering
//!
//! Produces pointer targets for an unattended player: run from the closest
//! bot that would win a collision, otherwise chase the closest bot it would
//! beat, otherwise wander. Reads the session only; the caller feeds the
//! result back through `set_player_target` like any other input.

use glam::Vec2;

use super::collision::{Verdict, verdict};
use super::entity::Bot;
use super::state::Session;
use crate::{clamp_to_world, distance};

/// Threats farther than this are ignored
pub const THREAT_RADIUS: f32 = 400.0;
/// How far ahead of the player a flee target is placed
pub const FLEE_DISTANCE: f32 = 300.0;

/// What the autopilot decided to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    Flee(Vec2),
    Chase(Vec2),
    Wander(Vec2),
}

impl Steering {
    pub fn target(self) -> Vec2 {
        match self {
            Steering::Flee(t) | Steering::Chase(t) | Steering::Wander(t) => t,
        }
    }
}

/// Pick a target for the player, or None when the session isn't playing
pub fn suggest(session: &Session) -> Option<Steering> {
    if !session.is_playing() {
        return None;
    }

    let player = &session.player.body;
    let world = session.config.world();
    let margin = player.radius();
    let gap = |bot: &Bot| distance(player.pos, bot.body.pos) - bot.body.radius();

    let threat = session
        .bots
        .iter()
        .filter(|b| matches!(verdict(player, &b.body), Verdict::Loses(_)))
        .filter(|b| gap(*b) < THREAT_RADIUS)
        .min_by(|a, b| gap(*a).total_cmp(&gap(*b)));

    if let Some(bot) = threat {
        let away = (player.pos - bot.body.pos).normalize_or_zero();
        // Directly on top of it: any direction beats standing still
        let away = if away == Vec2::ZERO { Vec2::X } else { away };
        let mut target = clamp_to_world(player.pos + away * FLEE_DISTANCE, world, margin);
        // Cornered: slide along the wall instead
        if distance(target, player.pos) < FLEE_DISTANCE * 0.5 {
            let slide = away.perp();
            target = clamp_to_world(player.pos + slide * FLEE_DISTANCE, world, margin);
        }
        return Some(Steering::Flee(target));
    }

    let prey = session
        .bots
        .iter()
        .filter(|b| matches!(verdict(player, &b.body), Verdict::Wins(_)))
        .min_by(|a, b| gap(*a).total_cmp(&gap(*b)));

    if let Some(bot) = prey {
        return Some(Steering::Chase(bot.body.pos));
    }

    // Nothing worth chasing: drift on a slow circle around the centre
    let center = world / 2.0;
    let angle = session.time_ticks as f32 * 0.01;
    let wander = center + Vec2::from_angle(angle) * world.min_element() * 0.25;
    Some(Steering::Wander(clamp_to_world(wander, world, margin)))
}
