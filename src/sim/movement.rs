//! Per-tick entity motion
//!
//! Player: seeks the pointer target with momentum, clamps at the world edge.
//! Bot: walks at constant speed toward a wander waypoint, reflects its
//! bearing off the world edge.

use glam::Vec2;
use rand::Rng;

use super::entity::{Bot, Player};
use crate::clamp_to_world;
use crate::consts::BOT_WAYPOINT_REACHED;

/// Within this distance of the target the player coasts to a stop
pub const PLAYER_DEADZONE: f32 = 5.0;
/// Inside this distance the player brakes proportionally
pub const PLAYER_BRAKE_DISTANCE: f32 = 50.0;
/// Distance at which acceleration reaches its maximum
pub const PLAYER_ACCEL_RAMP: f32 = 200.0;
pub const PLAYER_MAX_ACCEL: f32 = 0.2;
pub const PLAYER_FRICTION: f32 = 0.8;
pub const PLAYER_STOP_SPEED: f32 = 0.1;

/// Size-scaled speed multiplier; bigger is slower, never below 0.6
#[inline]
pub fn speed_factor(size: f32) -> f32 {
    (1.3 / (0.8 + size * 0.2)).max(0.6)
}

/// Advance the player one tick toward its target
pub fn step_player(player: &mut Player, world: Vec2) {
    let to_target = player.target - player.body.pos;
    let dist = to_target.length();

    if dist > PLAYER_DEADZONE {
        let dir = to_target / dist;
        let base_speed = player.speed * speed_factor(player.body.size);
        let accel = PLAYER_MAX_ACCEL * (dist / PLAYER_ACCEL_RAMP).min(1.0);

        player.vel += (dir * base_speed - player.vel) * accel;

        if dist < PLAYER_BRAKE_DISTANCE {
            let brake = 1.0 - (PLAYER_BRAKE_DISTANCE - dist) / PLAYER_BRAKE_DISTANCE * 0.5;
            player.vel *= brake;
        }
    } else {
        player.vel *= PLAYER_FRICTION;
        if player.vel.x.abs() < PLAYER_STOP_SPEED && player.vel.y.abs() < PLAYER_STOP_SPEED {
            player.vel = Vec2::ZERO;
            return;
        }
    }

    player.body.pos += player.vel;
    player.body.pos = clamp_to_world(player.body.pos, world, player.body.radius());
}

/// Pick a fresh waypoint within `range` of the bot, inside the world
pub fn pick_waypoint(rng: &mut impl Rng, from: Vec2, range: f32, world: Vec2) -> Vec2 {
    let offset = Vec2::new(
        rng.random_range(-range..=range),
        rng.random_range(-range..=range),
    );
    clamp_to_world(from + offset, world, 0.0)
}

/// Advance a bot one tick along its wander path
pub fn step_bot(bot: &mut Bot, rng: &mut impl Rng, world: Vec2, range: f32, interval_ticks: u32) {
    bot.waypoint_age += 1;
    let to_waypoint = bot.waypoint - bot.body.pos;

    if bot.waypoint_age >= interval_ticks || to_waypoint.length() < BOT_WAYPOINT_REACHED {
        bot.waypoint = pick_waypoint(rng, bot.body.pos, range, world);
        bot.waypoint_age = 0;
    }

    // Bearing is taken before any re-pick, so a fresh waypoint steers from next tick
    let bearing = to_waypoint.y.atan2(to_waypoint.x);
    bot.body.pos += Vec2::from_angle(bearing) * bot.speed;

    let radius = bot.body.radius();
    let clamped = clamp_to_world(bot.body.pos, world, radius);
    if clamped != bot.body.pos {
        // Mirror the waypoint across the bot on each axis that hit a wall
        if clamped.x != bot.body.pos.x {
            bot.waypoint.x = clamped.x - (bot.waypoint.x - clamped.x);
        }
        if clamped.y != bot.body.pos.y {
            bot.waypoint.y = clamped.y - (bot.waypoint.y - clamped.y);
        }
        bot.waypoint = clamp_to_world(bot.waypoint, world, 0.0);
        bot.body.pos = clamped;
    }
}
