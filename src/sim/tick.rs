//! Fixed-interval simulation tick
//!
//! One call advances the whole world synchronously:
//! input → movement → collisions → population → effects.
//! The tick never fails; malformed entity data is logged and repaired.

use super::collision::{Interaction, WinKind, overlaps, resolve};
use super::movement::{step_bot, step_player};
use super::population::{self, Contacts};
use super::state::{Session, SessionPhase};

/// Advance the session by one tick
pub fn tick(session: &mut Session) {
    session.time_ticks += 1;

    if session.phase == SessionPhase::NotStarted {
        session.animations.advance();
        return;
    }

    let anomalies = population::sweep_anomalies(session);
    if anomalies > 0 {
        log::warn!("Tick {}: repaired {} malformed entities", session.time_ticks, anomalies);
    }

    // Input is only ever applied here, between ticks
    let target = session.take_target();
    let world = session.config.world();

    if session.is_playing() {
        if let Some(target) = target {
            session.player.target = target;
        }
        step_player(&mut session.player, world);
    }

    let range = session.config.bot_waypoint_range;
    let interval = session.config.bot_waypoint_interval_ticks();
    for bot in &mut session.bots {
        step_bot(bot, &mut session.rng, world, range, interval);
    }

    let contacts = resolve_contacts(session);
    population::settle(session, contacts);

    session.animations.advance();
}

/// Scan every unique pair once and apply the interaction rule.
///
/// Bot i is checked against every later bot, then against the player. An
/// entity defeated earlier in the scan takes no further part this tick.
fn resolve_contacts(session: &mut Session) -> Contacts {
    let mut contacts = Contacts::default();
    let now = session.time_ticks;
    let mut player_active = session.is_playing() && !session.player.is_invulnerable(now);
    let player_id = session.player.body.id;

    for i in 0..session.bots.len() {
        for j in (i + 1)..session.bots.len() {
            let (left, right) = session.bots.split_at_mut(j);
            let a = &mut left[i].body;
            let b = &mut right[0].body;
            if contacts.is_defeated(a.id) || contacts.is_defeated(b.id) || !overlaps(a, b) {
                continue;
            }
            if let Interaction::Defeat { loser, .. } = resolve(a, b) {
                let lost = if loser == a.id { &*a } else { &*b };
                session
                    .animations
                    .emit_defeat(&mut session.rng, lost.pos, lost.radius(), lost.element);
                contacts.defeated.push(loser);
            }
        }

        if !player_active {
            continue;
        }
        let bot = &mut session.bots[i].body;
        if contacts.is_defeated(bot.id) || !overlaps(&session.player.body, bot) {
            continue;
        }
        let player = &mut session.player;
        match resolve(&mut player.body, bot) {
            Interaction::Defeat { loser, kind, .. } if loser == player_id => {
                log::info!(
                    "Player defeated by {} ({}) via {}",
                    bot.name,
                    bot.element,
                    kind_label(kind)
                );
                contacts.player_defeated_by = Some(bot.element);
                player_active = false;
            }
            Interaction::Defeat { loser, .. } => {
                session
                    .animations
                    .emit_defeat(&mut session.rng, bot.pos, bot.radius(), bot.element);
                session.animations.emit_growth(
                    player.body.pos,
                    player.body.radius(),
                    player.body.element,
                );
                player.stats.record_kill(bot.element);
                contacts.defeated.push(loser);
            }
            Interaction::Tie | Interaction::Bounce => {}
        }
    }

    contacts
}

fn kind_label(kind: WinKind) -> &'static str {
    match kind {
        WinKind::Elemental => "element",
        WinKind::Size => "size",
    }
}
