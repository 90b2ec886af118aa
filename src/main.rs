//! WAFE Arena entry point
//!
//! Native builds run a headless session with the autopilot steering and
//! print the leaderboard at the end. The browser build goes through
//! `wafe_arena::web::WasmSession` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::env;

    use wafe_arena::persistence::{FileStore, KeyValueStore, MemoryStore};
    use wafe_arena::sim::{SessionPhase, Steering, autopilot};
    use wafe_arena::{HighScores, Session, SimConfig};

    /// Default run length: two minutes of game time at 60 Hz
    const DEFAULT_TICKS: u64 = 7200;

    fn open_store() -> Box<dyn KeyValueStore> {
        let dir = env::var("WAFE_DATA_DIR").unwrap_or_else(|_| "wafe-data".to_string());
        match FileStore::open(&dir) {
            Ok(store) => {
                log::info!("Using data directory {}", dir);
                Box::new(store)
            }
            Err(e) => {
                log::warn!("Data directory {} unusable ({}), scores won't persist", dir, e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = env::args().skip(1);
        let name = args.next().unwrap_or_else(|| "Player".to_string());
        let max_ticks = match args.next() {
            Some(raw) => raw.parse::<u64>()?,
            None => DEFAULT_TICKS,
        };

        let config = SimConfig::load_or_default();
        let mut session = Session::new(config, open_store())?;
        session.start(&name)?;

        let mut fled = 0u64;
        let mut chased = 0u64;
        while session.is_playing() && session.elapsed_ticks() < max_ticks {
            match autopilot::suggest(&session) {
                Some(Steering::Flee(t)) => {
                    fled += 1;
                    session.set_player_target(t.x, t.y);
                }
                Some(Steering::Chase(t)) => {
                    chased += 1;
                    session.set_player_target(t.x, t.y);
                }
                Some(Steering::Wander(t)) => session.set_player_target(t.x, t.y),
                None => {}
            }
            session.step();

            if session.time_ticks % 600 == 0 {
                log::info!(
                    "t={}s score={} bots_defeated={}",
                    session.time_ticks / 60,
                    session.score(),
                    session.player.stats.bots_defeated
                );
            }
        }

        let snap = session.snapshot();
        match snap.phase {
            SessionPhase::Over(outcome) => {
                log::info!("Finished: {:?} after {} ms", outcome, snap.elapsed_ms)
            }
            _ => log::info!("Stopped after {} ticks", snap.elapsed_ticks),
        }
        log::info!("Autopilot fled {} ticks, chased {} ticks", fled, chased);

        println!(
            "{} ({}) scored {} - {} bots defeated",
            snap.player.name, snap.player.element, snap.score, snap.stats.bots_defeated
        );
        if let Some(rank) = snap.rank {
            println!("New high score, rank #{rank}");
        }
        print_scores(&session.high_scores());
        Ok(())
    }

    fn print_scores(scores: &HighScores) {
        if scores.is_empty() {
            println!("No high scores yet");
            return;
        }
        println!("\nHigh scores:");
        for (i, e) in scores.entries.iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:<6} {:>7}  size {:.2}",
                i + 1,
                e.name,
                e.element,
                e.score,
                e.size
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("WAFE Arena (native, headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WasmSession, this is just to satisfy the compiler
}
