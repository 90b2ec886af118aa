//! Transient visual effects driven by the simulation tick
//!
//! Effects are cosmetic: nothing here feeds back into gameplay. Each effect
//! counts `elapsed` up by one per tick and is purged the tick it reaches
//! `duration`. Staggered sequences (the player death burst) go through a
//! tick-keyed queue instead of wall-clock timers.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::element::Element;

/// Maximum live particles across all explosions
pub const MAX_PARTICLES: usize = 1024;

pub const WHITE: &str = "#FFFFFF";
pub const DEATH_RED: &str = "#ff0000";
/// Shock ring reach (half a typical 1280px viewport)
pub const DEATH_RING_MAX_RADIUS: f32 = 640.0;
/// Lifetime of the dead-player echo
pub const DEAD_PLAYER_ECHO_TICKS: u32 = 5000;

/// A kinematic explosion particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub color: String,
}

/// Effect-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    Explosion {
        radius: f32,
        max_radius: f32,
        particles: Vec<Particle>,
    },
    Text {
        text: String,
        font_size: f32,
        bold: bool,
    },
    Growth {
        radius: f32,
    },
    Flash {
        radius: f32,
    },
    Ring {
        radius: f32,
        max_radius: f32,
        line_width: f32,
    },
    DeadPlayerEcho {
        size: f32,
        element: Element,
    },
}

/// One live effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub pos: Vec2,
    pub color: String,
    pub elapsed: u32,
    pub duration: u32,
    pub kind: EffectKind,
}

impl Effect {
    fn new(pos: Vec2, color: &str, duration: u32, kind: EffectKind) -> Self {
        Self {
            pos,
            color: color.to_string(),
            elapsed: 0,
            duration,
            kind,
        }
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            1.0
        } else {
            (self.elapsed as f32 / self.duration as f32).min(1.0)
        }
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.progress()
    }

    /// Interpolated radius for ring-like effects
    pub fn current_radius(&self) -> Option<f32> {
        let t = self.progress();
        match &self.kind {
            EffectKind::Explosion {
                radius, max_radius, ..
            }
            | EffectKind::Ring {
                radius, max_radius, ..
            } => Some(radius + (max_radius - radius) * t),
            EffectKind::Growth { radius } | EffectKind::Flash { radius } => Some(*radius),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn particle_count(&self) -> usize {
        match &self.kind {
            EffectKind::Explosion { particles, .. } => particles.len(),
            _ => 0,
        }
    }
}

/// An effect waiting for its start tick
#[derive(Debug, Clone)]
struct Scheduled {
    due: u64,
    effect: Effect,
}

/// Owns every live and pending effect
#[derive(Debug, Clone, Default)]
pub struct Animations {
    active: Vec<Effect>,
    pending: Vec<Scheduled>,
    /// Ticks advanced so far (drives the pending queue)
    clock: u64,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance all effects by one tick
    pub fn advance(&mut self) {
        self.clock += 1;

        for effect in &mut self.active {
            effect.elapsed += 1;
            if effect.is_finished() {
                continue;
            }
            let alpha = 1.0 - effect.elapsed as f32 / effect.duration as f32;
            if let EffectKind::Explosion { particles, .. } = &mut effect.kind {
                for p in particles.iter_mut() {
                    p.pos += p.vel;
                    p.alpha = alpha;
                }
            }
        }
        self.active.retain(|e| !e.is_finished());

        // Released after aging: an effect queued with `delay` trails one
        // pushed at the same moment by exactly `delay` ticks
        let clock = self.clock;
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= clock {
                let s = self.pending.remove(i);
                self.active.push(s.effect);
            } else {
                i += 1;
            }
        }
    }

    /// Active effects in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Effects still waiting in the queue
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
        self.pending.clear();
    }

    pub(crate) fn push(&mut self, effect: Effect) {
        self.active.push(effect);
    }

    /// Queue an effect to appear `delay` ticks from now (0 = immediately)
    pub(crate) fn schedule(&mut self, delay: u32, effect: Effect) {
        if delay == 0 {
            self.push(effect);
        } else {
            self.pending.push(Scheduled {
                due: self.clock + delay as u64,
                effect,
            });
        }
    }

    /// Particles alive or already queued
    fn live_particles(&self) -> usize {
        let active: usize = self.active.iter().map(Effect::particle_count).sum();
        let queued: usize = self.pending.iter().map(|s| s.effect.particle_count()).sum();
        active + queued
    }

    fn particle_budget(&self, wanted: usize) -> usize {
        wanted.min(MAX_PARTICLES.saturating_sub(self.live_particles()))
    }

    // === Emitters ===

    /// Burst + label where an entity was defeated
    pub(crate) fn emit_defeat(
        &mut self,
        rng: &mut impl Rng,
        pos: Vec2,
        radius: f32,
        element: Element,
    ) {
        let color = element.color();
        let count = self.particle_budget(20);
        let particles = burst(rng, pos, color, count, 1.0..4.0, 2.0..7.0);
        self.push(Effect::new(
            pos,
            color,
            30,
            EffectKind::Explosion {
                radius,
                max_radius: radius * 2.0,
                particles,
            },
        ));
        self.push(Effect::new(
            pos - Vec2::new(0.0, 50.0),
            color,
            60,
            EffectKind::Text {
                text: format!("{element} defeated!"),
                font_size: 16.0,
                bold: false,
            },
        ));
    }

    /// Pulse around an entity that just absorbed another
    pub(crate) fn emit_growth(&mut self, pos: Vec2, radius: f32, element: Element) {
        self.push(Effect::new(
            pos,
            element.color(),
            20,
            EffectKind::Growth { radius },
        ));
    }

    /// Full player death sequence; `tick_delay` converts ms to ticks
    pub(crate) fn emit_player_death(
        &mut self,
        rng: &mut impl Rng,
        pos: Vec2,
        size: f32,
        radius: f32,
        element: Element,
        tick_delay: impl Fn(u32) -> u32,
    ) {
        let color = element.color();

        self.push(Effect::new(
            pos,
            WHITE,
            15,
            EffectKind::Flash {
                radius: radius * 5.0,
            },
        ));

        let count = self.particle_budget(50);
        let particles = burst(rng, pos, color, count, 3.0..9.0, 4.0..12.0);
        self.push(Effect::new(
            pos,
            color,
            90,
            EffectKind::Explosion {
                radius: radius * 1.5,
                max_radius: radius * 6.0,
                particles,
            },
        ));

        for wave in 0..4u32 {
            let wave_color = if wave % 2 == 0 { color } else { WHITE };
            let count = self.particle_budget(40);
            let particles = burst(rng, pos, wave_color, count, 2.0..7.0, 3.0..10.0);
            let scale = (wave + 1) as f32;
            self.schedule(
                tick_delay(wave * 200),
                Effect::new(
                    pos,
                    wave_color,
                    80,
                    EffectKind::Explosion {
                        radius: radius * scale * 0.8,
                        max_radius: radius * scale * 2.0,
                        particles,
                    },
                ),
            );
        }

        for ring in 0..3u32 {
            let ring_color = if ring % 2 == 0 { color } else { WHITE };
            self.schedule(
                tick_delay(ring * 300),
                Effect::new(
                    pos,
                    ring_color,
                    90,
                    EffectKind::Ring {
                        radius: 10.0,
                        max_radius: DEATH_RING_MAX_RADIUS,
                        line_width: 8.0 - ring as f32 * 2.0,
                    },
                ),
            );
        }

        let text_delay = tick_delay(500);
        self.schedule(
            text_delay,
            Effect::new(
                pos - Vec2::new(0.0, 80.0),
                DEATH_RED,
                180,
                EffectKind::Text {
                    text: "YOU DIED".to_string(),
                    font_size: 48.0,
                    bold: true,
                },
            ),
        );
        self.schedule(
            text_delay,
            Effect::new(
                pos + Vec2::new(0.0, 50.0),
                color,
                180,
                EffectKind::Text {
                    text: format!("{element} has been extinguished!"),
                    font_size: 24.0,
                    bold: false,
                },
            ),
        );

        // Keeps the player's last frame on screen behind the scoreboard
        self.push(Effect::new(
            pos,
            color,
            DEAD_PLAYER_ECHO_TICKS,
            EffectKind::DeadPlayerEcho { size, element },
        ));
    }
}

fn burst(
    rng: &mut impl Rng,
    pos: Vec2,
    color: &str,
    count: usize,
    speed: std::ops::Range<f32>,
    size: std::ops::Range<f32>,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(speed.clone());
            Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                size: rng.random_range(size.clone()),
                alpha: 1.0,
                color: color.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_effect_purged_when_elapsed_reaches_duration() {
        let mut anims = Animations::new();
        anims.emit_growth(Vec2::ZERO, 25.0, Element::Fire);
        for _ in 0..19 {
            anims.advance();
        }
        assert_eq!(anims.len(), 1);
        assert_eq!(anims.iter().next().map(|e| e.elapsed), Some(19));
        anims.advance();
        assert!(anims.is_empty());
    }

    #[test]
    fn test_explosion_particles_move_and_fade() {
        let mut anims = Animations::new();
        anims.emit_defeat(&mut rng(), Vec2::new(100.0, 100.0), 30.0, Element::Water);
        assert_eq!(anims.len(), 2);

        anims.advance();
        let explosion = anims
            .iter()
            .find(|e| matches!(e.kind, EffectKind::Explosion { .. }))
            .unwrap();
        assert!((explosion.current_radius().unwrap() - 31.0).abs() < 1e-4);
        assert!((explosion.alpha() - 29.0 / 30.0).abs() < 1e-6);
        if let EffectKind::Explosion { particles, .. } = &explosion.kind {
            assert_eq!(particles.len(), 20);
            for p in particles {
                assert!((p.pos - Vec2::new(100.0, 100.0)).length() >= 1.0 - 1e-4);
                assert!((p.alpha - 29.0 / 30.0).abs() < 1e-6);
            }
        }

        let text = anims
            .iter()
            .find_map(|e| match &e.kind {
                EffectKind::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(text, "water defeated!");

        for _ in 0..29 {
            anims.advance();
        }
        // Explosion gone at 30, text lives to 60
        assert_eq!(anims.len(), 1);
    }

    #[test]
    fn test_death_sequence_is_staggered() {
        let mut anims = Animations::new();
        // 60 Hz: 200ms = 12 ticks, 300ms = 18, 500ms = 30
        let ticks = |ms: u32| crate::ms_to_ticks(ms, 60);
        anims.emit_player_death(&mut rng(), Vec2::ZERO, 1.0, 25.0, Element::Fire, ticks);

        // flash, big explosion, wave 0, ring 0, echo
        assert_eq!(anims.len(), 5);
        assert_eq!(anims.pending_len(), 3 + 2 + 2);

        for _ in 0..12 {
            anims.advance();
        }
        assert_eq!(anims.pending_len(), 2 + 2 + 2);

        for _ in 0..18 {
            anims.advance();
        }
        // Last wave and last ring (both at 36) still queued
        assert_eq!(anims.pending_len(), 2);

        for _ in 0..6 {
            anims.advance();
        }
        assert_eq!(anims.pending_len(), 0);

        let echo = anims
            .iter()
            .find(|e| matches!(e.kind, EffectKind::DeadPlayerEcho { .. }))
            .unwrap();
        assert_eq!(echo.duration, DEAD_PLAYER_ECHO_TICKS);
    }

    #[test]
    fn test_scheduled_effects_trail_by_exact_delay() {
        let mut anims = Animations::new();
        let ticks = |ms: u32| crate::ms_to_ticks(ms, 60);
        anims.emit_player_death(&mut rng(), Vec2::ZERO, 1.0, 25.0, Element::Fire, ticks);
        for _ in 0..20 {
            anims.advance();
        }

        let big = anims
            .iter()
            .find(|e| matches!(e.kind, EffectKind::Explosion { .. }) && e.duration == 90)
            .map(|e| e.elapsed)
            .unwrap();
        let mut waves: Vec<u32> = anims
            .iter()
            .filter(|e| matches!(e.kind, EffectKind::Explosion { .. }) && e.duration == 80)
            .map(|e| e.elapsed)
            .collect();
        waves.sort_unstable_by(|a, b| b.cmp(a));

        assert_eq!(big, 20);
        // Wave 0 is immediate, wave 1 is 12 ticks (200ms) behind
        assert_eq!(waves, [20, 8]);

        let ring1 = anims
            .iter()
            .filter(|e| matches!(e.kind, EffectKind::Ring { .. }))
            .map(|e| e.elapsed)
            .min()
            .unwrap();
        assert_eq!(big - ring1, 18);
    }

    #[test]
    fn test_particle_budget_caps_bursts() {
        let mut anims = Animations::new();
        let mut r = rng();
        for _ in 0..(MAX_PARTICLES / 20 + 5) {
            anims.emit_defeat(&mut r, Vec2::ZERO, 25.0, Element::Air);
        }
        assert!(anims.live_particles() <= MAX_PARTICLES);
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut anims = Animations::new();
        anims.emit_player_death(&mut rng(), Vec2::ZERO, 1.0, 25.0, Element::Earth, |ms| ms / 10);
        anims.clear();
        assert!(anims.is_empty());
        assert_eq!(anims.pending_len(), 0);
    }
}
