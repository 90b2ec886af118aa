//! Circle overlap and the elemental interaction rule
//!
//! Resolution order for a touching pair:
//! 1. Same element: nothing happens.
//! 2. One element beats the other: the winner absorbs 20% of the loser.
//! 3. Unrelated elements: a side more than 1.5x the other's size absorbs 10%.
//! 4. Otherwise they bounce off with no state change.

use serde::{Deserialize, Serialize};

use super::entity::{Body, EntityId};
use crate::consts::*;
use crate::distance;

/// Why a pair resolved the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinKind {
    Elemental,
    Size,
}

/// Outcome of resolving one touching pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Same element
    Tie,
    /// Unrelated elements of comparable size
    Bounce,
    Defeat {
        winner: EntityId,
        loser: EntityId,
        kind: WinKind,
    },
}

impl Interaction {
    pub fn loser(&self) -> Option<EntityId> {
        match self {
            Interaction::Defeat { loser, .. } => Some(*loser),
            _ => None,
        }
    }
}

/// Symmetric circle-overlap test
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    distance(a.pos, b.pos) < a.radius() + b.radius()
}

/// How `a` fares against `b`, seen from `a`'s side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Tie,
    Bounce,
    Wins(WinKind),
    Loses(WinKind),
}

/// Judge a pair without touching either body
pub fn verdict(a: &Body, b: &Body) -> Verdict {
    if a.element == b.element {
        Verdict::Tie
    } else if a.element.beats(b.element) {
        Verdict::Wins(WinKind::Elemental)
    } else if b.element.beats(a.element) {
        Verdict::Loses(WinKind::Elemental)
    } else if a.size > b.size * SIZE_WIN_RATIO {
        Verdict::Wins(WinKind::Size)
    } else if b.size > a.size * SIZE_WIN_RATIO {
        Verdict::Loses(WinKind::Size)
    } else {
        Verdict::Bounce
    }
}

/// Apply the interaction rule to two touching bodies.
///
/// The winner's size is updated in place (its score follows, being derived);
/// the loser is left untouched so its last state can be rendered.
pub fn resolve(a: &mut Body, b: &mut Body) -> Interaction {
    let (winner, loser, kind) = match verdict(a, b) {
        Verdict::Tie => return Interaction::Tie,
        Verdict::Bounce => return Interaction::Bounce,
        Verdict::Wins(kind) => (a, b, kind),
        Verdict::Loses(kind) => (b, a, kind),
    };

    let fraction = match kind {
        WinKind::Elemental => ELEMENTAL_ABSORB,
        WinKind::Size => SIZE_ABSORB,
    };
    winner.absorb(loser.size, fraction);

    log::debug!(
        "{} ({}) defeats {} ({}) by {:?}; size now {:.2}",
        winner.name,
        winner.element,
        loser.name,
        loser.element,
        kind,
        winner.size
    );

    Interaction::Defeat {
        winner: winner.id,
        loser: loser.id,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::element::Element;
    use glam::Vec2;
    use proptest::prelude::*;

    fn body(id: u32, element: Element, size: f32, pos: Vec2) -> Body {
        Body::new(EntityId(id), format!("e{id}"), element, size, pos)
    }

    #[test]
    fn test_overlap_is_strict_and_symmetric() {
        let a = body(1, Element::Fire, 1.0, Vec2::new(0.0, 0.0));
        // radii 25 + 25 = 50
        let touching = body(2, Element::Air, 1.0, Vec2::new(50.0, 0.0));
        let inside = body(3, Element::Air, 1.0, Vec2::new(49.9, 0.0));
        assert!(!overlaps(&a, &touching));
        assert!(overlaps(&a, &inside));
        assert!(overlaps(&inside, &a));
    }

    #[test]
    fn test_same_element_is_noop() {
        let mut a = body(1, Element::Earth, 1.0, Vec2::ZERO);
        let mut b = body(2, Element::Earth, 9.0, Vec2::ZERO);
        assert_eq!(resolve(&mut a, &mut b), Interaction::Tie);
        assert_eq!(a.size, 1.0);
        assert_eq!(b.size, 9.0);
    }

    #[test]
    fn test_elemental_win_absorbs_twenty_percent() {
        let mut water = body(1, Element::Water, 1.0, Vec2::ZERO);
        let mut fire = body(2, Element::Fire, 3.0, Vec2::ZERO);
        let result = resolve(&mut fire, &mut water);
        assert_eq!(
            result,
            Interaction::Defeat {
                winner: EntityId(1),
                loser: EntityId(2),
                kind: WinKind::Elemental
            }
        );
        assert!((water.size - 1.6).abs() < 1e-6);
        assert_eq!(water.score(), 800);
        assert_eq!(fire.size, 3.0);
    }

    #[test]
    fn test_unrelated_elements_size_rule() {
        // Fire and Earth are unrelated
        let mut fire = body(1, Element::Fire, 1.0, Vec2::ZERO);
        let mut earth = body(2, Element::Earth, 1.4, Vec2::ZERO);
        assert_eq!(resolve(&mut fire, &mut earth), Interaction::Bounce);
        assert_eq!(fire.size, 1.0);
        assert_eq!(earth.size, 1.4);

        let mut earth = body(2, Element::Earth, 2.0, Vec2::ZERO);
        let result = resolve(&mut fire, &mut earth);
        assert_eq!(result.loser(), Some(EntityId(1)));
        assert!((earth.size - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_size_rule_boundary_is_strict() {
        let mut water = body(1, Element::Water, 1.5, Vec2::ZERO);
        let mut air = body(2, Element::Air, 1.0, Vec2::ZERO);
        assert_eq!(resolve(&mut water, &mut air), Interaction::Bounce);
    }

    #[test]
    fn test_verdict_elements_before_size() {
        let fire = body(1, Element::Fire, 9.0, Vec2::ZERO);
        let water = body(2, Element::Water, 1.0, Vec2::ZERO);
        let earth = body(3, Element::Earth, 1.0, Vec2::ZERO);
        assert_eq!(verdict(&fire, &water), Verdict::Loses(WinKind::Elemental));
        assert_eq!(verdict(&water, &fire), Verdict::Wins(WinKind::Elemental));
        assert_eq!(verdict(&fire, &earth), Verdict::Wins(WinKind::Size));
        assert_eq!(verdict(&earth, &earth), Verdict::Tie);
    }

    fn any_element() -> impl Strategy<Value = Element> {
        prop::sample::select(Element::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_resolution_is_order_independent(
            ea in any_element(), eb in any_element(),
            sa in 0.5f32..5.0, sb in 0.5f32..5.0,
        ) {
            let mut a1 = body(1, ea, sa, Vec2::ZERO);
            let mut b1 = body(2, eb, sb, Vec2::ZERO);
            let mut a2 = a1.clone();
            let mut b2 = b1.clone();
            let r1 = resolve(&mut a1, &mut b1);
            let r2 = resolve(&mut b2, &mut a2);
            prop_assert_eq!(r1, r2);
            prop_assert_eq!(a1.size, a2.size);
            prop_assert_eq!(b1.size, b2.size);
        }

        #[test]
        fn prop_sizes_never_shrink(
            ea in any_element(), eb in any_element(),
            sa in 0.5f32..5.0, sb in 0.5f32..5.0,
        ) {
            let mut a = body(1, ea, sa, Vec2::ZERO);
            let mut b = body(2, eb, sb, Vec2::ZERO);
            resolve(&mut a, &mut b);
            prop_assert!(a.size >= sa);
            prop_assert!(b.size >= sb);
        }
    }
}
