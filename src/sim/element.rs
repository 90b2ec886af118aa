//! The four elements and their strength cycle
//!
//! Fire beats Air, Water beats Fire, Earth beats Water, Air beats Earth.
//! Opposites (Fire/Earth, Water/Air) have no relation and fall back to size.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Air];

    /// The element this one defeats
    pub fn strong_against(self) -> Element {
        match self {
            Element::Fire => Element::Air,
            Element::Water => Element::Fire,
            Element::Earth => Element::Water,
            Element::Air => Element::Earth,
        }
    }

    #[inline]
    pub fn beats(self, other: Element) -> bool {
        self.strong_against() == other
    }

    /// Display color (CSS hex)
    pub fn color(self) -> &'static str {
        match self {
            Element::Fire => "#FF5733",
            Element::Water => "#3498DB",
            Element::Earth => "#8B4513",
            Element::Air => "#F0F0F0",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Air => "air",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Element {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Index into per-element stat arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Element::Fire => 0,
            Element::Water => 1,
            Element::Earth => 2,
            Element::Air => 3,
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
