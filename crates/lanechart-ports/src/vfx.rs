use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle class of an effect: bursts auto-expire, idle loops are latched per lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    Burst,
    Idle,
}

/// The closed effect catalog. Serialized under the identifiers used in project files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VfxEffect {
    #[serde(rename = "explode1")]
    Explode1,
    #[serde(rename = "explode2")]
    Explode2,
    #[serde(rename = "explode3")]
    Explode3,
    #[serde(rename = "wipeUp")]
    WipeUp,
    #[serde(rename = "wipeDown")]
    WipeDown,
    #[serde(rename = "wipeLeft")]
    WipeLeft,
    #[serde(rename = "wipeRight")]
    WipeRight,
    #[serde(rename = "light1")]
    Light1,
    #[serde(rename = "light2")]
    Light2,
    #[serde(rename = "light3")]
    Light3,
    #[serde(rename = "glitter1")]
    Glitter1,
    #[serde(rename = "glitter2")]
    Glitter2,
    #[serde(rename = "glitter3")]
    Glitter3,
    #[serde(rename = "heart1")]
    Heart1,
    #[serde(rename = "heart2")]
    Heart2,
    #[serde(rename = "heart3")]
    Heart3,
    #[serde(rename = "sparkle1")]
    Sparkle1,
    #[serde(rename = "sparkle2")]
    Sparkle2,
    #[serde(rename = "sparkle3")]
    Sparkle3,
    #[serde(rename = "flames1")]
    Flames1,
    #[serde(rename = "flames2")]
    Flames2,
    #[serde(rename = "flames3")]
    Flames3,
    #[serde(rename = "confetti1")]
    Confetti1,
    #[serde(rename = "confetti2")]
    Confetti2,
    #[serde(rename = "confetti3")]
    Confetti3,
}

struct CatalogEntry {
    effect: VfxEffect,
    id: &'static str,
    category: EffectCategory,
}

const fn burst(effect: VfxEffect, id: &'static str) -> CatalogEntry {
    CatalogEntry {
        effect,
        id,
        category: EffectCategory::Burst,
    }
}

const fn idle(effect: VfxEffect, id: &'static str) -> CatalogEntry {
    CatalogEntry {
        effect,
        id,
        category: EffectCategory::Idle,
    }
}

// Ordered as the enum; `VfxEffect as usize` indexes this table.
const CATALOG: [CatalogEntry; 25] = [
    burst(VfxEffect::Explode1, "explode1"),
    burst(VfxEffect::Explode2, "explode2"),
    burst(VfxEffect::Explode3, "explode3"),
    burst(VfxEffect::WipeUp, "wipeUp"),
    burst(VfxEffect::WipeDown, "wipeDown"),
    burst(VfxEffect::WipeLeft, "wipeLeft"),
    burst(VfxEffect::WipeRight, "wipeRight"),
    burst(VfxEffect::Light1, "light1"),
    burst(VfxEffect::Light2, "light2"),
    burst(VfxEffect::Light3, "light3"),
    burst(VfxEffect::Glitter1, "glitter1"),
    burst(VfxEffect::Glitter2, "glitter2"),
    burst(VfxEffect::Glitter3, "glitter3"),
    burst(VfxEffect::Heart1, "heart1"),
    burst(VfxEffect::Heart2, "heart2"),
    burst(VfxEffect::Heart3, "heart3"),
    idle(VfxEffect::Sparkle1, "sparkle1"),
    idle(VfxEffect::Sparkle2, "sparkle2"),
    idle(VfxEffect::Sparkle3, "sparkle3"),
    idle(VfxEffect::Flames1, "flames1"),
    idle(VfxEffect::Flames2, "flames2"),
    idle(VfxEffect::Flames3, "flames3"),
    idle(VfxEffect::Confetti1, "confetti1"),
    idle(VfxEffect::Confetti2, "confetti2"),
    idle(VfxEffect::Confetti3, "confetti3"),
];

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown effect: {0}")]
pub struct UnknownEffect(pub String);

impl VfxEffect {
    pub fn all() -> impl Iterator<Item = VfxEffect> {
        CATALOG.iter().map(|entry| entry.effect)
    }

    pub fn of_category(category: EffectCategory) -> impl Iterator<Item = VfxEffect> {
        CATALOG
            .iter()
            .filter(move |entry| entry.category == category)
            .map(|entry| entry.effect)
    }

    pub fn category(self) -> EffectCategory {
        CATALOG[self as usize].category
    }

    pub fn id(self) -> &'static str {
        CATALOG[self as usize].id
    }

    pub fn is_burst(self) -> bool {
        self.category() == EffectCategory::Burst
    }

    pub fn is_idle(self) -> bool {
        self.category() == EffectCategory::Idle
    }
}

impl FromStr for VfxEffect {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .find(|entry| entry.id == s)
            .map(|entry| entry.effect)
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}

impl fmt::Display for VfxEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
