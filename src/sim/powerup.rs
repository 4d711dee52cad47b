//! Missile power-up tiers
//!
//! Kills push a counter up and promote the tier; getting hit drops one tier.

use serde::{Deserialize, Serialize};

use super::sprite::TextureId;
use crate::tuning::PowerUpTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum PowerTier {
    #[default]
    Plain,
    Tier1,
    Tier2,
}

impl PowerTier {
    pub fn index(self) -> u8 {
        match self {
            PowerTier::Plain => 0,
            PowerTier::Tier1 => 1,
            PowerTier::Tier2 => 2,
        }
    }

    /// Highest tier the kill count qualifies for
    pub fn for_kills(kills: u32, tuning: &PowerUpTuning) -> Self {
        if kills >= tuning.tier2_kills {
            PowerTier::Tier2
        } else if kills >= tuning.tier1_kills {
            PowerTier::Tier1
        } else {
            PowerTier::Plain
        }
    }

    fn downgraded(self) -> Self {
        match self {
            PowerTier::Tier2 => PowerTier::Tier1,
            _ => PowerTier::Plain,
        }
    }
}

/// What the ship fires at a given tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loadout {
    pub texture: TextureId,
    /// Horizontal drift per frame (local frame)
    pub drift: f32,
    /// Fire two extra spinning missiles alongside the primary
    pub side_missiles: bool,
}

impl Loadout {
    pub fn for_tier(tier: PowerTier, tuning: &PowerUpTuning) -> Self {
        match tier {
            PowerTier::Plain => Self {
                texture: TextureId::Missile,
                drift: 0.0,
                side_missiles: false,
            },
            PowerTier::Tier1 => Self {
                texture: TextureId::PowerMissile1,
                drift: 0.0,
                side_missiles: false,
            },
            PowerTier::Tier2 => Self {
                texture: TextureId::PowerMissile2,
                drift: tuning.tier2_drift,
                side_missiles: true,
            },
        }
    }
}

/// Kill counter plus the tier it has unlocked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kills: u32,
    pub tier: PowerTier,
}

impl PowerUp {
    /// Count a kill. Returns the new tier if it changed.
    pub fn record_kill(&mut self, tuning: &PowerUpTuning) -> Option<PowerTier> {
        self.kills += 1;
        let earned = PowerTier::for_kills(self.kills, tuning);
        if earned > self.tier {
            self.tier = earned;
            Some(earned)
        } else {
            None
        }
    }

    /// Drop one tier after a hit. Returns the new tier if it changed.
    pub fn record_hit(&mut self, tuning: &PowerUpTuning) -> Option<PowerTier> {
        if self.tier == PowerTier::Plain {
            return None;
        }
        self.tier = self.tier.downgraded();
        self.kills = match self.tier {
            PowerTier::Tier1 => tuning.tier1_floor,
            _ => 0,
        };
        Some(self.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_promotion_thresholds() {
        let tuning = PowerUpTuning::default();
        let mut power = PowerUp::default();
        for _ in 0..3 {
            assert_eq!(power.record_kill(&tuning), None);
        }
        assert_eq!(power.record_kill(&tuning), Some(PowerTier::Tier1));
        for _ in 0..3 {
            power.record_kill(&tuning);
        }
        assert_eq!(power.tier, PowerTier::Tier1);
        assert_eq!(power.record_kill(&tuning), Some(PowerTier::Tier2));
        assert_eq!(power.kills, 8);
    }

    #[test]
    fn test_hit_drops_one_tier_and_resets_counter() {
        let tuning = PowerUpTuning::default();
        let mut power = PowerUp {
            kills: 12,
            tier: PowerTier::Tier2,
        };
        assert_eq!(power.record_hit(&tuning), Some(PowerTier::Tier1));
        assert_eq!(power.kills, 3);
        // Tier 1 is kept even though 3 kills would not earn it
        assert_eq!(power.record_kill(&tuning), None);
        assert_eq!(power.tier, PowerTier::Tier1);
        assert_eq!(power.record_hit(&tuning), Some(PowerTier::Plain));
        assert_eq!(power.kills, 0);
        assert_eq!(power.record_hit(&tuning), None);
    }

    #[test]
    fn test_tier2_loadout_adds_side_missiles() {
        let tuning = PowerUpTuning::default();
        let plain = Loadout::for_tier(PowerTier::Plain, &tuning);
        let top = Loadout::for_tier(PowerTier::Tier2, &tuning);
        assert!(!plain.side_missiles);
        assert_eq!(plain.drift, 0.0);
        assert!(top.side_missiles);
        assert_eq!(top.texture, TextureId::PowerMissile2);
    }

    proptest! {
        #[test]
        fn tier_stays_in_range(events in proptest::collection::vec(any::<bool>(), 0..200)) {
            let tuning = PowerUpTuning::default();
            let mut power = PowerUp::default();
            for kill in events {
                if kill {
                    power.record_kill(&tuning);
                } else {
                    power.record_hit(&tuning);
                }
                prop_assert!(power.tier.index() <= 2);
            }
        }

        #[test]
        fn tier_is_monotonic_without_hits(kills in 0u32..64) {
            let tuning = PowerUpTuning::default();
            let mut power = PowerUp::default();
            let mut last = power.tier;
            for _ in 0..kills {
                power.record_kill(&tuning);
                prop_assert!(power.tier >= last);
                last = power.tier;
            }
            prop_assert_eq!(power.tier, PowerTier::for_kills(kills, &tuning));
        }
    }
}
