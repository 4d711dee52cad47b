//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-balanced from a JSON
//! file without touching the simulation. Missing fields fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};

/// Power-up tier thresholds (kill counts)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerUpTuning {
    /// Kills needed to reach tier 1
    pub tier1_kills: u32,
    /// Kills needed to reach tier 2
    pub tier2_kills: u32,
    /// Kill count restored when a hit drops the player back to tier 1
    pub tier1_floor: u32,
    /// Sideways drift per frame of tier-2 missiles
    pub tier2_drift: f32,
    /// Spin per frame of the tier-2 side missiles (radians)
    pub side_spin: f32,
    /// Horizontal offset of the side missiles from the ship
    pub side_offset: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            tier1_kills: 4,
            tier2_kills: 8,
            tier1_floor: 3,
            tier2_drift: 0.02,
            side_spin: 0.05,
            side_offset: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub ship_speed: f32,
    pub missile_speed: f32,
    pub bomb_speed: f32,
    /// Frames between missile volleys
    pub missile_cooldown: u32,
    /// Frames between bombs
    pub bomb_cooldown: u32,
    /// Bomb cooldown after a bomb hits the ship
    pub bomb_cooldown_after_hit: u32,
    /// Bomb cooldown at the start of a run
    pub initial_bomb_cooldown: u32,
    /// Swarm speed at the start of each level
    pub invader_speed: f32,
    /// How far the swarm drops when it bounces off a side border
    pub invader_step_down: f32,
    /// Remaining invader count that triggers the speed-up
    pub speedup_remaining: u32,
    pub speedup_factor: f32,
    /// Extra horizontal reach when picking a bomber above the ship
    pub bomb_target_margin: f32,
    /// Frames the explosion stays visible
    pub explosion_frames: u32,
    pub initial_lives: u32,
    /// Last level; clearing it wins the run
    pub max_level: u32,
    pub num_missiles: usize,
    pub num_bombs: usize,
    pub power_up: PowerUpTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_speed: 0.05,
            missile_speed: 0.2,
            bomb_speed: 0.2,
            missile_cooldown: 5,
            bomb_cooldown: 30,
            bomb_cooldown_after_hit: 50,
            initial_bomb_cooldown: 50,
            invader_speed: 0.01,
            invader_step_down: 0.1,
            speedup_remaining: 4,
            speedup_factor: 4.0,
            bomb_target_margin: 0.3,
            explosion_frames: 5,
            initial_lives: 10,
            max_level: 2,
            num_missiles: 6,
            num_bombs: 2,
            power_up: PowerUpTuning::default(),
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "initial_lives": 3, "power_up": { "side_spin": 1.0 } }"#)
            .unwrap();
        assert_eq!(tuning.initial_lives, 3);
        assert_eq!(tuning.max_level, 2);
        assert_eq!(tuning.power_up.side_spin, 1.0);
        assert_eq!(tuning.power_up.tier2_kills, 8);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tuning::from_json("{ initial_lives: }").is_err());
    }
}
