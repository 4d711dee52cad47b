//! Invaderers - a Space Invaders style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sprites, weapons, swarm, levels)
//! - `renderer`: WebGPU sprite rendering
//! - `tuning`: Data-driven game balance
//! - `settings` / `highscores`: Player preferences and leaderboard

pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod storage;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep; the game logic is tuned per 60 Hz frame
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}
