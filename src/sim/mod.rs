//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One frame per `simulate()` call
//! - Seeded RNG only
//! - Stable iteration order (slot and invader indices)
//! - No rendering or platform dependencies

pub mod formation;
pub mod pool;
pub mod powerup;
pub mod sprite;
pub mod state;
pub mod tick;

pub use formation::{BuiltinFormations, DirFormations, Formation, FormationSource, GridCell};
pub use pool::SlotPool;
pub use powerup::{Loadout, PowerTier, PowerUp};
pub use sprite::{Sprite, TextureId};
pub use state::{Border, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, load_next_level, new_game, simulate};
