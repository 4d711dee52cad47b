//! Game state and core simulation types
//!
//! Everything `simulate()` mutates lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::pool::SlotPool;
use super::powerup::{PowerTier, PowerUp};
use super::sprite::{Sprite, TextureId};
use crate::tuning::Tuning;

/// Half size of the square play field
pub const FIELD_HALF_EXTENT: f32 = 3.0;
/// Thickness of the border walls
pub const BORDER_THICKNESS: f32 = 0.2;
/// Ship spawn height
pub const SHIP_START_Y: f32 = -2.75;
pub const SHIP_SIZE: f32 = 0.25;
pub const INVADER_SIZE: f32 = 0.25;
pub const EXPLOSION_SIZE: f32 = 0.25;
/// Missiles and bombs share a tall thin shape
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(0.0625, 0.25);
pub const GAME_OVER_SIZE: Vec2 = Vec2::new(3.0, 1.5);

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Run ended, either by losing every life or clearing the last level
    GameOver,
}

/// The four walls around the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    Bottom = 0,
    Top = 1,
    Left = 2,
    Right = 3,
}

/// Things that happened during a tick, for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    MissileFired,
    BombDropped,
    InvaderDestroyed { pos: Vec2 },
    ShipHit { lives_left: u32 },
    PowerTierChanged { tier: PowerTier },
    SwarmSpedUp,
    LevelStarted { level: u32, invaders: usize },
    GameOver { victory: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,

    pub ship: Sprite,
    pub borders: [Sprite; 4],
    pub background: Sprite,
    pub explosion: Sprite,
    /// Frames left before the explosion is hidden
    pub explosion_frames: Option<u32>,
    pub game_over_banner: Sprite,
    pub missiles: SlotPool,
    pub bombs: SlotPool,
    pub invaders: Vec<Sprite>,

    pub live_invaders: u32,
    pub lives: u32,
    pub score: u64,
    /// Current level (1-based; 0 before the first level is loaded)
    pub level: u32,
    pub power: PowerUp,
    pub missile_cooldown: u32,
    pub bomb_cooldown: u32,
    pub invader_velocity: f32,
    pub phase: GamePhase,
    /// Simulated frames
    pub frame: u64,
    /// True once the last level has been cleared
    pub victory: bool,

    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh run. No invaders exist until the first level is loaded.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let h = FIELD_HALF_EXTENT;
        let span = 2.0 * h;
        let borders = [
            Sprite::new(TextureId::Border, 0.0, -h, span, BORDER_THICKNESS),
            Sprite::new(TextureId::Border, 0.0, h, span, BORDER_THICKNESS),
            Sprite::new(TextureId::Border, -h, 0.0, BORDER_THICKNESS, span),
            Sprite::new(TextureId::Border, h, 0.0, BORDER_THICKNESS, span),
        ];

        let mut explosion =
            Sprite::new(TextureId::Explosion, 0.0, 0.0, EXPLOSION_SIZE, EXPLOSION_SIZE);
        explosion.set_enabled(false);
        let mut game_over_banner =
            Sprite::new(TextureId::GameOver, 0.0, 0.0, GAME_OVER_SIZE.x, GAME_OVER_SIZE.y);
        game_over_banner.set_enabled(false);

        let missiles = SlotPool::new(
            tuning.num_missiles,
            Sprite::disabled(TextureId::Missile, PROJECTILE_SIZE.x, PROJECTILE_SIZE.y),
        );
        let bombs = SlotPool::new(
            tuning.num_bombs,
            Sprite::disabled(TextureId::Bomb, PROJECTILE_SIZE.x, PROJECTILE_SIZE.y),
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ship: Sprite::new(TextureId::Ship, 0.0, SHIP_START_Y, SHIP_SIZE, SHIP_SIZE),
            borders,
            background: Sprite::new(TextureId::Background, 0.0, 0.0, span, span),
            explosion,
            explosion_frames: None,
            game_over_banner,
            missiles,
            bombs,
            invaders: Vec::new(),
            live_invaders: 0,
            lives: tuning.initial_lives,
            score: 0,
            level: 0,
            power: PowerUp::default(),
            missile_cooldown: 0,
            bomb_cooldown: tuning.initial_bomb_cooldown,
            invader_velocity: tuning.invader_speed,
            phase: GamePhase::Playing,
            frame: 0,
            victory: false,
            events: Vec::new(),
            tuning,
        }
    }

    #[inline]
    pub fn border(&self, border: Border) -> &Sprite {
        &self.borders[border as usize]
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn push_event(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Highest level actually played (the counter runs one past the last
    /// level after a victory)
    pub fn reached_level(&self) -> u32 {
        self.level.min(self.tuning.max_level)
    }

    /// Number of enabled invader sprites
    pub fn count_live_invaders(&self) -> usize {
        self.invaders.iter().filter(|i| i.is_enabled()).count()
    }

    /// End the run and show the banner
    pub fn end_game(&mut self, victory: bool) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.victory = victory;
        self.game_over_banner.set_enabled(true);
        log::info!(
            "Game over ({}) at level {}, score {}",
            if victory { "victory" } else { "defeat" },
            self.level,
            self.score
        );
        self.push_event(GameEvent::GameOver { victory });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.lives, 10);
        assert_eq!(state.level, 0);
        assert_eq!(state.missiles.capacity(), 6);
        assert_eq!(state.bombs.capacity(), 2);
        assert_eq!(state.missiles.active_count(), 0);
        assert_eq!(state.bomb_cooldown, 50);
        assert!(!state.game_over_banner.is_enabled());
        assert!(!state.explosion.is_enabled());
        assert_eq!(state.border(Border::Left).position(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_ship_starts_clear_of_borders() {
        let state = GameState::new(1, Tuning::default());
        for border in &state.borders {
            assert!(!state.ship.collides_with(border));
        }
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut state = GameState::new(1, Tuning::default());
        state.end_game(false);
        state.end_game(true);
        assert!(state.is_game_over());
        assert!(!state.victory);
        assert!(state.game_over_banner.is_enabled());
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { victory: false }]);
        assert!(state.drain_events().is_empty());
    }
}
