//! Fixed timestep simulation tick
//!
//! One call to [`simulate`] advances the game by exactly one frame.

use glam::Vec2;
use rand::Rng;

use super::formation::FormationSource;
use super::powerup::Loadout;
use super::sprite::{Sprite, TextureId};
use super::state::{Border, FIELD_HALF_EXTENT, GameEvent, GamePhase, GameState, INVADER_SIZE};
use crate::tuning::Tuning;

/// Where a new missile appears relative to the ship
const MISSILE_SPAWN_OFFSET: f32 = 0.5;
/// Where a new bomb appears relative to its invader
const BOMB_SPAWN_OFFSET: f32 = -0.25;
/// Consecutive empty formations skipped before the run ends
const MAX_EMPTY_LEVELS: u32 = 16;
/// Projectiles this far outside the field are freed even without touching a border
const LOST_PROJECTILE_DISTANCE: f32 = FIELD_HALF_EXTENT + 1.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held move keys
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire key went down this frame
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the ship plays itself
    pub autopilot: bool,
}

/// What happened to a missile this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissileOutcome {
    Flying,
    HitInvader(usize),
    OffField,
}

/// Start a run: fresh state with the first level loaded
pub fn new_game(seed: u64, tuning: Tuning, levels: &dyn FormationSource) -> GameState {
    let mut state = GameState::new(seed, tuning);
    load_next_level(&mut state, levels);
    state
}

/// Advance the game state by one frame
pub fn simulate(state: &mut GameState, input: &TickInput, levels: &dyn FormationSource) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.frame += 1;

    let mut input = input.clone();
    if input.autopilot {
        steer_autopilot(state, &mut input);
    }
    let input = &input;

    move_ship(state, input);
    update_powerups(state);
    fire_missiles(state, input);
    fire_bombs(state);
    move_missiles(state, levels);
    move_bombs(state);
    move_invaders(state);
}

/// Track the closest invader and shoot whenever one is overhead
fn steer_autopilot(state: &GameState, input: &mut TickInput) {
    let ship_x = state.ship.position().x;
    let target = state
        .invaders
        .iter()
        .filter(|i| i.is_enabled())
        .map(|i| i.position().x)
        .min_by(|a, b| {
            (a - ship_x)
                .abs()
                .partial_cmp(&(b - ship_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(x) = target {
        let dead_zone = state.tuning.ship_speed;
        input.left = x < ship_x - dead_zone;
        input.right = x > ship_x + dead_zone;
    }

    let overhead = state
        .invaders
        .iter()
        .any(|i| i.is_enabled() && i.is_above(&state.ship, 0.0));
    input.fire = overhead && state.missile_cooldown == 0;
}

/// Step the ship; a step that would overlap a border is undone.
/// Left wins over right when both are held.
fn move_ship(state: &mut GameState, input: &TickInput) {
    let speed = state.tuning.ship_speed;
    let horizontal = if input.left {
        Some((-speed, Border::Left))
    } else if input.right {
        Some((speed, Border::Right))
    } else {
        None
    };
    if let Some((dx, border)) = horizontal {
        step_ship(state, dx, 0.0, border);
    }
    if input.up {
        step_ship(state, 0.0, speed, Border::Top);
    }
    if input.down {
        step_ship(state, 0.0, -speed, Border::Bottom);
    }
}

fn step_ship(state: &mut GameState, dx: f32, dy: f32, border: Border) {
    state.ship.translate(dx, dy);
    if state.ship.collides_with(state.border(border)) {
        state.ship.translate(-dx, -dy);
    }
}

/// Keep every missile slot dressed for the current tier
fn update_powerups(state: &mut GameState) {
    let loadout = Loadout::for_tier(state.power.tier, &state.tuning.power_up);
    for missile in state.missiles.iter_mut() {
        missile.swap_texture(loadout.texture);
        if !loadout.side_missiles {
            missile.spin = 0.0;
        }
    }
}

fn fire_missiles(state: &mut GameState, input: &TickInput) {
    if state.missile_cooldown > 0 {
        state.missile_cooldown -= 1;
        return;
    }
    if !input.fire {
        return;
    }

    let loadout = Loadout::for_tier(state.power.tier, &state.tuning.power_up);
    let ship = state.ship.clone();

    let Some((_, missile)) = state.missiles.spawn() else {
        log::debug!("missile pool exhausted");
        return;
    };
    missile.set_relative(&ship, 0.0, MISSILE_SPAWN_OFFSET);
    missile.spin = 0.0;
    missile.swap_texture(loadout.texture);
    state.missile_cooldown = state.tuning.missile_cooldown;
    state.push_event(GameEvent::MissileFired);

    if loadout.side_missiles {
        let offset = state.tuning.power_up.side_offset;
        let spin = state.tuning.power_up.side_spin;
        for (dx, spin) in [(offset, -spin), (-offset, spin)] {
            if let Some((_, side)) = state.missiles.spawn() {
                side.set_relative(&ship, dx, MISSILE_SPAWN_OFFSET);
                side.spin = spin;
                side.swap_texture(loadout.texture);
            }
        }
    }
}

/// Pick one invader above the ship to drop a bomb. The scan runs from a
/// random index to the end of the swarm without wrapping.
fn fire_bombs(state: &mut GameState) {
    if state.bomb_cooldown > 0 {
        state.bomb_cooldown -= 1;
        return;
    }

    let count = state.invaders.len();
    if count == 0 {
        return;
    }

    let margin = state.tuning.bomb_target_margin;
    let start = state.rng().random_range(0..count);
    let bomber = (start..count).find(|&j| {
        let invader = &state.invaders[j];
        invader.is_enabled() && invader.is_above(&state.ship, margin)
    });

    let Some(j) = bomber else {
        return;
    };
    let invader = state.invaders[j].clone();
    match state.bombs.spawn() {
        Some((_, bomb)) => {
            bomb.set_relative(&invader, 0.0, BOMB_SPAWN_OFFSET);
            state.bomb_cooldown = state.tuning.bomb_cooldown;
            state.push_event(GameEvent::BombDropped);
        }
        None => log::debug!("bomb pool exhausted"),
    }
}

fn is_lost(sprite: &Sprite) -> bool {
    sprite.position().abs().max_element() > LOST_PROJECTILE_DISTANCE
}

fn missile_outcome(missile: &Sprite, invaders: &[Sprite], borders: &[Sprite; 4]) -> MissileOutcome {
    if let Some(j) = invaders
        .iter()
        .position(|inv| inv.is_enabled() && missile.collides_with(inv))
    {
        return MissileOutcome::HitInvader(j);
    }

    let off_field = [Border::Top, Border::Left, Border::Right]
        .iter()
        .any(|&b| missile.collides_with(&borders[b as usize]));
    if off_field || is_lost(missile) {
        MissileOutcome::OffField
    } else {
        MissileOutcome::Flying
    }
}

/// Hide the explosion once it has been visible long enough
fn update_explosion(state: &mut GameState) {
    if let Some(frames) = state.explosion_frames {
        let frames = frames + 1;
        if frames >= state.tuning.explosion_frames {
            state.explosion.set_enabled(false);
            state.explosion_frames = None;
        } else {
            state.explosion_frames = Some(frames);
        }
    }
}

fn move_missiles(state: &mut GameState, levels: &dyn FormationSource) {
    update_explosion(state);

    let drift = Loadout::for_tier(state.power.tier, &state.tuning.power_up).drift;
    let speed = state.tuning.missile_speed;

    for i in 0..state.missiles.capacity() {
        let outcome = match state.missiles.get_mut(i) {
            Some(missile) if missile.is_enabled() => {
                missile.translate(drift, speed);
                let spin = missile.spin;
                missile.rotate(spin);
                missile_outcome(missile, &state.invaders, &state.borders)
            }
            _ => continue,
        };

        match outcome {
            MissileOutcome::Flying => {}
            MissileOutcome::OffField => state.missiles.despawn(i),
            MissileOutcome::HitInvader(j) => {
                let invader = &mut state.invaders[j];
                invader.set_enabled(false);
                let pos = invader.position();
                state.explosion.set_relative(&state.invaders[j], 0.0, 0.0);
                state.explosion.set_enabled(true);
                state.explosion_frames = Some(0);
                state.missiles.despawn(i);
                on_hit_invaderer(state, levels, pos);
            }
        }
    }
}

fn move_bombs(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    let speed = state.tuning.bomb_speed;
    for i in 0..state.bombs.capacity() {
        let Some(bomb) = state.bombs.get_mut(i) else {
            continue;
        };
        if !bomb.is_enabled() {
            continue;
        }
        bomb.translate(0.0, -speed);

        if bomb.collides_with(&state.ship) {
            state.bombs.despawn(i);
            state.bomb_cooldown = state.tuning.bomb_cooldown_after_hit;
            on_hit_ship(state);
            if state.is_game_over() {
                return;
            }
        } else if bomb.collides_with(&state.borders[Border::Bottom as usize]) || is_lost(bomb) {
            state.bombs.despawn(i);
        }
    }
}

/// March the swarm sideways; bounce and drop when it reaches a side border
fn move_invaders(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    let velocity = state.invader_velocity;
    for invader in state.invaders.iter_mut().filter(|i| i.is_enabled()) {
        invader.translate(velocity, 0.0);
    }

    let wall = if velocity < 0.0 {
        state.border(Border::Left)
    } else {
        state.border(Border::Right)
    };
    let touching = state
        .invaders
        .iter()
        .any(|i| i.is_enabled() && i.collides_with(wall));

    if touching {
        let velocity = -velocity;
        state.invader_velocity = velocity;
        let step = state.tuning.invader_step_down;
        for invader in state.invaders.iter_mut().filter(|i| i.is_enabled()) {
            invader.translate(velocity, -step);
        }
    }
}

fn on_hit_invaderer(state: &mut GameState, levels: &dyn FormationSource, pos: Vec2) {
    state.push_event(GameEvent::InvaderDestroyed { pos });
    state.live_invaders = state.live_invaders.saturating_sub(1);
    state.score += 1;

    if let Some(tier) = state.power.record_kill(&state.tuning.power_up) {
        log::info!("Power tier up: {:?}", tier);
        state.push_event(GameEvent::PowerTierChanged { tier });
    }

    if state.live_invaders == state.tuning.speedup_remaining {
        state.invader_velocity *= state.tuning.speedup_factor;
        state.push_event(GameEvent::SwarmSpedUp);
    }

    if state.live_invaders == 0 && state.level <= state.tuning.max_level {
        load_next_level(state, levels);
    }
}

fn on_hit_ship(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::ShipHit {
        lives_left: state.lives,
    });

    if let Some(tier) = state.power.record_hit(&state.tuning.power_up) {
        log::info!("Power tier down: {:?}", tier);
        state.push_event(GameEvent::PowerTierChanged { tier });
    }

    if state.lives == 0 {
        state.end_game(false);
    }
}

/// Advance to the next level with a non-empty formation, or end the run
/// once the last level has been cleared.
///
/// At most `MAX_EMPTY_LEVELS` empty formations are skipped in a row; after
/// that the level set is treated as exhausted.
pub fn load_next_level(state: &mut GameState, levels: &dyn FormationSource) {
    let mut skipped = 0;
    loop {
        let next = state
            .level
            .checked_add(1)
            .filter(|&level| level <= state.tuning.max_level && skipped < MAX_EMPTY_LEVELS);
        let Some(level) = next else {
            if skipped >= MAX_EMPTY_LEVELS {
                log::warn!("{} empty levels in a row, ending run", skipped);
            }
            state.level = state.level.saturating_add(1);
            state.invaders.clear();
            state.live_invaders = 0;
            state.end_game(true);
            return;
        };
        state.level = level;

        let formation = levels.formation_for_level(state.level);
        if formation.is_empty() {
            log::warn!("Level {} has no invaders, skipping", state.level);
            skipped += 1;
            continue;
        }

        state.invaders = formation
            .cells
            .iter()
            .map(|cell| {
                let pos = cell.world_position();
                Sprite::new(TextureId::Invader, pos.x, pos.y, INVADER_SIZE, INVADER_SIZE)
            })
            .collect();
        state.live_invaders = state.invaders.len() as u32;
        state.invader_velocity = state.tuning.invader_speed;

        log::info!(
            "Level {} started with {} invaders",
            state.level,
            state.invaders.len()
        );
        state.push_event(GameEvent::LevelStarted {
            level: state.level,
            invaders: state.invaders.len(),
        });
        return;
    }
}
