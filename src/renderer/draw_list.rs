//! What to draw this frame, independent of the GPU

use crate::sim::{GameState, Sprite, TextureId};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const VICTORY_TINT: [f32; 4] = [0.4, 1.0, 0.5, 1.0];

/// One textured sprite to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem<'a> {
    pub sprite: &'a Sprite,
    pub texture: TextureId,
    pub tint: [f32; 4],
}

#[derive(Debug, Clone, Default)]
pub struct DrawList<'a> {
    /// Drawn first with the flat shader
    pub background: Option<&'a Sprite>,
    /// Drawn in order with the texture shader
    pub sprites: Vec<DrawItem<'a>>,
}

fn push<'a>(items: &mut Vec<DrawItem<'a>>, sprite: &'a Sprite, tint: [f32; 4]) {
    if !sprite.is_enabled() {
        return;
    }
    if let Some(texture) = sprite.texture {
        items.push(DrawItem {
            sprite,
            texture,
            tint,
        });
    }
}

/// Collect every enabled, textured sprite back to front
pub fn collect_draws(state: &GameState) -> DrawList<'_> {
    let background = Some(&state.background).filter(|s| s.is_enabled());
    let mut sprites = Vec::new();

    for border in &state.borders {
        push(&mut sprites, border, WHITE);
    }
    for invader in &state.invaders {
        push(&mut sprites, invader, WHITE);
    }
    push(&mut sprites, &state.ship, WHITE);
    for missile in state.missiles.iter() {
        push(&mut sprites, missile, WHITE);
    }
    for bomb in state.bombs.iter() {
        push(&mut sprites, bomb, WHITE);
    }

    // Fade the explosion out over its lifetime
    let fade = match state.explosion_frames {
        Some(frames) if state.tuning.explosion_frames > 0 => {
            1.0 - frames as f32 / state.tuning.explosion_frames as f32
        }
        _ => 1.0,
    };
    push(&mut sprites, &state.explosion, [1.0, 1.0, 1.0, fade]);

    let banner_tint = if state.victory { VICTORY_TINT } else { WHITE };
    push(&mut sprites, &state.game_over_banner, banner_tint);

    DrawList {
        background,
        sprites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BuiltinFormations, new_game};
    use crate::tuning::Tuning;

    #[test]
    fn test_free_slots_are_not_drawn() {
        let mut state = new_game(1, Tuning::default(), &BuiltinFormations);
        let before = collect_draws(&state).sprites.len();
        state.missiles.spawn();
        let draws = collect_draws(&state);
        assert_eq!(draws.sprites.len(), before + 1);
        assert_eq!(
            draws.sprites.iter().filter(|d| d.sprite.is_enabled()).count(),
            draws.sprites.len()
        );
    }

    #[test]
    fn test_initial_scene() {
        let state = new_game(1, Tuning::default(), &BuiltinFormations);
        let draws = collect_draws(&state);
        assert!(draws.background.is_some());
        // Borders, invaders and the ship
        assert_eq!(draws.sprites.len(), 4 + state.invaders.len() + 1);
        assert!(draws.sprites.iter().all(|d| d.texture != TextureId::GameOver));
    }

    #[test]
    fn test_destroyed_invader_disappears() {
        let mut state = new_game(1, Tuning::default(), &BuiltinFormations);
        let before = collect_draws(&state).sprites.len();
        state.invaders[0].set_enabled(false);
        assert_eq!(collect_draws(&state).sprites.len(), before - 1);
    }

    #[test]
    fn test_banner_drawn_last_after_game_over() {
        let mut state = new_game(1, Tuning::default(), &BuiltinFormations);
        state.end_game(true);
        let draws = collect_draws(&state);
        let last = draws.sprites.last().unwrap();
        assert_eq!(last.texture, TextureId::GameOver);
        assert_eq!(last.tint, VICTORY_TINT);
    }

    #[test]
    fn test_untextured_sprite_is_skipped() {
        let mut state = new_game(1, Tuning::default(), &BuiltinFormations);
        let before = collect_draws(&state).sprites.len();
        state.ship.texture = None;
        assert_eq!(collect_draws(&state).sprites.len(), before - 1);
    }
}
