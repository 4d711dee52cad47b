//! Sprite geometry
//!
//! A sprite is an axis-aligned rectangle with a 2D affine transform. Movement
//! and rotation happen in the sprite's local frame, so a sprite that has been
//! rotated keeps moving "forward" along its own axes.

use glam::{Affine2, Mat4, Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Texture identifiers understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureId {
    Ship,
    Invader,
    Missile,
    PowerMissile1,
    PowerMissile2,
    Bomb,
    Explosion,
    GameOver,
    Border,
    Background,
}

impl TextureId {
    pub const ALL: [TextureId; 10] = [
        TextureId::Ship,
        TextureId::Invader,
        TextureId::Missile,
        TextureId::PowerMissile1,
        TextureId::PowerMissile2,
        TextureId::Bomb,
        TextureId::Explosion,
        TextureId::GameOver,
        TextureId::Border,
        TextureId::Background,
    ];
}

/// A positioned, axis-aligned rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Model to world transform
    pub transform: Affine2,
    /// Half width and half height
    pub half_extents: Vec2,
    /// Texture to draw with; `None` keeps the sprite invisible but collidable
    pub texture: Option<TextureId>,
    /// Rotation applied every frame while the sprite is flying (missiles)
    pub spin: f32,
    enabled: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            half_extents: Vec2::ZERO,
            texture: None,
            spin: 0.0,
            enabled: true,
        }
    }
}

impl Sprite {
    /// Place a sprite of size `w` x `h` centered on `(x, y)`
    pub fn new(texture: TextureId, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            transform: Affine2::from_translation(Vec2::new(x, y)),
            half_extents: Vec2::new(w * 0.5, h * 0.5),
            texture: Some(texture),
            spin: 0.0,
            enabled: true,
        }
    }

    /// Same as [`Sprite::new`] but starting disabled (pool slots)
    pub fn disabled(texture: TextureId, w: f32, h: f32) -> Self {
        let mut sprite = Self::new(texture, 0.0, 0.0, w, h);
        sprite.enabled = false;
        sprite
    }

    /// World position of the sprite center
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.translation
    }

    /// Move in the local frame
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform * Affine2::from_translation(Vec2::new(dx, dy));
    }

    /// Rotate about the sprite center (radians, counter-clockwise)
    pub fn rotate(&mut self, angle: f32) {
        self.transform = self.transform * Affine2::from_angle(angle);
    }

    /// Copy another sprite's transform, then offset locally by `(dx, dy)`
    pub fn set_relative(&mut self, other: &Sprite, dx: f32, dy: f32) {
        self.transform = other.transform;
        self.translate(dx, dy);
    }

    /// Axis-aligned overlap test. Rotation is ignored.
    pub fn collides_with(&self, other: &Sprite) -> bool {
        let d = other.position() - self.position();
        d.x.abs() < self.half_extents.x + other.half_extents.x
            && d.y.abs() < self.half_extents.y + other.half_extents.y
    }

    /// True if `other` is horizontally within our half width plus `margin`
    pub fn is_above(&self, other: &Sprite, margin: f32) -> bool {
        let dx = other.position().x - self.position().x;
        dx.abs() < self.half_extents.x + margin
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn swap_texture(&mut self, texture: TextureId) {
        self.texture = Some(texture);
    }

    /// Model matrix mapping the unit quad `[-1, 1]²` onto the sprite
    pub fn model_to_world(&self) -> Mat4 {
        let m = self.transform.matrix2;
        let t = self.transform.translation;
        let affine = Mat4::from_cols(
            Vec4::new(m.x_axis.x, m.x_axis.y, 0.0, 0.0),
            Vec4::new(m.y_axis.x, m.y_axis.y, 0.0, 0.0),
            Vec4::Z,
            Vec4::new(t.x, t.y, 0.0, 1.0),
        );
        affine * Mat4::from_scale(self.half_extents.extend(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn block(x: f32, y: f32, w: f32, h: f32) -> Sprite {
        Sprite::new(TextureId::Invader, x, y, w, h)
    }

    #[test]
    fn test_new_places_center_and_half_extents() {
        let s = block(1.0, -2.0, 0.5, 0.25);
        assert_eq!(s.position(), Vec2::new(1.0, -2.0));
        assert_eq!(s.half_extents, Vec2::new(0.25, 0.125));
        assert!(s.is_enabled());
    }

    #[test]
    fn test_translate_follows_rotation() {
        let mut s = block(0.0, 0.0, 1.0, 1.0);
        s.rotate(FRAC_PI_2);
        s.translate(0.0, 1.0);
        // Local +y points toward world -x after a quarter turn
        assert!((s.position() - Vec2::new(-1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_set_relative_offsets_from_other() {
        let ship = block(0.5, -2.75, 0.25, 0.25);
        let mut missile = Sprite::disabled(TextureId::Missile, 0.0625, 0.25);
        missile.set_relative(&ship, 0.0, 0.5);
        assert!((missile.position() - Vec2::new(0.5, -2.25)).length() < 1e-6);
    }

    #[test]
    fn test_collides_touching_edges_is_not_overlap() {
        let a = block(0.0, 0.0, 1.0, 1.0);
        let b = block(1.0, 0.0, 1.0, 1.0);
        assert!(!a.collides_with(&b));
        let c = block(0.99, 0.0, 1.0, 1.0);
        assert!(a.collides_with(&c));
    }

    #[test]
    fn test_is_above_uses_own_half_width() {
        let invader = block(0.0, 2.0, 0.25, 0.25);
        let ship = block(0.4, -2.75, 0.25, 0.25);
        assert!(invader.is_above(&ship, 0.3));
        assert!(!invader.is_above(&ship, 0.2));
    }

    #[test]
    fn test_model_to_world_maps_unit_corner() {
        let s = block(1.0, 2.0, 0.5, 1.0);
        let corner = s.model_to_world() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert!((corner.x - 1.25).abs() < 1e-6);
        assert!((corner.y - 2.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn collides_with_is_symmetric(
            ax in -4.0f32..4.0, ay in -4.0f32..4.0, aw in 0.01f32..6.0, ah in 0.01f32..6.0,
            bx in -4.0f32..4.0, by in -4.0f32..4.0, bw in 0.01f32..6.0, bh in 0.01f32..6.0,
        ) {
            let a = block(ax, ay, aw, ah);
            let b = block(bx, by, bw, bh);
            prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
        }
    }
}
