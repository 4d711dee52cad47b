//! Fixed perspective camera looking down -Z at the play field

use glam::{Mat4, Vec3};

use crate::sim::Sprite;

/// Distance from the origin along +Z
pub const CAMERA_DISTANCE: f32 = 3.0;
/// Vertical field of view (90 degrees)
pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_2;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub aspect: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self { aspect: 1.0 };
        camera.resize(width, height);
        camera
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn world_to_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_DISTANCE), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(FOV_Y, self.aspect, Z_NEAR, Z_FAR);
        projection * view
    }

    /// Matrix handed to the shaders for one sprite
    pub fn model_to_projection(&self, sprite: &Sprite) -> Mat4 {
        self.world_to_projection() * sprite.model_to_world()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_field_edge_maps_to_clip_edge() {
        let camera = Camera::new(600, 600);
        let clip = camera.world_to_projection() * Vec4::new(3.0, 3.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!((ndc.x - 1.0).abs() < 1e-5);
        assert!((ndc.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_wide_viewport_keeps_vertical_extent() {
        let camera = Camera::new(1200, 600);
        let clip = camera.world_to_projection() * Vec4::new(3.0, 3.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!((ndc.x - 0.5).abs() < 1e-5);
        assert!((ndc.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_size_resize_is_ignored() {
        let mut camera = Camera::new(800, 400);
        camera.resize(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
