//! WebGPU rendering module
//!
//! Draws the game as textured quads seen through a fixed perspective camera.

pub mod camera;
pub mod draw_list;
pub mod shaders;
pub mod sprite_pipeline;
pub mod textures;
pub mod vertex;

pub use camera::Camera;
pub use draw_list::{DrawItem, DrawList, collect_draws};
pub use sprite_pipeline::SpriteRenderState;
