//! WebGPU sprite render pipeline
//!
//! Every sprite is the same unit quad. Per-draw matrices go into one uniform
//! buffer at `UNIFORM_STRIDE` offsets and each texture owns a bind group.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::camera::Camera;
use super::draw_list::collect_draws;
use super::shaders::{FlatShader, FlatUniform, MAX_DRAWS, SpriteUniform, TextureShader, UNIFORM_STRIDE};
use super::textures::texture_image;
use super::vertex::{UNIT_QUAD, colors};
use crate::sim::{GameState, TextureId};

pub struct SpriteRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,

    texture_shader: TextureShader,
    flat_shader: FlatShader,

    quad_buffer: wgpu::Buffer,
    sprite_uniforms: wgpu::Buffer,
    sprite_uniform_bind_group: wgpu::BindGroup,
    flat_uniform: wgpu::Buffer,
    flat_bind_group: wgpu::BindGroup,
    textures: HashMap<TextureId, wgpu::BindGroup>,

    camera: Camera,
    pub size: (u32, u32),
}

impl SpriteRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("invaderers-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let texture_shader = TextureShader::new(&device, config.format);
        let flat_shader = FlatShader::new(&device, config.format);

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("unit_quad"),
            contents: bytemuck::cast_slice(&UNIT_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let sprite_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_uniforms"),
            size: UNIFORM_STRIDE * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sprite_uniform_bind_group = texture_shader.uniform_bind_group(&device, &sprite_uniforms);

        let flat_uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("flat_uniform"),
            size: std::mem::size_of::<FlatUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let flat_bind_group = flat_shader.bind_group(&device, &flat_uniform);

        // Pixel art stays crisp
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let textures = TextureId::ALL
            .iter()
            .map(|&id| {
                let view = upload_texture(&device, &queue, id);
                (id, texture_shader.texture_bind_group(&device, &view, &sampler))
            })
            .collect();
        log::info!("Uploaded {} sprite textures", TextureId::ALL.len());

        Self {
            surface,
            device,
            queue,
            config,
            texture_shader,
            flat_shader,
            quad_buffer,
            sprite_uniforms,
            sprite_uniform_bind_group,
            flat_uniform,
            flat_bind_group,
            textures,
            camera: Camera::new(width, height),
            size: (width, height),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(new_width, new_height);
        }
    }

    /// Draw the background, then every enabled sprite
    pub fn render(&mut self, state: &GameState) -> Result<(), wgpu::SurfaceError> {
        let draws = collect_draws(state);

        if let Some(background) = draws.background {
            let uniform = FlatUniform::new(
                self.camera.model_to_projection(background),
                self.size.0,
                self.size.1,
            );
            self.queue
                .write_buffer(&self.flat_uniform, 0, bytemuck::bytes_of(&uniform));
        }

        if draws.sprites.len() > MAX_DRAWS {
            log::warn!("Dropping {} sprites over the draw limit", draws.sprites.len() - MAX_DRAWS);
        }
        let sprites = &draws.sprites[..draws.sprites.len().min(MAX_DRAWS)];

        let mut staging = vec![0u8; sprites.len() * UNIFORM_STRIDE as usize];
        for (i, item) in sprites.iter().enumerate() {
            let uniform = SpriteUniform::new(self.camera.model_to_projection(item.sprite), item.tint);
            let start = i * UNIFORM_STRIDE as usize;
            let bytes = bytemuck::bytes_of(&uniform);
            staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.sprite_uniforms, 0, &staging);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_encoder"),
            });

        {
            let [r, g, b, a] = colors::CLEAR;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            let vertex_count = UNIT_QUAD.len() as u32;

            if draws.background.is_some() {
                render_pass.set_pipeline(&self.flat_shader.pipeline);
                render_pass.set_bind_group(0, &self.flat_bind_group, &[]);
                render_pass.draw(0..vertex_count, 0..1);
            }

            render_pass.set_pipeline(&self.texture_shader.pipeline);
            for (i, item) in sprites.iter().enumerate() {
                let Some(texture) = self.textures.get(&item.texture) else {
                    continue;
                };
                let offset = (i as u64 * UNIFORM_STRIDE) as wgpu::DynamicOffset;
                render_pass.set_bind_group(0, &self.sprite_uniform_bind_group, &[offset]);
                render_pass.set_bind_group(1, texture, &[]);
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, id: TextureId) -> wgpu::TextureView {
    let image = texture_image(id);
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("sprite_texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
