//! The rendering orchestrator. Owns the GPU context, the depth target,
//! the scene pipelines and the egui renderer.

pub mod context;
pub mod pipelines;
pub mod targets;
pub mod textures;

use self::{
    context::GfxContext,
    pipelines::{
        globe_points::GlobePointsPipeline, starfield::StarfieldPipeline,
        wireframe::WireframePipeline,
    },
    targets::Targets,
    textures::GlobeTextures,
};
use crate::{
    assets::AssetPaths,
    data::types::{FrameUniforms, LineVertex, PointInstance, StarInstance},
};
use std::sync::Arc;
use winit::window::Window;

/// CPU-side geometry handed to the renderer once at startup.
pub struct SceneGeometry {
    pub points: Vec<PointInstance>,
    pub wireframe: Vec<LineVertex>,
    pub stars: Vec<StarInstance>,
}

pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub globe: GlobePointsPipeline,
    pub wireframe: WireframePipeline,
    pub stars: StarfieldPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        assets: &AssetPaths,
        scene: &SceneGeometry,
    ) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let color_fmt = gfx.config.format;
        let targets = Targets::new(&gfx.device, gfx.size);

        let textures = GlobeTextures::load(&gfx.device, &gfx.queue, assets);
        let globe = GlobePointsPipeline::new(
            &gfx.device,
            color_fmt,
            targets.depth_fmt,
            &textures,
            &scene.points,
        );
        let wireframe =
            WireframePipeline::new(&gfx.device, color_fmt, targets.depth_fmt, &scene.wireframe);
        let stars = StarfieldPipeline::new(&gfx.device, color_fmt, targets.depth_fmt, &scene.stars);

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, color_fmt, None, 1);

        Ok(Self {
            gfx,
            targets,
            globe,
            wireframe,
            stars,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Writes this frame's uniforms and draws the scene into `swap_view`.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, uniforms: &FrameUniforms) {
        self.globe.update(&self.gfx.queue, &uniforms.globe);
        self.wireframe.update(&self.gfx.queue, &uniforms.wire);
        self.stars.update(&self.gfx.queue, &uniforms.stars);

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Points write depth; stars and wireframe only test against it.
            self.globe.draw(&mut pass);
            self.stars.draw(&mut pass);
            self.wireframe.draw(&mut pass);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
