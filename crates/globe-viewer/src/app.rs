use crate::{
    assets,
    camera::{Camera, CameraController},
    config::{Config, ResolverKind},
    data::{
        globe::{build_globe_points, build_wireframe},
        starfield::generate_stars,
        types::{FrameUniforms, GlobeUniform, StarUniform, WireUniform},
    },
    net::{Endpoints, RemoteResolver},
    renderer::{Renderer, SceneGeometry},
    ui,
};
use anyhow::{Context as _, Result};
use geohover::{
    shading, sphere::PickMesh, CountryTable, HoverFrame, HoverTracker, LocalResolver,
    PlaceResolver, PointerSample, Ray, SurfaceSampler,
};
use glam::{Mat4, Vec2};
use std::{f32::consts::TAU, sync::Arc, time::Instant};
use winit::{dpi::PhysicalPosition, event::WindowEvent, window::Window};

/// Globe spin about +Y, radians per frame.
const GLOBE_SPIN_PER_FRAME: f32 = 0.002;
/// Subdivision of the pickable wireframe mesh.
const PICK_DETAIL: u32 = 15;
const STAR_SIZE_PX: f32 = 2.0;
/// Wireframe tint (linear RGB of #0099ff) and opacity.
const WIRE_COLOR: [f32; 4] = [0.0, 0.318, 1.0, 0.1];

/// Builds the resolver the config asks for.
pub fn build_resolver(config: &Config) -> Result<Box<dyn PlaceResolver>> {
    match config.resolver {
        ResolverKind::Local => {
            let table = match &config.countries {
                Some(path) => CountryTable::load(path)
                    .with_context(|| format!("loading country table {}", path.display()))?,
                None => CountryTable::builtin(),
            };
            log::info!("Local lookups: {} country boxes", table.len());
            Ok(Box::new(LocalResolver::new(table)))
        }
        ResolverKind::Remote => {
            let endpoints = Endpoints {
                geocode_url: config.geocode_url.clone(),
                time_url: config.time_url.clone(),
                timeout: config.lookup_timeout(),
            };
            Ok(Box::new(RemoteResolver::spawn(
                endpoints,
                Some(config.cooldown()),
            )?))
        }
    }
}

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    sampler: SurfaceSampler,
    tracker: HoverTracker,
    resolver: Box<dyn PlaceResolver>,
    /// Last pointer position over the window, physical pixels.
    pointer: Option<PhysicalPosition<f64>>,
    globe_angle: f32,
    point_size_px: f32,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let resolver = build_resolver(config)?;

        let pick_mesh = PickMesh::icosphere(PICK_DETAIL);
        let scene = SceneGeometry {
            points: build_globe_points(config.point_detail),
            wireframe: build_wireframe(&pick_mesh),
            stars: generate_stars(config.stars, &mut rand::thread_rng()),
        };
        let asset_paths = assets::discover(&config.assets_dir);

        let renderer = Renderer::new(window.clone(), &asset_paths, &scene).await?;
        let size = renderer.gfx.size;
        let camera = Camera::new(size.width as f32 / size.height.max(1) as f32);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            camera,
            camera_controller: CameraController::new(),
            egui_ctx,
            egui_state,
            sampler: SurfaceSampler::new(pick_mesh),
            tracker: HoverTracker::new(&*resolver),
            resolver,
            pointer: None,
            globe_angle: 0.0,
            point_size_px: config.point_size,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera
                .set_aspect(new_size.width as f32 / new_size.height as f32);
        }
    }

    /// Returns true when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.pointer = Some(*position),
            WindowEvent::CursorLeft { .. } => self.pointer = None,
            _ => {}
        }

        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        self.camera_controller.handle_event(event, &mut self.camera);

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    fn model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.globe_angle)
    }

    /// Pointer → ray → globe hit → hover tracker.
    fn update_hover(&mut self) {
        let size = self.renderer.gfx.size;
        let model = self.model();
        let inverse_view_proj = self.camera.view_proj().inverse();

        let hit = self
            .pointer
            .map(|p| PointerSample::from_pixels(p.x, p.y, size.width, size.height))
            .and_then(|pointer| Ray::through_pointer(inverse_view_proj, pointer))
            .and_then(|ray| self.sampler.sample(ray, model));

        // The popup is laid out by egui in logical points.
        let ppp = self.egui_ctx.pixels_per_point();
        let pointer = self
            .pointer
            .map_or(Vec2::ZERO, |p| Vec2::new(p.x as f32, p.y as f32) / ppp);

        self.tracker.update(
            HoverFrame {
                hit,
                pointer,
                now: Instant::now(),
            },
            self.resolver.as_mut(),
        );
    }

    fn frame_uniforms(&self) -> FrameUniforms {
        let size = self.renderer.gfx.size;
        let viewport_size = [size.width as f32, size.height as f32];
        let view = self.camera.view();
        let model = self.model();

        FrameUniforms {
            globe: GlobeUniform {
                model_view: (view * model).to_cols_array_2d(),
                proj: self.camera.proj.to_cols_array_2d(),
                mouse_uv: self.tracker.uniform().mouse_uv.to_array(),
                viewport_size,
                point_size_px: self.point_size_px,
                hover_threshold: shading::HOVER_THRESHOLD,
                elevation_scale: shading::ELEVATION_SCALE,
                lift_gain: shading::HOVER_LIFT_GAIN,
                blend_gain: shading::HOVER_BLEND_GAIN,
                _pad: [0.0; 3],
            },
            wire: WireUniform {
                model_view_proj: (self.camera.proj * view * model).to_cols_array_2d(),
                color: WIRE_COLOR,
            },
            stars: StarUniform {
                view_proj: (self.camera.proj * view).to_cols_array_2d(),
                viewport_size,
                point_size_px: STAR_SIZE_PX,
                _pad: 0.0,
            },
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        self.camera_controller.update(&mut self.camera);
        self.globe_angle = (self.globe_angle + GLOBE_SPIN_PER_FRAME) % TAU;
        self.update_hover();

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = self.frame_uniforms();
        self.renderer.render(&swap_view, &uniforms);

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        ui::draw_hud(
            &self.egui_ctx,
            &ui::HudStats {
                hovered: self.tracker.hovered(),
                resolver: self.resolver.name(),
                points: self.renderer.globe.instances_len(),
            },
        );
        ui::draw_popup(&self.egui_ctx, self.tracker.popup());

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn local_resolver_from_default_config() {
        let config = Config::try_parse_from(["globe_viewer", "--resolver", "local"]).unwrap();
        let resolver = build_resolver(&config).unwrap();
        assert_eq!(resolver.name(), "local");
        assert!(resolver.cooldown().is_none());
    }

    #[test]
    fn missing_country_table_is_an_error() {
        let config = Config::try_parse_from([
            "globe_viewer",
            "--resolver",
            "local",
            "--countries",
            "/nonexistent/countries.json",
        ])
        .unwrap();
        assert!(build_resolver(&config).is_err());
    }
}
