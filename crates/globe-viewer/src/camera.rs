use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Vertical field of view in degrees.
pub const FOV_Y_DEG: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;
/// Starting distance from the globe centre.
pub const DEFAULT_RADIUS: f32 = 4.0;

const MIN_RADIUS: f32 = 1.5;
const MAX_RADIUS: f32 = 20.0;
const MAX_ELEVATION_DEG: f32 = 85.0;

/// Fraction of the pending rotation applied each frame.
const DAMPING: f32 = 0.05;
const ROTATE_SPEED: f32 = 0.005;

/// Orbit camera looking at the origin, Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Distance from the origin.
    pub radius: f32,
    /// Rotation about +Y, zero on the +Z axis (radians).
    pub azimuth_rad: f32,
    /// Angle above the XZ plane (radians).
    pub elevation_rad: f32,
    pub proj: Mat4,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            azimuth_rad: 0.0,
            elevation_rad: 0.0,
            proj: Self::projection(aspect),
        }
    }

    /// wgpu-style right-handed projection (depth in [0, 1]).
    pub fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.proj = Self::projection(aspect);
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth_rad.sin_cos();
        let (sin_el, cos_el) = self.elevation_rad.sin_cos();
        Vec3::new(
            self.radius * cos_el * sin_az,
            self.radius * sin_el,
            self.radius * cos_el * cos_az,
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view()
    }
}

/// Mouse-driven orbit with inertia: drags accumulate a pending rotation that
/// is bled into the camera a little each frame.
pub struct CameraController {
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
    pending_azimuth: f32,
    pending_elevation: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            mouse_down: false,
            last_mouse: None,
            pending_azimuth: 0.0,
            pending_elevation: 0.0,
        }
    }

    /// Handles window events and updates the camera.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left {
                    self.mouse_down = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_orbit((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_mouse = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.handle_scroll(scroll, camera);
            }
            _ => {}
        }
    }

    /// Applies one frame of damped rotation.
    pub fn update(&mut self, camera: &mut Camera) {
        camera.azimuth_rad += self.pending_azimuth * DAMPING;
        camera.elevation_rad = (camera.elevation_rad + self.pending_elevation * DAMPING).clamp(
            -MAX_ELEVATION_DEG.to_radians(),
            MAX_ELEVATION_DEG.to_radians(),
        );
        self.pending_azimuth *= 1.0 - DAMPING;
        self.pending_elevation *= 1.0 - DAMPING;
    }

    fn handle_scroll(&mut self, delta: f32, camera: &mut Camera) {
        // Positive delta = scroll up = zoom in.
        camera.radius = (camera.radius * 1.1_f32.powf(-delta)).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    fn handle_cursor_orbit(&mut self, xy: (f64, f64)) {
        if let Some(last) = self.last_mouse {
            if self.mouse_down {
                // Dragging right turns the globe right, i.e. the camera left.
                self.pending_azimuth -= ((xy.0 - last.0) * ROTATE_SPEED as f64) as f32;
                self.pending_elevation += ((xy.1 - last.1) * ROTATE_SPEED as f64) as f32;
            }
        }
        self.last_mouse = Some(xy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geohover::{
        pick::{PointerSample, Ray},
        sphere::PickMesh,
        SurfaceSampler,
    };

    #[test]
    fn default_camera_sits_on_positive_z() {
        let cam = Camera::new(16.0 / 9.0);
        assert!((cam.position() - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-6);
    }

    #[test]
    fn centre_ray_hits_front_of_globe() {
        let cam = Camera::new(1.0);
        let pointer = PointerSample::from_pixels(400.0, 300.0, 800, 600);
        let ray = Ray::through_pointer(cam.view_proj().inverse(), pointer).unwrap();
        let sampler = SurfaceSampler::new(PickMesh::icosphere(8));
        let hit = sampler.sample(ray, Mat4::IDENTITY).unwrap();
        assert!((hit.uv.x - 0.5).abs() < 1e-3 && (hit.uv.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn damping_converges_to_full_drag() {
        let mut cam = Camera::new(1.0);
        let mut ctl = CameraController::new();
        ctl.pending_azimuth = 0.5;
        for _ in 0..1000 {
            ctl.update(&mut cam);
        }
        assert!((cam.azimuth_rad - 0.5).abs() < 1e-3);
    }

    #[test]
    fn elevation_is_clamped() {
        let mut cam = Camera::new(1.0);
        let mut ctl = CameraController::new();
        ctl.pending_elevation = 100.0;
        for _ in 0..200 {
            ctl.update(&mut cam);
        }
        assert!(cam.elevation_rad <= MAX_ELEVATION_DEG.to_radians() + 1e-6);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::new(1.0);
        let mut ctl = CameraController::new();
        ctl.handle_scroll(100.0, &mut cam);
        assert_eq!(cam.radius, MIN_RADIUS);
        ctl.handle_scroll(-100.0, &mut cam);
        assert_eq!(cam.radius, MAX_RADIUS);
    }
}
