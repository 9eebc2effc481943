//! Surface Sampler: pointer → ray → nearest globe-mesh hit → texture coordinate.

use crate::sphere::{uv_from_unit, PickMesh};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Rejects grazing hits and self-intersections at the ray origin.
const EPSILON: f32 = 1.0e-6;
/// Barycentric slack so rays through a shared edge still hit one of its triangles.
const EDGE_SLACK: f32 = 1.0e-5;

/// Pointer position in normalised device coordinates, both axes in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub ndc: Vec2,
}

impl PointerSample {
    /// Normalises a pixel position (origin top-left, y down) against the viewport.
    pub fn from_pixels(x: f64, y: f64, width: u32, height: u32) -> Self {
        let w = f64::from(width.max(1));
        let h = f64::from(height.max(1));
        let nx = (x / w) * 2.0 - 1.0;
        let ny = -((y / h) * 2.0 - 1.0);
        Self {
            ndc: Vec2::new(nx.clamp(-1.0, 1.0) as f32, ny.clamp(-1.0, 1.0) as f32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Not necessarily normalised; hit distances are in units of this vector.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Unprojects the pointer at the near (z=0) and far (z=1) planes of a
    /// wgpu-style clip space and returns the ray between them.
    pub fn through_pointer(inverse_view_proj: Mat4, pointer: PointerSample) -> Option<Self> {
        let unproject = |z: f32| {
            let p = inverse_view_proj * Vec4::new(pointer.ndc.x, pointer.ndc.y, z, 1.0);
            (p.w.abs() > f32::EPSILON).then(|| p.truncate() / p.w)
        };
        let near = unproject(0.0)?;
        let far = unproject(1.0)?;
        let dir = (far - near).try_normalize()?;
        Some(Self::new(near, dir))
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Ray in another frame. The direction is transformed linearly and not
    /// renormalised, so `t` is preserved across the transform.
    pub fn transformed(&self, m: Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            dir: m.transform_vector3(self.dir),
        }
    }
}

/// Nearest intersection of the pointer ray with the globe mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub uv: Vec2,
    /// Hit position in world space.
    pub point: Vec3,
    /// Ray parameter of the hit.
    pub distance: f32,
}

/// Casts pointer rays against the pickable globe only; the point cloud and the
/// starfield are never tested.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    mesh: PickMesh,
}

impl SurfaceSampler {
    pub fn new(mesh: PickMesh) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &PickMesh {
        &self.mesh
    }

    /// Intersects a world-space ray with the globe placed by `model`.
    pub fn sample(&self, ray: Ray, model: Mat4) -> Option<SurfaceHit> {
        let local = ray.transformed(model.inverse());

        if !hits_bounding_sphere(&local, self.mesh.bounding_radius * (1.0 + 1.0e-4)) {
            return None;
        }

        let t = self
            .mesh
            .triangles
            .iter()
            .filter_map(|tri| intersect_triangle(&local, tri))
            .min_by(|a, b| a.total_cmp(b))?;

        let local_point = local.at(t);
        Some(SurfaceHit {
            uv: uv_from_unit(local_point),
            point: model.transform_point3(local_point),
            distance: t,
        })
    }
}

fn hits_bounding_sphere(ray: &Ray, radius: f32) -> bool {
    let a = ray.dir.length_squared();
    if a <= 0.0 {
        return false;
    }
    let b = ray.origin.dot(ray.dir);
    let c = ray.origin.length_squared() - radius * radius;
    let disc = b * b - a * c;
    // Far root behind the origin means the sphere is entirely behind the ray.
    disc >= 0.0 && (-b + disc.sqrt()) >= 0.0
}

/// Möller–Trumbore, both faces. Returns the ray parameter of the hit.
fn intersect_triangle(ray: &Ray, tri: &[Vec3; 3]) -> Option<f32> {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPSILON * EPSILON {
        return None;
    }
    let inv_det = det.recip();
    let s = ray.origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(-EDGE_SLACK..=1.0 + EDGE_SLACK).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < -EDGE_SLACK || u + v > 1.0 + EDGE_SLACK {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoCoordinate;

    fn default_view_proj() -> Mat4 {
        let proj = Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    fn sampler() -> SurfaceSampler {
        SurfaceSampler::new(PickMesh::icosphere(16))
    }

    #[test]
    fn pointer_normalisation() {
        let p = PointerSample::from_pixels(0.0, 0.0, 800, 600);
        assert_eq!(p.ndc, Vec2::new(-1.0, 1.0));
        let p = PointerSample::from_pixels(400.0, 300.0, 800, 600);
        assert_eq!(p.ndc, Vec2::ZERO);
        let p = PointerSample::from_pixels(800.0, 600.0, 800, 600);
        assert_eq!(p.ndc, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn centre_pointer_hits_front_centre() {
        let pointer = PointerSample { ndc: Vec2::ZERO };
        let ray = Ray::through_pointer(default_view_proj().inverse(), pointer).unwrap();
        let hit = sampler().sample(ray, Mat4::IDENTITY).expect("centre ray must hit");

        assert!((hit.uv - Vec2::new(0.5, 0.5)).length() < 1e-4, "uv={:?}", hit.uv);
        assert!(hit.point.z > 0.99 && hit.point.z < 1.0 + 1e-5);

        let geo = GeoCoordinate::from_uv(hit.uv);
        assert!(geo.lat_deg.abs() < 0.05);
        assert!(geo.lon_deg.abs() < 0.05);
    }

    #[test]
    fn corner_pointer_misses() {
        let pointer = PointerSample { ndc: Vec2::new(0.95, 0.95) };
        let ray = Ray::through_pointer(default_view_proj().inverse(), pointer).unwrap();
        assert!(sampler().sample(ray, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn nearest_hit_wins() {
        // A ray along -Z crosses the sphere twice; the near side is z ≈ +1.
        let ray = Ray::new(Vec3::new(0.1, 0.2, 5.0), -Vec3::Z);
        let hit = sampler().sample(ray, Mat4::IDENTITY).unwrap();
        assert!(hit.point.z > 0.9);
        assert!(hit.distance < 4.1);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 4.0), Vec3::Z);
        assert!(sampler().sample(ray, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn rotation_moves_texture_under_fixed_ray() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 4.0), -Vec3::Z);
        let quarter = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let hit = sampler().sample(ray, quarter).unwrap();

        // Rotating the globe +90° about Y brings its western meridian (-90°) to the front.
        let geo = GeoCoordinate::from_uv(hit.uv);
        assert!((geo.lon_deg + 90.0).abs() < 0.1, "lon={}", geo.lon_deg);
        assert!(hit.point.z > 0.99);
    }
}
