//! Icosphere geometry and the globe's texture-coordinate layout.

use glam::{Vec2, Vec3};
use std::collections::{HashMap, HashSet};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Golden ratio, used for the 12 icosahedron corners.
const PHI: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSA_CORNERS: [[f32; 3]; 12] = [
    [-1.0,  PHI,  0.0], [ 1.0,  PHI,  0.0], [-1.0, -PHI,  0.0], [ 1.0, -PHI,  0.0],
    [ 0.0, -1.0,  PHI], [ 0.0,  1.0,  PHI], [ 0.0, -1.0, -PHI], [ 0.0,  1.0, -PHI],
    [ PHI,  0.0, -1.0], [ PHI,  0.0,  1.0], [-PHI,  0.0, -1.0], [-PHI,  0.0,  1.0],
];

#[rustfmt::skip]
const ICOSA_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Quantisation used to merge lattice points shared by neighbouring faces.
const DEDUP_SCALE: f32 = 1.0e5;

/// Maps a direction on the unit sphere to its texture coordinate.
///
/// `lon = atan2(x, z)`, `lat = asin(y)`; `u = (lon + π) / 2π`,
/// `v = (π/2 − lat) / π`. The input need not be normalised.
pub fn uv_from_unit(p: Vec3) -> Vec2 {
    let n = p.normalize_or_zero();
    let lon = n.x.atan2(n.z);
    let lat = n.y.clamp(-1.0, 1.0).asin();
    Vec2::new((lon + PI) / TAU, (FRAC_PI_2 - lat) / PI)
}

/// Inverse of [`uv_from_unit`].
pub fn unit_from_uv(uv: Vec2) -> Vec3 {
    let lon = uv.x * TAU - PI;
    let lat = FRAC_PI_2 - uv.y * PI;
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vec3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
}

fn corner(i: usize) -> Vec3 {
    Vec3::from_array(ICOSA_CORNERS[i]).normalize()
}

/// Lattice point `(i, j)` on face `(a, b, c)` with `segments` divisions per edge,
/// projected onto the unit sphere.
///
/// Integer barycentric weights keep points on a shared edge bit-identical
/// whichever face produces them.
#[inline]
fn lattice(a: Vec3, b: Vec3, c: Vec3, i: u32, j: u32, segments: u32) -> Vec3 {
    let wa = (segments - i - j) as f32;
    (a * wa + b * i as f32 + c * j as f32).normalize()
}

/// Triangle mesh of the decorative globe, used for ray picking.
#[derive(Debug, Clone)]
pub struct PickMesh {
    pub triangles: Vec<[Vec3; 3]>,
    /// Radius of a sphere enclosing every vertex.
    pub bounding_radius: f32,
}

impl PickMesh {
    /// Builds an icosphere whose faces are split into `(detail + 1)²` triangles.
    pub fn icosphere(detail: u32) -> Self {
        let n = detail + 1;
        let mut triangles = Vec::with_capacity(20 * (n * n) as usize);

        for face in ICOSA_FACES {
            let (a, b, c) = (corner(face[0]), corner(face[1]), corner(face[2]));
            for i in 0..n {
                for j in 0..(n - i) {
                    let p00 = lattice(a, b, c, i, j, n);
                    let p10 = lattice(a, b, c, i + 1, j, n);
                    let p01 = lattice(a, b, c, i, j + 1, n);
                    triangles.push([p00, p10, p01]);

                    if i + j + 1 < n {
                        let p11 = lattice(a, b, c, i + 1, j + 1, n);
                        triangles.push([p10, p11, p01]);
                    }
                }
            }
        }

        Self {
            triangles,
            bounding_radius: 1.0,
        }
    }

    /// Unique triangle edges, for wireframe rendering.
    pub fn edges(&self) -> Vec<[Vec3; 2]> {
        let key = |p: Vec3| {
            [
                (p.x * DEDUP_SCALE).round() as i32,
                (p.y * DEDUP_SCALE).round() as i32,
                (p.z * DEDUP_SCALE).round() as i32,
            ]
        };

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for tri in &self.triangles {
            for (p, q) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (kp, kq) = (key(p), key(q));
                let k = if kp <= kq { (kp, kq) } else { (kq, kp) };
                if seen.insert(k) {
                    edges.push([p, q]);
                }
            }
        }
        edges
    }
}

/// Unique icosphere vertices at the given subdivision level.
///
/// Points on shared face edges are merged, so the result counts
/// `10·(detail+1)² + 2` directions.
pub fn lattice_points(detail: u32) -> Vec<Vec3> {
    let n = detail + 1;
    let mut index: HashMap<[i32; 3], ()> = HashMap::new();
    let mut points = Vec::new();

    for face in ICOSA_FACES {
        let (a, b, c) = (corner(face[0]), corner(face[1]), corner(face[2]));
        for i in 0..=n {
            for j in 0..=(n - i) {
                let p = lattice(a, b, c, i, j, n);
                let k = [
                    (p.x * DEDUP_SCALE).round() as i32,
                    (p.y * DEDUP_SCALE).round() as i32,
                    (p.z * DEDUP_SCALE).round() as i32,
                ];
                if index.insert(k, ()).is_none() {
                    points.push(p);
                }
            }
        }
    }

    points
}
