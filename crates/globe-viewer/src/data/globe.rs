use crate::data::types::{LineVertex, PointInstance};
use geohover::sphere::{lattice_points, uv_from_unit, PickMesh};
use rayon::prelude::*;

/// Point-cloud instances for an icosphere of the given detail. Each point's UV
/// comes from its own direction, so there is no seam to patch up.
pub fn build_globe_points(detail: u32) -> Vec<PointInstance> {
    let points = lattice_points(detail);

    let instances: Vec<PointInstance> = points
        .par_iter()
        .map(|p| PointInstance {
            position: p.to_array(),
            uv: uv_from_unit(*p).to_array(),
        })
        .collect();

    log::debug!(
        "Globe point cloud: detail={}, points={}",
        detail,
        instances.len()
    );
    instances
}

/// Line-list vertices (two per edge) for the pickable wireframe globe.
pub fn build_wireframe(mesh: &PickMesh) -> Vec<LineVertex> {
    mesh.edges()
        .into_iter()
        .flat_map(|[a, b]| {
            [
                LineVertex { position: a.to_array() },
                LineVertex { position: b.to_array() },
            ]
        })
        .collect()
}
