//! Core data types for the globe viewer, focused on GPU data representation.

/// Per-instance data of the point-cloud globe.
/// Must match the instance inputs in `shaders/globe_points.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct PointInstance {
    /// Position on the unit sphere (model space); doubles as the normal.
    pub position: [f32; 3],
    /// Texture coordinate of the point.
    pub uv: [f32; 2],
}

/// Per-instance data of the starfield.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct StarInstance {
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

/// One endpoint of a wireframe edge.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct LineVertex {
    pub position: [f32; 3],
}

/// Uniform of the globe point pass.
/// Must match the layout of `GlobeUniform` in `shaders/globe_points.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct GlobeUniform {
    /// View × model (globe rotation).
    pub model_view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// Hover coordinate in texture space.
    pub mouse_uv: [f32; 2],
    /// Size of the viewport in physical pixels.
    pub viewport_size: [f32; 2],
    /// Point sprite diameter in pixels.
    pub point_size_px: f32,
    pub hover_threshold: f32,
    pub elevation_scale: f32,
    pub lift_gain: f32,
    pub blend_gain: f32,
    pub _pad: [f32; 3],
}

// Buffer size must match the WGSL-reflected size.
const _: [(); 176] = [(); core::mem::size_of::<GlobeUniform>()];

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct WireUniform {
    pub model_view_proj: [[f32; 4]; 4],
    pub color: [f32; 4],
}

const _: [(); 80] = [(); core::mem::size_of::<WireUniform>()];

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct StarUniform {
    pub view_proj: [[f32; 4]; 4],
    pub viewport_size: [f32; 2],
    pub point_size_px: f32,
    pub _pad: f32,
}

const _: [(); 80] = [(); core::mem::size_of::<StarUniform>()];

/// All uniforms written once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameUniforms {
    pub globe: GlobeUniform,
    pub wire: WireUniform,
    pub stars: StarUniform,
}
