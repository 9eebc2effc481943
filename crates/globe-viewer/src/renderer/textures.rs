//! GPU upload of the four globe textures.

use crate::assets::{AssetPaths, TextureData, TextureSlot};

pub struct GlobeTextures {
    pub color: wgpu::TextureView,
    pub elevation: wgpu::TextureView,
    pub specular: wgpu::TextureView,
    pub highlight: wgpu::TextureView,
    /// Repeats in u so sampling wraps across the antimeridian.
    pub sampler: wgpu::Sampler,
}

impl GlobeTextures {
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, paths: &AssetPaths) -> Self {
        let upload = |slot: TextureSlot| {
            let data = TextureData::load_or_fallback(slot, paths.get(slot));
            upload_texture(device, queue, slot.label(), &data)
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Globe Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            color: upload(TextureSlot::Color),
            elevation: upload(TextureSlot::Elevation),
            specular: upload(TextureSlot::Specular),
            highlight: upload(TextureSlot::Highlight),
            sampler,
        }
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    data: &TextureData,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let format = if data.srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.rgba,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        size,
    );

    log::debug!("Uploaded {} ({}x{}, {:?})", label, data.width, data.height, format);
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
