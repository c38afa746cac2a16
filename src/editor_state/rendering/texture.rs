//! Texture handling for the rendering pipeline.
//!
//! Provides the depth buffer and the material texture array. Material images
//! are decoded on the CPU into one RGBA byte blob (layer-major, one layer per
//! material) before being uploaded.

use std::path::Path;

use image::imageops::FilterType;
use log::{info, warn};

use crate::{editor_state::voxels::material::Material, error::EditorError};

/// Edge length in pixels of every material layer.
pub const MATERIAL_TEXTURE_DIMENSION: u32 = 64;
const BYTES_PER_LAYER: usize = (MATERIAL_TEXTURE_DIMENSION * MATERIAL_TEXTURE_DIMENSION * 4) as usize;
const PLACEHOLDER_CHECKER_SIZE: u32 = 8;

/// A GPU texture with its view and sampler.
pub struct Texture {
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface size.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads the material layers as a 2D texture array.
    ///
    /// `layer_bytes` must hold `MATERIAL_COUNT` layers of
    /// `MATERIAL_TEXTURE_DIMENSION²` RGBA pixels, as produced by
    /// [`load_material_layers`].
    pub fn create_material_array(device: &wgpu::Device, queue: &wgpu::Queue, layer_bytes: &[u8]) -> Self {
        use wgpu::util::DeviceExt;

        let layers = (layer_bytes.len() / BYTES_PER_LAYER) as u32;
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Material Texture Array"),
                size: wgpu::Extent3d {
                    width: MATERIAL_TEXTURE_DIMENSION,
                    height: MATERIAL_TEXTURE_DIMENSION,
                    depth_or_array_layers: layers,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            layer_bytes,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Decodes `<texture_dir>/<stem>.png` for every material into one layer-major
/// RGBA blob, resizing each image to the layer size.
///
/// A missing file is replaced by a checkered placeholder in the material's
/// tint. A file that exists but cannot be decoded is an error.
pub fn load_material_layers(texture_dir: &Path) -> Result<Vec<u8>, EditorError> {
    let mut layer_bytes = Vec::with_capacity(BYTES_PER_LAYER * Material::all().len());

    for material in Material::all() {
        let path = texture_dir.join(format!("{}.png", material.texture_stem()));

        if !path.exists() {
            warn!(
                "Texture {} not found, using placeholder for {}",
                path.display(),
                material
            );
            layer_bytes.extend(placeholder_layer(material));
            continue;
        }

        let image = image::open(&path).map_err(|source| EditorError::TextureDecode {
            path: path.clone(),
            source,
        })?;
        let rgba = image
            .resize_exact(
                MATERIAL_TEXTURE_DIMENSION,
                MATERIAL_TEXTURE_DIMENSION,
                FilterType::Triangle,
            )
            .to_rgba8();

        info!("Loaded texture {}", path.display());
        layer_bytes.extend_from_slice(rgba.as_raw());
    }

    Ok(layer_bytes)
}

/// A two-tone checkerboard in the material's tint.
pub fn placeholder_layer(material: Material) -> Vec<u8> {
    let light = material.placeholder_tint();
    let dark = light.map(|channel| (channel as f32 * 0.75) as u8);
    let dark = [dark[0], dark[1], dark[2], 255];

    let mut pixels = Vec::with_capacity(BYTES_PER_LAYER);
    for y in 0..MATERIAL_TEXTURE_DIMENSION {
        for x in 0..MATERIAL_TEXTURE_DIMENSION {
            let checker = (x / PLACEHOLDER_CHECKER_SIZE + y / PLACEHOLDER_CHECKER_SIZE) % 2 == 0;
            pixels.extend_from_slice(if checker { &light } else { &dark });
        }
    }
    pixels
}
