//! Texture loading utilities

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};

/// Load a texture from a file path
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData> {
    let path = path.as_ref();
    log::info!("Loading texture: {:?}", path);

    let img = image::open(path).with_context(|| format!("Failed to load texture: {:?}", path))?;

    Ok(TextureData::from_image(img))
}

/// Load a texture, or fall back to a 1x1 texture of `fallback` if it cannot be read
pub fn load_texture_or(path: impl AsRef<Path>, fallback: [u8; 4]) -> TextureData {
    match load_texture(path.as_ref()) {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("{:#}; using flat fallback", e);
            TextureData::solid(fallback)
        }
    }
}

/// Raw RGBA8 texture data ready for GPU upload
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: wgpu::TextureFormat,
}

impl TextureData {
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        Self {
            width,
            height,
            data: rgba.into_raw(),
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }

    /// Single-pixel texture of one colour
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            data: rgba.to_vec(),
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }

    /// Treat the data as linear (height maps and other non-colour data)
    pub fn into_linear(mut self) -> Self {
        self.format = wgpu::TextureFormat::Rgba8Unorm;
        self
    }

    /// Create GPU texture from this data
    pub fn create_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
    ) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
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
            &self.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            size,
        );

        texture
    }
}

/// Sampler for equirectangular globe textures: wraps in longitude only
pub fn create_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_is_rgba() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            3,
            2,
            image::Rgb([10, 20, 30]),
        ));
        let texture = TextureData::from_image(img);
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.data.len(), 3 * 2 * 4);
        assert_eq!(&texture.data[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_texture_falls_back() {
        let texture = load_texture_or("/nonexistent/earth.jpg", [1, 2, 3, 255]);
        assert_eq!((texture.width, texture.height), (1, 1));
        assert_eq!(texture.data, vec![1, 2, 3, 255]);
    }

    #[test]
    fn test_into_linear() {
        let texture = TextureData::solid([0, 0, 0, 255]).into_linear();
        assert_eq!(texture.format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
