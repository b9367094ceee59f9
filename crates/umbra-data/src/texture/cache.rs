// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use umbra_core::asset::{ContentError, ImageDecoder};
use umbra_core::renderer::{
    GraphicsDevice, SamplerState, TextureDescriptor, TextureFormat, TextureId,
};

/// Stable index of a texture inside its [`TextureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

/// A 2D texture uploaded from an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// File identity.
    pub path: PathBuf,
    /// Device texture.
    pub id: TextureId,
    /// Channel count of the source image.
    pub channels: u32,
}

/// Uploads each image file once and hands out stable handles.
///
/// Entries are never evicted; the cache owns its textures for the lifetime of the
/// renderer.
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: Vec<Texture>,
}

impl TextureCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `path`, decoding and uploading it on first use.
    ///
    /// 3-channel images become `Rgb8Unorm`, 4-channel images `Rgba8Unorm`, both
    /// mipmapped with trilinear filtering and repeat wrapping. Any failure is logged
    /// and yields `None`, which callers treat as an absent texture slot.
    pub fn load_texture_2d(
        &mut self,
        device: &dyn GraphicsDevice,
        decoder: &dyn ImageDecoder,
        path: &Path,
    ) -> Option<TextureHandle> {
        if let Some(index) = self.textures.iter().position(|t| t.path == path) {
            return Some(TextureHandle(index));
        }

        let image = match decoder.decode(path) {
            Ok(image) => image,
            Err(e) => {
                log::error!("TextureCache: {e}");
                return None;
            }
        };

        let Some(format) = TextureFormat::from_channel_count(image.channels) else {
            let error = ContentError::UnsupportedChannelCount {
                path: path.to_path_buf(),
                channels: image.channels,
            };
            log::error!("TextureCache: {error}");
            return None;
        };

        let label = path.display().to_string();
        let id = match device.create_texture(&TextureDescriptor {
            label: Some(Cow::Borrowed(&label)),
            width: image.width,
            height: image.height,
            format,
            sampler: SamplerState::TRILINEAR_REPEAT,
            mipmapped: true,
        }) {
            Ok(id) => id,
            Err(e) => {
                log::error!("TextureCache: Failed to create texture for '{label}': {e}");
                return None;
            }
        };

        if let Err(e) = device.write_texture(id, &image.pixels) {
            log::error!("TextureCache: Failed to upload '{label}': {e}");
            if let Err(e) = device.destroy_texture(id) {
                log::warn!("TextureCache: Failed to release {id:?}: {e}");
            }
            return None;
        }
        // The decoded pixels are dropped here; only the device copy remains.
        drop(image.pixels);

        log::info!(
            "TextureCache: Uploaded '{label}' as {id:?} ({}x{}, {format:?})",
            image.width,
            image.height
        );
        self.textures.push(Texture {
            path: path.to_path_buf(),
            id,
            channels: image.channels,
        });
        Some(TextureHandle(self.textures.len() - 1))
    }

    /// Returns a cached texture.
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.0)
    }

    /// Shorthand for the device texture behind a handle.
    pub fn texture_id(&self, handle: TextureHandle) -> Option<TextureId> {
        self.get(handle).map(|t| t.id)
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Destroys every texture. The cache is empty afterwards.
    pub fn destroy_all(&mut self, device: &dyn GraphicsDevice) {
        for texture in self.textures.drain(..) {
            if let Err(e) = device.destroy_texture(texture.id) {
                log::warn!(
                    "TextureCache: Failed to destroy '{}': {e}",
                    texture.path.display()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryDecoder;
    use umbra_core::renderer::FilterMode;
    use umbra_infra::HeadlessDevice;

    #[test]
    fn same_path_is_decoded_once() {
        let device = HeadlessDevice::new();
        let decoder = MemoryDecoder::default().with_image("wood.png", 3);
        let mut cache = TextureCache::new();

        let first = cache
            .load_texture_2d(&device, &decoder, Path::new("wood.png"))
            .unwrap();
        let second = cache
            .load_texture_2d(&device, &decoder, Path::new("wood.png"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(decoder.decode_count(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(device.texture_count(), 1);
    }

    #[test]
    fn channel_count_selects_format() {
        let device = HeadlessDevice::new();
        let decoder = MemoryDecoder::default()
            .with_image("rgb.png", 3)
            .with_image("rgba.png", 4);
        let mut cache = TextureCache::new();

        let rgb = cache
            .load_texture_2d(&device, &decoder, Path::new("rgb.png"))
            .unwrap();
        let rgba = cache
            .load_texture_2d(&device, &decoder, Path::new("rgba.png"))
            .unwrap();

        let rgb_info = device.texture_info(cache.texture_id(rgb).unwrap()).unwrap();
        let rgba_info = device.texture_info(cache.texture_id(rgba).unwrap()).unwrap();
        assert_eq!(rgb_info.format, TextureFormat::Rgb8Unorm);
        assert_eq!(rgba_info.format, TextureFormat::Rgba8Unorm);
        assert!(rgb_info.initialized);
        assert_eq!(rgb_info.mip_levels, 3);
        assert_eq!(rgb_info.sampler.min_filter, FilterMode::LinearMipmapLinear);
    }

    #[test]
    fn unsupported_channels_and_decode_failures_yield_none() {
        let device = HeadlessDevice::new();
        let decoder = MemoryDecoder::default().with_image("gray.png", 1);
        let mut cache = TextureCache::new();

        assert!(cache
            .load_texture_2d(&device, &decoder, Path::new("gray.png"))
            .is_none());
        assert!(cache
            .load_texture_2d(&device, &decoder, Path::new("missing.png"))
            .is_none());
        assert!(cache.is_empty());
        assert_eq!(device.texture_count(), 0);
    }
}
