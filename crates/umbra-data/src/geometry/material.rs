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

use glam::Vec3;
use umbra_core::asset::{ImageDecoder, RawMaterial, TextureKind, TextureSlots};
use umbra_core::renderer::GraphicsDevice;

use crate::texture::{TextureCache, TextureHandle};

/// Surface parameters of a submesh. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Base color.
    pub albedo: Vec3,
    /// Emitted color.
    pub emissive: Vec3,
    /// Smoothness in `[0, 1]`.
    pub smoothness: f32,
    /// Texture slots. An absent slot means the texture was not referenced or could
    /// not be loaded.
    pub textures: TextureSlots<TextureHandle>,
}

impl Default for Material {
    fn default() -> Self {
        Self::from_raw_untextured(&RawMaterial::default())
    }
}

impl Material {
    fn from_raw_untextured(raw: &RawMaterial) -> Self {
        Self {
            name: raw.name.clone(),
            albedo: Vec3::from(raw.albedo),
            emissive: Vec3::from(raw.emissive),
            smoothness: raw.smoothness.clamp(0.0, 1.0),
            textures: TextureSlots::default(),
        }
    }

    /// Converts an imported material, loading each referenced texture through the
    /// cache.
    pub fn load(
        raw: &RawMaterial,
        device: &dyn GraphicsDevice,
        decoder: &dyn ImageDecoder,
        textures: &mut TextureCache,
    ) -> Self {
        let mut material = Self::from_raw_untextured(raw);
        for kind in TextureKind::ALL {
            let handle = raw
                .textures
                .get(kind)
                .and_then(|path| textures.load_texture_2d(device, decoder, path));
            material.textures.set(kind, handle);
        }
        material
    }
}
