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

//! Defines data structures related to textures and their sampling state.

use std::borrow::Cow;

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// The memory layout of each texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Three 8-bit unsigned normalized channels.
    Rgb8Unorm,
    /// Four 8-bit unsigned normalized channels.
    Rgba8Unorm,
    /// Four 16-bit float channels.
    Rgba16Float,
    /// 24-bit depth.
    Depth24,
    /// 32-bit float depth.
    Depth32Float,
}

impl TextureFormat {
    /// Returns `true` for depth formats.
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth24 | TextureFormat::Depth32Float)
    }

    /// Size in bytes of a single texel.
    pub fn bytes_per_texel(&self) -> u32 {
        match self {
            TextureFormat::Rgb8Unorm => 3,
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Depth24 => 4,
            TextureFormat::Depth32Float => 4,
        }
    }

    /// The upload format matching a decoded image with `channels` channels, if any.
    pub fn from_channel_count(channels: u32) -> Option<Self> {
        match channels {
            3 => Some(TextureFormat::Rgb8Unorm),
            4 => Some(TextureFormat::Rgba8Unorm),
            _ => None,
        }
    }
}

/// Texel filtering used when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest texel, no interpolation.
    Nearest,
    /// Bilinear interpolation.
    Linear,
    /// Trilinear interpolation across mip levels (minification only).
    LinearMipmapLinear,
}

/// Behaviour of texture coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Clamp to the edge texel.
    ClampToEdge,
    /// Tile the texture.
    Repeat,
}

/// Sampling state baked into a texture at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerState {
    /// Filter used when the texture is minified.
    pub min_filter: FilterMode,
    /// Filter used when the texture is magnified.
    pub mag_filter: FilterMode,
    /// Wrapping on both axes.
    pub address_mode: AddressMode,
}

impl SamplerState {
    /// Nearest filtering with edge clamping, for data buffers that must not be blended.
    pub const NEAREST_CLAMP: Self = Self {
        min_filter: FilterMode::Nearest,
        mag_filter: FilterMode::Nearest,
        address_mode: AddressMode::ClampToEdge,
    };

    /// Trilinear filtering with repeat wrapping, for material images.
    pub const TRILINEAR_REPEAT: Self = Self {
        min_filter: FilterMode::LinearMipmapLinear,
        mag_filter: FilterMode::Linear,
        address_mode: AddressMode::Repeat,
    };
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label for the texture.
    pub label: Option<Cow<'a, str>>,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texel format.
    pub format: TextureFormat,
    /// Sampling state.
    pub sampler: SamplerState,
    /// If `true`, the device builds a full mip chain after every upload.
    pub mipmapped: bool,
}
