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

//! Image decoding backed by the `image` crate.

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use umbra_core::asset::{ContentError, DecodedImage, ImageDecoder};

/// Decodes any format the `image` crate understands.
///
/// Rows are flipped so that row 0 is the bottom of the picture. 8-bit images keep
/// their channel layout; deeper images are narrowed to 8 bits per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

fn open_bottom_up(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode image from '{}'", path.display()))?;
    Ok(image.flipv())
}

fn into_raw_8bit(image: DynamicImage) -> (Vec<u8>, u32) {
    match image.color().channel_count() {
        1 => (image.into_luma8().into_raw(), 1),
        2 => (image.into_luma_alpha8().into_raw(), 2),
        3 => (image.into_rgb8().into_raw(), 3),
        _ => (image.into_rgba8().into_raw(), 4),
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ContentError> {
        let image = open_bottom_up(path).map_err(|e| ContentError::ImageDecode {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
        let (width, height) = (image.width(), image.height());
        let (pixels, channels) = into_raw_8bit(image);
        log::debug!(
            "ImageCrateDecoder: Decoded '{}' ({width}x{height}, {channels} channel(s))",
            path.display()
        );
        Ok(DecodedImage {
            pixels,
            width,
            height,
            channels,
        })
    }
}
