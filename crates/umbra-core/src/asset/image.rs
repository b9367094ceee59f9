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

use super::ContentError;
use std::path::Path;

/// Raw pixels produced by an [`ImageDecoder`].
///
/// Rows are tightly packed with row 0 at the bottom of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// `width * height * channels` bytes.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per pixel, one byte per channel.
    pub channels: u32,
}

/// Turns an image file into raw pixels.
pub trait ImageDecoder {
    /// Decodes the image at `path`, flipped so that row 0 is the bottom row.
    fn decode(&self, path: &Path) -> Result<DecodedImage, ContentError>;
}
