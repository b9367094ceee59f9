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

use std::fmt;
use std::path::PathBuf;

/// A recoverable error caused by bad or missing content on disk.
#[derive(Debug)]
pub enum ContentError {
    /// An image file could not be decoded.
    ImageDecode {
        /// The image path.
        path: PathBuf,
        /// The decoder's explanation.
        reason: String,
    },
    /// A decoded image has a channel count no texture format matches.
    UnsupportedChannelCount {
        /// The image path.
        path: PathBuf,
        /// The offending channel count.
        channels: u32,
    },
    /// A scene file could not be imported.
    SceneImport {
        /// The scene path.
        path: PathBuf,
        /// The importer's explanation.
        reason: String,
    },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::ImageDecode { path, reason } => {
                write!(f, "Failed to decode image '{}': {reason}", path.display())
            }
            ContentError::UnsupportedChannelCount { path, channels } => {
                write!(
                    f,
                    "Image '{}' has {channels} channels; only 3 or 4 are supported",
                    path.display()
                )
            }
            ContentError::SceneImport { path, reason } => {
                write!(f, "Failed to import scene '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ContentError {}
