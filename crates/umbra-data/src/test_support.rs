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

//! In-memory collaborators shared by the unit tests of this crate.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use umbra_core::asset::{
    ContentError, DecodedImage, ImageDecoder, RawScene, SceneImporter, SourceProvider,
};

/// Sources with a manually advanced clock (`seconds` since the epoch).
#[derive(Default)]
pub(crate) struct MemorySources {
    files: Mutex<HashMap<PathBuf, (String, SystemTime)>>,
}

impl MemorySources {
    pub(crate) fn write(&self, path: &str, text: &str, seconds: u64) {
        self.files.lock().unwrap().insert(
            PathBuf::from(path),
            (
                text.to_string(),
                SystemTime::UNIX_EPOCH + Duration::from_secs(seconds),
            ),
        );
    }

    pub(crate) fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(Path::new(path));
    }
}

fn not_found() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "no such source")
}

impl SourceProvider for MemorySources {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = self.files.lock().unwrap();
        files.get(path).map(|(text, _)| text.clone()).ok_or_else(not_found)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        let files = self.files.lock().unwrap();
        files.get(path).map(|(_, time)| *time).ok_or_else(not_found)
    }
}

/// Serves solid-color images and counts decode calls.
#[derive(Default)]
pub(crate) struct MemoryDecoder {
    images: HashMap<PathBuf, DecodedImage>,
    decodes: AtomicUsize,
}

impl MemoryDecoder {
    pub(crate) fn with_image(mut self, path: &str, channels: u32) -> Self {
        let (width, height) = (4, 4);
        self.images.insert(
            PathBuf::from(path),
            DecodedImage {
                pixels: vec![0x80; (width * height * channels) as usize],
                width,
                height,
                channels,
            },
        );
        self
    }

    pub(crate) fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl ImageDecoder for MemoryDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ContentError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| ContentError::ImageDecode {
                path: path.to_path_buf(),
                reason: "not in memory".to_string(),
            })
    }
}

/// Serves prepared scenes.
#[derive(Default)]
pub(crate) struct MemoryImporter {
    scenes: HashMap<PathBuf, RawScene>,
}

impl MemoryImporter {
    pub(crate) fn with_scene(mut self, path: &str, scene: RawScene) -> Self {
        self.scenes.insert(PathBuf::from(path), scene);
        self
    }
}

impl SceneImporter for MemoryImporter {
    fn import(&self, path: &Path) -> Result<RawScene, ContentError> {
        self.scenes
            .get(path)
            .cloned()
            .ok_or_else(|| ContentError::SceneImport {
                path: path.to_path_buf(),
                reason: "not in memory".to_string(),
            })
    }
}
