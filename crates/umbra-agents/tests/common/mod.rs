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

//! In-memory collaborators and a ready-made engine for the scenario tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use umbra_agents::render_agent::{Collaborators, Engine, RenderMode};
use umbra_agents::EngineConfig;
use umbra_core::asset::{
    ContentError, DecodedImage, ImageDecoder, RawMaterial, RawMesh, RawNode, RawScene,
    SceneImporter, SourceProvider, TextureSlots,
};
use umbra_infra::HeadlessDevice;

pub const QUAD_SOURCE: &str = "#ifdef VERTEX
layout(location = 0) in vec3 a_position;
layout(location = 2) in vec2 a_uv;
#endif
void main() {}
";

pub const MESH_SOURCE: &str = "#ifdef VERTEX
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;
#endif
void main() {}
";

pub const DEPTH_VIEW_SOURCE: &str = QUAD_SOURCE;

/// Program sources whose clock the test advances by hand.
#[derive(Clone, Default)]
pub struct SharedSources {
    files: Arc<Mutex<HashMap<PathBuf, (String, SystemTime)>>>,
}

impl SharedSources {
    pub fn write(&self, path: impl AsRef<Path>, text: &str, seconds: u64) {
        self.files.lock().unwrap().insert(
            path.as_ref().to_path_buf(),
            (
                text.to_string(),
                SystemTime::UNIX_EPOCH + Duration::from_secs(seconds),
            ),
        );
    }
}

fn not_found() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "no such source")
}

impl SourceProvider for SharedSources {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = self.files.lock().unwrap();
        files.get(path).map(|(text, _)| text.clone()).ok_or_else(not_found)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        let files = self.files.lock().unwrap();
        files.get(path).map(|(_, time)| *time).ok_or_else(not_found)
    }
}

/// Serves 2x2 RGBA images for any `.png` path and counts decodes.
#[derive(Clone, Default)]
pub struct CountingDecoder {
    decodes: Arc<AtomicUsize>,
}

impl CountingDecoder {
    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl ImageDecoder for CountingDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ContentError> {
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            return Err(ContentError::ImageDecode {
                path: path.to_path_buf(),
                reason: "not a png".to_string(),
            });
        }
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(DecodedImage {
            pixels: vec![255; 2 * 2 * 4],
            width: 2,
            height: 2,
            channels: 4,
        })
    }
}

/// Serves prepared scenes by path.
#[derive(Clone, Default)]
pub struct SceneLibrary {
    scenes: Arc<Mutex<HashMap<PathBuf, RawScene>>>,
}

impl SceneLibrary {
    pub fn add(&self, path: &str, scene: RawScene) {
        self.scenes.lock().unwrap().insert(PathBuf::from(path), scene);
    }
}

impl SceneImporter for SceneLibrary {
    fn import(&self, path: &Path) -> Result<RawScene, ContentError> {
        self.scenes
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ContentError::SceneImport {
                path: path.to_path_buf(),
                reason: "unknown scene".to_string(),
            })
    }
}

/// A unit quad with texture coordinates.
pub fn quad_mesh(name: &str, material_index: usize) -> RawMesh {
    RawMesh {
        name: name.to_string(),
        positions: vec![
            [-0.5, -0.5, 0.0],
            [0.5, -0.5, 0.0],
            [0.5, 0.5, 0.0],
            [-0.5, 0.5, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        tex_coords: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        indices: vec![0, 1, 2, 0, 2, 3],
        material_index,
        ..Default::default()
    }
}

/// Two quads sharing a textured material.
pub fn crate_scene() -> RawScene {
    RawScene {
        root: RawNode {
            name: "crate".to_string(),
            meshes: vec![0],
            children: vec![RawNode {
                name: "lid".to_string(),
                meshes: vec![1],
                children: Vec::new(),
            }],
        },
        meshes: vec![quad_mesh("side", 0), quad_mesh("lid", 0)],
        materials: vec![RawMaterial {
            name: "wood".to_string(),
            textures: TextureSlots {
                albedo: Some(PathBuf::from("textures/wood.png")),
                specular: Some(PathBuf::from("textures/wood_spec.png")),
                ..Default::default()
            },
            ..Default::default()
        }],
    }
}

pub struct Harness {
    pub device: HeadlessDevice,
    pub sources: SharedSources,
    pub decoder: CountingDecoder,
    pub scenes: SceneLibrary,
    pub config: EngineConfig,
}

impl Harness {
    /// Sources for all three programs, the crate scene and a quad texture.
    pub fn new() -> Self {
        let config = EngineConfig {
            width: 320,
            height: 180,
            initial_mode: RenderMode::TexturedQuad,
            quad_texture: Some(PathBuf::from("textures/checker.png")),
            ..EngineConfig::default()
        };
        let paths = config.shader_paths();
        let sources = SharedSources::default();
        sources.write(&paths.quad, QUAD_SOURCE, 1);
        sources.write(&paths.mesh, MESH_SOURCE, 1);
        sources.write(&paths.depth_view, DEPTH_VIEW_SOURCE, 1);

        let scenes = SceneLibrary::default();
        scenes.add("models/crate.obj", crate_scene());

        Self {
            device: HeadlessDevice::new(),
            sources,
            decoder: CountingDecoder::default(),
            scenes,
            config,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            sources: Box::new(self.sources.clone()),
            decoder: Box::new(self.decoder.clone()),
            importer: Box::new(self.scenes.clone()),
        }
    }

    pub fn engine(&self) -> Engine {
        Engine::from_config(
            &self.config,
            Arc::new(self.device.clone()),
            self.collaborators(),
        )
        .expect("engine starts on the headless device")
    }
}
