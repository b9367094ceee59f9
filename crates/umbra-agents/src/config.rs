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

//! Engine configuration, read from RON.
//!
//! Every field has a default, so a config file only lists what it changes:
//!
//! ```ron
//! (
//!     width: 1280,
//!     height: 720,
//!     initial_mode: "mesh",
//!     models: [(path: "assets/models/cube.obj", translation: (0.0, 0.0, -2.0))],
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use umbra_data::scene::{Camera, Light};

use crate::render_agent::RenderMode;

/// Program source files, relative to [`EngineConfig::shader_dir`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgramFiles {
    /// Textured quad and G-buffer composite.
    pub quad: String,
    /// Lit meshes.
    pub mesh: String,
    /// Depth attachment visualization.
    pub depth_view: String,
}

impl Default for ProgramFiles {
    fn default() -> Self {
        Self {
            quad: "quad.glsl".to_string(),
            mesh: "mesh.glsl".to_string(),
            depth_view: "depth_view.glsl".to_string(),
        }
    }
}

/// Resolved program source paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    /// Textured quad and G-buffer composite.
    pub quad: PathBuf,
    /// Lit meshes.
    pub mesh: PathBuf,
    /// Depth attachment visualization.
    pub depth_view: PathBuf,
}

/// One instance of a model file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Scene file to import.
    pub path: PathBuf,
    /// World position.
    pub translation: [f32; 3],
    /// Rotation around `+Y`, in degrees.
    pub yaw_degrees: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            translation: [0.0; 3],
            yaw_degrees: 0.0,
            scale: 1.0,
        }
    }
}

impl ModelConfig {
    /// Model-to-world transform.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            Vec3::from(self.translation),
        )
    }
}

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum LightConfig {
    /// Shines along `direction` everywhere.
    Directional {
        /// Direction the light travels.
        direction: [f32; 3],
        /// Linear RGB color.
        color: [f32; 3],
    },
    /// Emits from `position`.
    Point {
        /// World position.
        position: [f32; 3],
        /// Linear RGB color.
        color: [f32; 3],
    },
}

impl From<LightConfig> for Light {
    fn from(config: LightConfig) -> Self {
        match config {
            LightConfig::Directional { direction, color } => {
                Light::directional(Vec3::from(direction), Vec3::from(color))
            }
            LightConfig::Point { position, color } => {
                Light::point(Vec3::from(position), Vec3::from(color))
            }
        }
    }
}

/// Starting camera and its movement speed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World position.
    pub position: [f32; 3],
    /// Rotation around `+Y`, in degrees.
    pub yaw_degrees: f32,
    /// Rotation up or down, in degrees.
    pub pitch_degrees: f32,
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    /// Units per second at full input.
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            fov_degrees: 60.0,
            speed: 2.5,
        }
    }
}

impl CameraConfig {
    /// A camera for a display of the given size.
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera {
            position: Vec3::from(self.position),
            yaw: self.yaw_degrees.to_radians(),
            pitch: self.pitch_degrees.to_radians(),
            fov_y_radians: self.fov_degrees.to_radians(),
            ..Camera::default()
        };
        camera.set_aspect_ratio(width, height);
        camera
    }
}

/// The part of the configuration the render context needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Clear color of every pass.
    pub clear_color: [f32; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        let config = EngineConfig::default();
        config.render_settings()
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Directory holding the program sources.
    pub shader_dir: PathBuf,
    /// Program source file names.
    pub programs: ProgramFiles,
    /// Whether program sources are watched for changes.
    pub hot_reload: bool,
    /// Mode shown first.
    pub initial_mode: RenderMode,
    /// Clear color of every pass.
    pub clear_color: [f32; 4],
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Starting camera.
    pub camera: CameraConfig,
    /// Models to instantiate, in order.
    pub models: Vec<ModelConfig>,
    /// Scene lights.
    pub lights: Vec<LightConfig>,
    /// Image shown in textured-quad mode.
    pub quad_texture: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            shader_dir: PathBuf::from("assets/shaders"),
            programs: ProgramFiles::default(),
            hot_reload: true,
            initial_mode: RenderMode::default(),
            clear_color: [0.05, 0.05, 0.08, 1.0],
            log_filter: "info".to_string(),
            camera: CameraConfig::default(),
            models: Vec::new(),
            lights: Vec::new(),
            quad_texture: None,
        }
    }
}

impl EngineConfig {
    /// Parses a RON document.
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).context("Failed to parse engine configuration")
    }

    /// Reads and parses a RON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        let config = Self::from_ron(&text)
            .with_context(|| format!("Invalid configuration '{}'", path.display()))?;
        log::info!(
            "EngineConfig: Loaded '{}' ({} model(s), {} light(s))",
            path.display(),
            config.models.len(),
            config.lights.len()
        );
        Ok(config)
    }

    /// Display size and clear color.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            clear_color: self.clear_color,
        }
    }

    /// Program paths joined onto the shader directory.
    pub fn shader_paths(&self) -> ShaderPaths {
        ShaderPaths {
            quad: self.shader_dir.join(&self.programs.quad),
            mesh: self.shader_dir.join(&self.programs.mesh),
            depth_view: self.shader_dir.join(&self.programs.depth_view),
        }
    }

    /// The configured lights.
    pub fn scene_lights(&self) -> Vec<Light> {
        self.lights.iter().copied().map(Light::from).collect()
    }
}
