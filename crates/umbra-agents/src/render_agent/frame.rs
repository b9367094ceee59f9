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

//! The frame loop: update (input, hot-reload, camera, uniform packing), then render
//! (mode dispatch and submission).

use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use thiserror::Error;
use umbra_core::renderer::{GraphicsDevice, RenderError};
use umbra_data::geometry::ModelId;
use umbra_data::program::ProgramId;
use umbra_data::scene::{Camera, CameraInput, Entity, Light};
use umbra_data::uniform::UniformError;
use umbra_lanes::render_lane::{pack_frame, FrameBindings, LaneError};

use super::context::{Collaborators, RenderContext};
use super::dispatcher::{DispatchStats, FrameScene, ModeDispatcher};
use super::mode::RenderMode;
use crate::config::EngineConfig;

/// Errors that abort a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A pass could not be encoded.
    #[error(transparent)]
    Lane(#[from] LaneError),
    /// The frame's uniform data did not fit or could not be uploaded.
    #[error(transparent)]
    Uniform(#[from] UniformError),
    /// A device-level failure.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A built-in program is missing from the registry.
    #[error("program {0:?} is not registered")]
    UnknownProgram(ProgramId),
    /// `render` was called before any `update`.
    #[error("render called before the frame was updated")]
    NotUpdated,
}

/// Per-frame input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Camera movement.
    pub camera: CameraInput,
    /// Seconds since the previous frame.
    pub delta_seconds: f32,
    /// Mode requested this frame, if any.
    pub select_mode: Option<RenderMode>,
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame counter, starting at 0.
    pub index: u64,
    /// Mode the frame was rendered in.
    pub mode: RenderMode,
    /// Passes and draws recorded.
    pub dispatch: DispatchStats,
    /// Programs rebuilt by hot-reload during the update.
    pub reloaded_programs: usize,
}

/// The render context, the scene and the mode dispatcher, driven one frame at a
/// time.
pub struct Engine {
    context: RenderContext,
    dispatcher: ModeDispatcher,
    camera: Camera,
    camera_speed: f32,
    lights: Vec<Light>,
    entities: Vec<Entity>,
    hot_reload: bool,
    bindings: Option<FrameBindings>,
    reloaded_programs: usize,
    frame_index: u64,
}

impl Engine {
    /// Wraps a context with an empty scene.
    pub fn new(context: RenderContext, mode: RenderMode) -> Self {
        let settings = *context.settings();
        let mut camera = Camera::default();
        camera.set_aspect_ratio(settings.width, settings.height);
        Self {
            context,
            dispatcher: ModeDispatcher::new(mode),
            camera,
            camera_speed: 2.5,
            lights: Vec::new(),
            entities: Vec::new(),
            hot_reload: true,
            bindings: None,
            reloaded_programs: 0,
            frame_index: 0,
        }
    }

    /// Builds the context and the scene a configuration describes.
    ///
    /// Models and the quad texture that fail to load are logged and skipped.
    pub fn from_config(
        config: &EngineConfig,
        device: Arc<dyn GraphicsDevice>,
        collaborators: Collaborators,
    ) -> Result<Self, RenderError> {
        let context = RenderContext::new(
            device,
            config.render_settings(),
            &config.shader_paths(),
            collaborators,
        )?;
        let mut engine = Self::new(context, config.initial_mode);
        engine.hot_reload = config.hot_reload;
        engine.camera = config.camera.camera(config.width, config.height);
        engine.camera_speed = config.camera.speed;
        engine.lights = config.scene_lights();

        for model in &config.models {
            if engine.spawn_file(&model.path, model.transform()).is_none() {
                log::warn!("Engine: Skipping model '{}'", model.path.display());
            }
        }
        if let Some(path) = &config.quad_texture {
            if !engine.context.set_quad_texture(path) {
                log::warn!("Engine: Quad texture '{}' is unavailable", path.display());
            }
        }

        log::info!(
            "Engine: Ready in {} mode with {} entit(ies) and {} light(s)",
            engine.mode(),
            engine.entities.len(),
            engine.lights.len()
        );
        Ok(engine)
    }

    /// Places an instance of an already loaded model. Returns its index.
    pub fn spawn(&mut self, model: ModelId, transform: Mat4) -> usize {
        self.entities.push(Entity::new(model, transform));
        self.entities.len() - 1
    }

    /// Loads a scene file and places one instance of it.
    pub fn spawn_file(&mut self, path: &Path, transform: Mat4) -> Option<usize> {
        let model = self.context.load_model(path)?;
        Some(self.spawn(model, transform))
    }

    /// Adds a light to the scene.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Switches mode; see [`ModeDispatcher::select`].
    pub fn select_mode(&mut self, mode: RenderMode) -> bool {
        self.dispatcher.select(mode)
    }

    /// The current mode.
    pub fn mode(&self) -> RenderMode {
        self.dispatcher.mode()
    }

    /// Turns hot-reload on or off.
    pub fn set_hot_reload(&mut self, enabled: bool) {
        self.hot_reload = enabled;
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, for direct placement.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Scene entities, with this frame's uniform ranges once updated.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The render context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// The render context, for loading content.
    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    /// The uniform ranges of the last update.
    pub fn bindings(&self) -> Option<FrameBindings> {
        self.bindings
    }

    /// Resizes the G-buffer and the camera's aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.context.resize(width, height)?;
        self.camera.set_aspect_ratio(width, height);
        Ok(())
    }

    /// Applies input, hot-reloads changed programs, moves the camera and packs
    /// this frame's uniform data.
    ///
    /// ## Errors
    /// * `FrameError::Uniform` - The scene does not fit in one uniform block.
    pub fn update(&mut self, input: &FrameInput) -> Result<(), FrameError> {
        self.bindings = None;
        if let Some(mode) = input.select_mode {
            self.dispatcher.select(mode);
        }

        self.reloaded_programs = if self.hot_reload {
            self.context.hot_reload().len()
        } else {
            0
        };

        self.camera
            .integrate(&input.camera, input.delta_seconds, self.camera_speed);

        let bindings = pack_frame(
            &mut self.context.uniforms,
            self.context.device.as_ref(),
            &self.camera,
            &self.lights,
            &mut self.entities,
        )?;
        self.bindings = Some(bindings);
        Ok(())
    }

    /// Encodes the current mode and submits it.
    ///
    /// ## Errors
    /// * `FrameError::NotUpdated` - No successful `update` preceded this call.
    /// * `FrameError::Lane` - A pass failed, e.g. a mesh cannot satisfy a program.
    pub fn render(&mut self) -> Result<FrameStats, FrameError> {
        let bindings = self.bindings.ok_or(FrameError::NotUpdated)?;
        let scene = FrameScene {
            uniform_buffer: self.context.uniforms.buffer()?,
            bindings,
            entities: &self.entities,
        };

        let device = Arc::clone(&self.context.device);
        let mut encoder = device.create_command_encoder(Some("Frame"));
        let dispatch = self
            .dispatcher
            .dispatch(&mut self.context, encoder.as_mut(), &scene)?;
        device.submit_command_buffer(encoder.finish());

        let stats = FrameStats {
            index: self.frame_index,
            mode: self.dispatcher.mode(),
            dispatch,
            reloaded_programs: self.reloaded_programs,
        };
        log::trace!("Engine: {stats:?}");
        self.frame_index += 1;
        Ok(stats)
    }

    /// `update` followed by `render`.
    pub fn frame(&mut self, input: &FrameInput) -> Result<FrameStats, FrameError> {
        self.update(input)?;
        self.render()
    }

    /// Releases every device object.
    pub fn shutdown(self) {
        self.context.destroy();
    }
}
