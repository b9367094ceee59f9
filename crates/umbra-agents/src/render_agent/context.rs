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

//! The render context: every cache, target and collaborator the frame loop uses,
//! owned in one place and passed explicitly.

use std::path::Path;
use std::sync::Arc;

use umbra_core::asset::{ImageDecoder, SceneImporter, SourceProvider};
use umbra_core::renderer::{DeviceLimits, GraphicsDevice, RenderError, TextureId};
use umbra_data::geometry::{GeometryStore, ModelId};
use umbra_data::program::{ProgramId, ProgramRegistry};
use umbra_data::texture::{TextureCache, TextureHandle};
use umbra_data::uniform::FrameUniformAllocator;
use umbra_lanes::render_lane::{CompositeLane, FullscreenQuad, GBuffer, GeometryLane};

use crate::config::{RenderSettings, ShaderPaths};

/// The content collaborators the context reads through.
pub struct Collaborators {
    /// Program source text and modification times.
    pub sources: Box<dyn SourceProvider>,
    /// Image files.
    pub decoder: Box<dyn ImageDecoder>,
    /// Scene files.
    pub importer: Box<dyn SceneImporter>,
}

/// The three programs every mode draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSet {
    /// Textured quad and G-buffer composite.
    pub quad: ProgramId,
    /// Lit meshes.
    pub mesh: ProgramId,
    /// Depth attachment visualization.
    pub depth_view: ProgramId,
}

/// Owns the renderer's state.
///
/// Caches are populated at init, on model loads and on hot-reload; the uniform
/// allocator is refilled every frame. Nothing here is shared between threads.
pub struct RenderContext {
    pub(crate) device: Arc<dyn GraphicsDevice>,
    pub(crate) limits: DeviceLimits,
    pub(crate) settings: RenderSettings,
    pub(crate) programs: ProgramRegistry,
    pub(crate) shaders: ShaderSet,
    pub(crate) textures: TextureCache,
    pub(crate) geometry: GeometryStore,
    pub(crate) uniforms: FrameUniformAllocator,
    pub(crate) gbuffer: GBuffer,
    pub(crate) geometry_lane: GeometryLane,
    pub(crate) composite_lane: CompositeLane,
    pub(crate) quad_texture: Option<TextureHandle>,
    collaborators: Collaborators,
}

impl RenderContext {
    /// Queries the device, builds the programs and creates every target.
    ///
    /// A program that fails to build does not abort startup; its diagnostics are
    /// logged and it can be fixed through hot-reload.
    ///
    /// ## Errors
    /// * `RenderError::CapabilityQueryFailed` - The device limits are unavailable.
    /// * `RenderError::IncompleteFramebuffer` - The G-buffer is not renderable.
    /// * `RenderError::InitializationFailed` - A program object could not be created.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        settings: RenderSettings,
        shader_paths: &ShaderPaths,
        collaborators: Collaborators,
    ) -> Result<Self, RenderError> {
        let limits = device.limits()?;
        log::info!(
            "RenderContext: Uniform block size {} bytes, offset alignment {}",
            limits.max_uniform_block_size,
            limits.min_uniform_block_offset_alignment
        );

        let mut programs = ProgramRegistry::new();
        let mut load = |path: &Path, name: &str| {
            programs
                .load(device.as_ref(), collaborators.sources.as_ref(), path, name)
                .map_err(|e| RenderError::InitializationFailed(format!("program '{name}': {e}")))
        };
        let shaders = ShaderSet {
            quad: load(&shader_paths.quad, "quad")?,
            mesh: load(&shader_paths.mesh, "mesh")?,
            depth_view: load(&shader_paths.depth_view, "depth_view")?,
        };

        let uniforms = FrameUniformAllocator::new(device.as_ref(), &limits)?;
        let gbuffer = match GBuffer::create(device.as_ref(), settings.width, settings.height) {
            Ok(gbuffer) => gbuffer,
            Err(e) => {
                uniforms.destroy(device.as_ref());
                programs.destroy_all(device.as_ref());
                return Err(e);
            }
        };
        let mut geometry = GeometryStore::new();
        let quad = FullscreenQuad::new(device.as_ref(), &mut geometry)?;

        Ok(Self {
            device,
            limits,
            settings,
            programs,
            shaders,
            textures: TextureCache::new(),
            geometry,
            uniforms,
            gbuffer,
            geometry_lane: GeometryLane::new(),
            composite_lane: CompositeLane::new(quad),
            quad_texture: None,
            collaborators,
        })
    }

    /// Imports a scene file as a model. Failures are logged and yield `None`.
    pub fn load_model(&mut self, path: &Path) -> Option<ModelId> {
        self.geometry.load_model(
            self.device.as_ref(),
            self.collaborators.importer.as_ref(),
            self.collaborators.decoder.as_ref(),
            &mut self.textures,
            path,
        )
    }

    /// Loads a texture through the shared cache.
    pub fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        self.textures.load_texture_2d(
            self.device.as_ref(),
            self.collaborators.decoder.as_ref(),
            path,
        )
    }

    /// Sets the image shown in textured-quad mode. Returns whether it loaded.
    pub fn set_quad_texture(&mut self, path: &Path) -> bool {
        self.quad_texture = self.load_texture(path);
        self.quad_texture.is_some()
    }

    /// The device texture shown in textured-quad mode.
    pub fn quad_texture(&self) -> Option<TextureId> {
        self.quad_texture
            .and_then(|handle| self.textures.texture_id(handle))
    }

    /// Rebuilds programs whose source changed and evicts the bind objects created
    /// against their old handles. Returns the reloaded identities.
    pub fn hot_reload(&mut self) -> Vec<ProgramId> {
        let reloaded = self
            .programs
            .tick(self.device.as_ref(), self.collaborators.sources.as_ref());
        for &id in &reloaded {
            let evicted: usize = self
                .geometry
                .meshes_mut()
                .map(|mesh| mesh.evict_program(self.device.as_ref(), id))
                .sum();
            log::debug!("RenderContext: {id:?} reloaded, {evicted} bind(s) evicted");
        }
        reloaded
    }

    /// Recreates the G-buffer for a new display size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.gbuffer.resize(self.device.as_ref(), width, height)?;
        self.settings.width = width;
        self.settings.height = height;
        Ok(())
    }

    /// The device.
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    /// Limits queried at init.
    pub fn limits(&self) -> &DeviceLimits {
        &self.limits
    }

    /// Display size and clear color.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The program registry.
    pub fn programs(&self) -> &ProgramRegistry {
        &self.programs
    }

    /// Identities of the built-in programs.
    pub fn shaders(&self) -> ShaderSet {
        self.shaders
    }

    /// The texture cache.
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// The geometry store.
    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    /// The frame uniform allocator.
    pub fn uniforms(&self) -> &FrameUniformAllocator {
        &self.uniforms
    }

    /// The G-buffer.
    pub fn gbuffer(&self) -> &GBuffer {
        &self.gbuffer
    }

    /// Releases every device object the context owns.
    pub fn destroy(mut self) {
        let device = self.device.as_ref();
        self.geometry.destroy_all(device);
        self.textures.destroy_all(device);
        self.programs.destroy_all(device);
        self.gbuffer.destroy(device);
        self.uniforms.destroy(device);
        log::info!("RenderContext: Destroyed");
    }
}
