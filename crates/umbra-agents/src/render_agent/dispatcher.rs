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

//! Mode selection and the pass sequence of each mode.

use umbra_core::renderer::{BufferId, CommandEncoder, RenderTarget, TextureId};
use umbra_data::program::{Program, ProgramId, ProgramRegistry};
use umbra_data::scene::Entity;
use umbra_lanes::render_lane::{CompositePass, FrameBindings, GeometryPass};

use super::context::RenderContext;
use super::frame::FrameError;
use super::mode::RenderMode;

/// What a dispatched mode recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// Render passes begun.
    pub passes: usize,
    /// Draws issued.
    pub draws: usize,
}

impl DispatchStats {
    fn add(&mut self, draws: usize) {
        self.passes += 1;
        self.draws += draws;
    }
}

/// This frame's packed scene, as the passes read it.
#[derive(Debug, Clone, Copy)]
pub struct FrameScene<'a> {
    /// Closed uniform buffer.
    pub uniform_buffer: BufferId,
    /// Ranges inside `uniform_buffer`.
    pub bindings: FrameBindings,
    /// Entities with their uniform ranges filled in.
    pub entities: &'a [Entity],
}

/// Holds the current mode and encodes its passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDispatcher {
    mode: RenderMode,
}

impl ModeDispatcher {
    /// Starts in `mode`.
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// The current mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switches mode. Selecting the current mode does nothing. Returns whether the
    /// mode changed.
    pub fn select(&mut self, mode: RenderMode) -> bool {
        if mode == self.mode {
            return false;
        }
        log::info!("ModeDispatcher: {} -> {}", self.mode, mode);
        self.mode = mode;
        true
    }

    /// Encodes the current mode's passes.
    ///
    /// Modes that read the G-buffer first draw the scene into it, then composite
    /// the attachments they show onto the screen.
    pub fn dispatch(
        &self,
        context: &mut RenderContext,
        encoder: &mut dyn CommandEncoder,
        scene: &FrameScene<'_>,
    ) -> Result<DispatchStats, FrameError> {
        let mut stats = DispatchStats::default();
        if self.mode.uses_gbuffer() {
            let target = context.gbuffer.target();
            stats.add(geometry(context, encoder, "GBuffer Geometry", target, scene)?);
        }

        match self.mode {
            RenderMode::TexturedQuad => {
                let textures: Vec<TextureId> = context.quad_texture().into_iter().collect();
                if textures.is_empty() {
                    log::warn!("ModeDispatcher: No quad texture loaded, drawing the quad untextured");
                }
                stats.add(composite(context, encoder, "Textured Quad", Composite::Quad, &textures)?);
            }
            RenderMode::Mesh => {
                stats.add(geometry(context, encoder, "Mesh", RenderTarget::Screen, scene)?);
            }
            RenderMode::Framebuffer => {
                let textures = *context.gbuffer.color_attachments();
                stats.add(composite(context, encoder, "Composite", Composite::Quad, &textures)?);
            }
            RenderMode::Albedo | RenderMode::Normal | RenderMode::Position => {
                let textures: Vec<TextureId> = self
                    .mode
                    .debug_attachment()
                    .map(|attachment| context.gbuffer.attachment(attachment))
                    .into_iter()
                    .collect();
                let label = format!("{} View", self.mode);
                stats.add(composite(context, encoder, &label, Composite::Quad, &textures)?);
            }
            RenderMode::Depth => {
                let depth = context.gbuffer.depth();
                stats.add(composite(context, encoder, "Depth View", Composite::DepthView, &[depth])?);
            }
        }
        Ok(stats)
    }
}

fn registered(programs: &ProgramRegistry, id: ProgramId) -> Result<&Program, FrameError> {
    programs.get(id).ok_or(FrameError::UnknownProgram(id))
}

#[derive(Debug, Clone, Copy)]
enum Composite {
    Quad,
    DepthView,
}

fn geometry(
    context: &mut RenderContext,
    encoder: &mut dyn CommandEncoder,
    label: &str,
    target: RenderTarget,
    scene: &FrameScene<'_>,
) -> Result<usize, FrameError> {
    let program = registered(&context.programs, context.shaders.mesh)?;
    let pass = GeometryPass {
        label,
        target,
        clear_color: context.settings.clear_color,
        program,
        uniform_buffer: scene.uniform_buffer,
        global: scene.bindings.global,
        entities: scene.entities,
    };
    let draws = context.geometry_lane.record(
        context.device.as_ref(),
        encoder,
        &mut context.geometry,
        &context.textures,
        &pass,
    )?;
    Ok(draws)
}

fn composite(
    context: &mut RenderContext,
    encoder: &mut dyn CommandEncoder,
    label: &str,
    which: Composite,
    textures: &[TextureId],
) -> Result<usize, FrameError> {
    let id = match which {
        Composite::Quad => context.shaders.quad,
        Composite::DepthView => context.shaders.depth_view,
    };
    let program = registered(&context.programs, id)?;
    let pass = CompositePass {
        label,
        clear_color: context.settings.clear_color,
        program,
        textures,
    };
    let draws = context.composite_lane.record(
        context.device.as_ref(),
        encoder,
        &mut context.geometry,
        &pass,
    )?;
    Ok(draws)
}
