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

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};

use umbra_core::renderer::{
    BindObjectId, BufferId, CommandBufferId, CommandEncoder, ProgramHandle, RenderPass,
    RenderPassDescriptor, RenderTarget, TextureId, UniformRange,
};

use super::device::HeadlessState;

/// One command recorded inside a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    /// `RenderPass::set_program`.
    SetProgram(ProgramHandle),
    /// `RenderPass::set_vertex_binding`.
    SetVertexBinding(BindObjectId),
    /// `RenderPass::set_uniform_range`.
    SetUniformRange {
        /// Binding slot.
        slot: u32,
        /// Source buffer.
        buffer: BufferId,
        /// Exposed byte range.
        range: UniformRange,
    },
    /// `RenderPass::set_texture`.
    SetTexture {
        /// Sampling unit.
        unit: u32,
        /// Bound texture, `None` clears the unit.
        texture: Option<TextureId>,
    },
    /// `RenderPass::draw_indexed`.
    DrawIndexed {
        /// Index range.
        indices: Range<u32>,
        /// Value added to each index.
        base_vertex: i32,
    },
}

/// The full pipeline state in effect when a draw was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    /// Program in use, if any was set.
    pub program: Option<ProgramHandle>,
    /// Vertex binding in use, if any was set.
    pub binding: Option<BindObjectId>,
    /// Uniform ranges by slot.
    pub uniforms: BTreeMap<u32, (BufferId, UniformRange)>,
    /// Textures by unit. Cleared units are absent.
    pub textures: BTreeMap<u32, TextureId>,
    /// Index range of the draw.
    pub indices: Range<u32>,
    /// Base vertex of the draw.
    pub base_vertex: i32,
}

impl DrawCall {
    /// Number of indices the draw consumes.
    pub fn index_count(&self) -> u32 {
        self.indices.end.saturating_sub(self.indices.start)
    }
}

/// A render pass as it was submitted to the headless device.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPass {
    pub label: Option<String>,
    pub target: RenderTarget,
    pub clear_color: Option<[f32; 4]>,
    pub clear_depth: Option<f32>,
    pub depth_test: bool,
    pub commands: Vec<RecordedCommand>,
}

impl RecordedPass {
    /// Replays the commands and snapshots the state at every draw.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        let mut program = None;
        let mut binding = None;
        let mut uniforms = BTreeMap::new();
        let mut textures = BTreeMap::new();
        let mut draws = Vec::new();

        for command in &self.commands {
            match command {
                RecordedCommand::SetProgram(p) => program = Some(*p),
                RecordedCommand::SetVertexBinding(b) => binding = Some(*b),
                RecordedCommand::SetUniformRange {
                    slot,
                    buffer,
                    range,
                } => {
                    uniforms.insert(*slot, (*buffer, *range));
                }
                RecordedCommand::SetTexture { unit, texture } => match texture {
                    Some(texture) => {
                        textures.insert(*unit, *texture);
                    }
                    None => {
                        textures.remove(unit);
                    }
                },
                RecordedCommand::DrawIndexed {
                    indices,
                    base_vertex,
                } => draws.push(DrawCall {
                    program,
                    binding,
                    uniforms: uniforms.clone(),
                    textures: textures.clone(),
                    indices: indices.clone(),
                    base_vertex: *base_vertex,
                }),
            }
        }
        draws
    }
}

/// Records passes in memory until `finish`.
pub(crate) struct HeadlessCommandEncoder {
    pub(crate) state: Arc<Mutex<HeadlessState>>,
    pub(crate) label: Option<String>,
    pub(crate) passes: Vec<RecordedPass>,
}

struct HeadlessRenderPass<'encoder> {
    sink: &'encoder mut Vec<RecordedPass>,
    pass: Option<RecordedPass>,
}

impl HeadlessRenderPass<'_> {
    fn record(&mut self, command: RecordedCommand) {
        if let Some(pass) = self.pass.as_mut() {
            pass.commands.push(command);
        }
    }
}

impl RenderPass for HeadlessRenderPass<'_> {
    fn set_program(&mut self, program: ProgramHandle) {
        self.record(RecordedCommand::SetProgram(program));
    }

    fn set_vertex_binding(&mut self, binding: BindObjectId) {
        self.record(RecordedCommand::SetVertexBinding(binding));
    }

    fn set_uniform_range(&mut self, slot: u32, buffer: BufferId, range: UniformRange) {
        self.record(RecordedCommand::SetUniformRange {
            slot,
            buffer,
            range,
        });
    }

    fn set_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        self.record(RecordedCommand::SetTexture { unit, texture });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32) {
        self.record(RecordedCommand::DrawIndexed {
            indices,
            base_vertex,
        });
    }
}

impl Drop for HeadlessRenderPass<'_> {
    fn drop(&mut self) {
        if let Some(pass) = self.pass.take() {
            self.sink.push(pass);
        }
    }
}

impl CommandEncoder for HeadlessCommandEncoder {
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Box<dyn RenderPass + 'encoder> {
        let pass = RecordedPass {
            label: descriptor.label.as_ref().map(|l| l.to_string()),
            target: descriptor.target,
            clear_color: descriptor.clear_color,
            clear_depth: descriptor.clear_depth,
            depth_test: descriptor.depth_test,
            commands: Vec::new(),
        };
        Box::new(HeadlessRenderPass {
            sink: &mut self.passes,
            pass: Some(pass),
        })
    }

    fn finish(self: Box<Self>) -> CommandBufferId {
        let HeadlessCommandEncoder {
            state,
            label,
            passes,
        } = *self;
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        let id = CommandBufferId(state.allocate_id());
        log::debug!(
            "HeadlessCommandEncoder: Finished '{}' with {} pass(es) as {:?}",
            label.as_deref().unwrap_or_default(),
            passes.len(),
            id
        );
        state.pending.insert(id.0, passes);
        id
    }
}
