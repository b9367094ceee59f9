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

use crate::renderer::api::*;
use std::ops::Range;

/// Records the state changes and draws of a single render pass.
///
/// State set on a pass persists until changed or until the pass ends.
pub trait RenderPass {
    /// Selects the program used by subsequent draws.
    fn set_program(&mut self, program: ProgramHandle);

    /// Selects the vertex binding (vertex + index buffers and attribute wiring).
    fn set_vertex_binding(&mut self, binding: BindObjectId);

    /// Exposes `range` of a uniform `buffer` at binding `slot`.
    fn set_uniform_range(&mut self, slot: u32, buffer: BufferId, range: UniformRange);

    /// Binds a texture to a sampling unit, or clears the unit with `None`.
    fn set_texture(&mut self, unit: u32, texture: Option<TextureId>);

    /// Draws indexed triangles. `indices` is a range of elements of the bound
    /// index buffer; `base_vertex` is added to every fetched index.
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32);
}

/// Records render passes into a command buffer.
pub trait CommandEncoder {
    /// Begins a render pass. The pass ends when the returned box is dropped.
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Box<dyn RenderPass + 'encoder>;

    /// Finishes recording and returns a handle ready for submission.
    fn finish(self: Box<Self>) -> CommandBufferId;
}
