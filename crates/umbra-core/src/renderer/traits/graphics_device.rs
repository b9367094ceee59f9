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
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::traits::CommandEncoder;
use std::fmt::Debug;

/// The device capability the engine drives every GPU operation through.
///
/// Resources are referred to by opaque IDs. The engine never assumes anything about
/// their numeric value; ownership of each ID belongs to the cache that created it.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Queries the hardware limits used to size and align uniform data.
    ///
    /// ## Errors
    /// * `RenderError::CapabilityQueryFailed` - If the device cannot answer. Fatal.
    fn limits(&self) -> Result<DeviceLimits, RenderError>;

    /// Creates a new, zero-filled GPU buffer.
    /// ## Arguments
    /// * `descriptor` - Size, usage and label of the buffer.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Creates a new GPU buffer initialized with `data`.
    /// `descriptor.size` must equal `data.len()`.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Writes `data` into a buffer at `offset` bytes.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the write does not fit in the buffer.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Destroys a GPU buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Creates a new 2D texture with undefined contents.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Uploads a full image into the base level of a texture.
    ///
    /// `data` is tightly packed, row 0 first, and must hold exactly
    /// `width * height * bytes_per_texel` bytes. Mipmapped textures have their
    /// chain rebuilt.
    fn write_texture(&self, id: TextureId, data: &[u8]) -> Result<(), ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Compiles both stages of a program and links them.
    ///
    /// Compile and link failures are not errors of this call: they are reported in
    /// [`ProgramBuild::errors`] next to a handle that is still valid to destroy.
    /// ## Errors
    /// * `ResourceError` - Only if no program object could be created at all.
    fn create_program(&self, descriptor: &ProgramDescriptor) -> Result<ProgramBuild, ResourceError>;

    /// Enumerates the active vertex inputs of a linked program.
    /// A program that failed to link has none.
    fn program_vertex_inputs(
        &self,
        program: ProgramHandle,
    ) -> Result<Vec<ActiveVertexInput>, ResourceError>;

    /// Destroys a program object.
    fn destroy_program(&self, program: ProgramHandle) -> Result<(), ResourceError>;

    /// Creates a vertex binding object over a vertex/index buffer pair.
    fn create_vertex_binding(
        &self,
        descriptor: &VertexBindingDescriptor,
    ) -> Result<BindObjectId, ResourceError>;

    /// Destroys a vertex binding object.
    fn destroy_vertex_binding(&self, id: BindObjectId) -> Result<(), ResourceError>;

    /// Assembles textures into an offscreen framebuffer.
    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor,
    ) -> Result<FramebufferId, ResourceError>;

    /// Checks whether a framebuffer can be rendered to.
    fn framebuffer_status(&self, id: FramebufferId) -> Result<FramebufferStatus, ResourceError>;

    /// Destroys a framebuffer. Its attachments are left untouched.
    fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError>;

    /// Creates a new command encoder to record GPU commands.
    fn create_command_encoder(&self, label: Option<&str>) -> Box<dyn CommandEncoder>;

    /// Submits a previously recorded command buffer for execution.
    fn submit_command_buffer(&self, command_buffer: CommandBufferId);
}
