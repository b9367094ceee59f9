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

use umbra_core::asset::RawMesh;
use umbra_core::renderer::{BindObjectId, BufferId, GraphicsDevice, ProgramHandle};

use super::layout::BufferLayout;
use crate::program::ProgramId;

/// A device vertex binding created for one (submesh, program) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindObject {
    /// Device object.
    pub handle: BindObjectId,
    /// Program identity the bind was negotiated against.
    pub program: ProgramId,
    /// Program handle current at creation time.
    pub program_handle: ProgramHandle,
}

/// One draw range of a [`Mesh`], with its own vertex layout.
#[derive(Debug, Clone)]
pub struct Submesh {
    pub(crate) layout: BufferLayout,
    pub(crate) vertices: Vec<f32>,
    pub(crate) indices: Vec<u32>,
    pub(crate) vertex_byte_offset: u64,
    pub(crate) index_byte_offset: u64,
    pub(crate) binds: Vec<BindObject>,
}

impl Submesh {
    /// Interleaves a raw mesh according to the attributes it actually has.
    pub(crate) fn from_raw(raw: &RawMesh) -> Self {
        let count = raw.vertex_count();
        let tex_coords = raw.tex_coords.as_ref().filter(|uvs| {
            let complete = uvs.len() == count;
            if !complete {
                log::warn!(
                    "GeometryStore: '{}' has {} texture coordinates for {count} vertices, ignoring them",
                    raw.name,
                    uvs.len()
                );
            }
            complete
        });
        let tangent_space = match (&raw.tangents, &raw.bitangents) {
            (Some(t), Some(b)) if t.len() == count && b.len() == count => Some((t, b)),
            _ => None,
        };

        let layout = BufferLayout::for_mesh(tex_coords.is_some(), tangent_space.is_some());
        let mut vertices = Vec::with_capacity(count * layout.floats_per_vertex());
        for i in 0..count {
            vertices.extend_from_slice(&raw.positions[i]);
            vertices.extend_from_slice(&raw.normals.get(i).copied().unwrap_or([0.0; 3]));
            if let Some(uvs) = tex_coords {
                vertices.extend_from_slice(&uvs[i]);
            }
            if let Some((tangents, bitangents)) = tangent_space {
                vertices.extend_from_slice(&tangents[i]);
                vertices.extend_from_slice(&bitangents[i]);
            }
        }

        Self {
            layout,
            vertices,
            indices: raw.indices.clone(),
            vertex_byte_offset: 0,
            index_byte_offset: 0,
            binds: Vec::new(),
        }
    }

    /// The interleaved vertex format.
    pub fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// Interleaved vertex data.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Indices, local to this submesh's vertices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Byte offset of the first vertex in the mesh's vertex buffer.
    pub fn vertex_byte_offset(&self) -> u64 {
        self.vertex_byte_offset
    }

    /// Byte offset of the first index in the mesh's index buffer.
    pub fn index_byte_offset(&self) -> u64 {
        self.index_byte_offset
    }

    /// Position of the first index, in elements of the index buffer.
    pub fn first_index(&self) -> u32 {
        (self.index_byte_offset / std::mem::size_of::<u32>() as u64) as u32
    }

    /// Number of indices.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Bind objects cached so far.
    pub fn binds(&self) -> &[BindObject] {
        &self.binds
    }

    pub(crate) fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub(crate) fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Submeshes sharing one vertex buffer and one index buffer.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) label: String,
    pub(crate) submeshes: Vec<Submesh>,
    pub(crate) vertex_buffer: BufferId,
    pub(crate) index_buffer: BufferId,
}

impl Mesh {
    /// Label used for device objects.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Submeshes in draw order.
    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Shared vertex buffer.
    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    /// Shared index buffer.
    pub fn index_buffer(&self) -> BufferId {
        self.index_buffer
    }

    /// Releases every bind object and both buffers.
    pub fn destroy(self, device: &dyn GraphicsDevice) {
        for bind in self.submeshes.iter().flat_map(|s| s.binds.iter()) {
            if let Err(e) = device.destroy_vertex_binding(bind.handle) {
                log::warn!("Mesh: Failed to destroy bind {:?}: {e}", bind.handle);
            }
        }
        for buffer in [self.vertex_buffer, self.index_buffer] {
            if let Err(e) = device.destroy_buffer(buffer) {
                log::warn!("Mesh: Failed to destroy buffer {buffer:?} of '{}': {e}", self.label);
            }
        }
    }
}
