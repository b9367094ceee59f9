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

/// Attribute location of vertex positions (3 floats).
pub const POSITION_LOCATION: u32 = 0;
/// Attribute location of vertex normals (3 floats).
pub const NORMAL_LOCATION: u32 = 1;
/// Attribute location of texture coordinates (2 floats).
pub const TEX_COORD_LOCATION: u32 = 2;
/// Attribute location of tangents (3 floats).
pub const TANGENT_LOCATION: u32 = 3;
/// Attribute location of bitangents (3 floats).
pub const BITANGENT_LOCATION: u32 = 4;

const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// Where one attribute lives inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeSlot {
    /// Attribute location it feeds.
    pub location: u32,
    /// Number of `f32` components.
    pub component_count: u32,
    /// Offset from the start of the vertex.
    pub byte_offset: u64,
}

/// The interleaved vertex format of one submesh.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferLayout {
    slots: Vec<VertexAttributeSlot>,
    stride: u64,
}

impl BufferLayout {
    /// Builds a layout from `(location, component_count)` pairs, packed in order.
    pub fn from_attributes(attributes: &[(u32, u32)]) -> Self {
        let mut slots = Vec::with_capacity(attributes.len());
        let mut offset = 0;
        for &(location, component_count) in attributes {
            slots.push(VertexAttributeSlot {
                location,
                component_count,
                byte_offset: offset,
            });
            offset += u64::from(component_count) * FLOAT_SIZE;
        }
        Self {
            slots,
            stride: offset,
        }
    }

    /// The layout of an imported mesh: position and normal, then optional texture
    /// coordinates, then an optional tangent/bitangent pair.
    pub fn for_mesh(has_tex_coords: bool, has_tangent_space: bool) -> Self {
        let mut attributes = vec![(POSITION_LOCATION, 3), (NORMAL_LOCATION, 3)];
        if has_tex_coords {
            attributes.push((TEX_COORD_LOCATION, 2));
        }
        if has_tangent_space {
            attributes.push((TANGENT_LOCATION, 3));
            attributes.push((BITANGENT_LOCATION, 3));
        }
        Self::from_attributes(&attributes)
    }

    /// Returns the slot feeding `location`.
    pub fn slot(&self, location: u32) -> Option<&VertexAttributeSlot> {
        self.slots.iter().find(|slot| slot.location == location)
    }

    /// All slots, in interleave order.
    pub fn slots(&self) -> &[VertexAttributeSlot] {
        &self.slots
    }

    /// Size of one vertex in bytes.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of `f32`s per vertex.
    pub fn floats_per_vertex(&self) -> usize {
        (self.stride / FLOAT_SIZE) as usize
    }
}
