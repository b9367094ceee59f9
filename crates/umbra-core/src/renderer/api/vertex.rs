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

//! Vertex bindings: device objects that wire buffer bytes to program inputs.

use crate::renderer::api::buffer::BufferId;
use std::borrow::Cow;

/// An opaque handle to a vertex binding object on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindObjectId(pub usize);

/// How one program input reads floats out of the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeBinding {
    /// Program attribute location.
    pub location: u32,
    /// Number of consecutive 32-bit floats to read.
    pub component_count: u32,
    /// Byte offset of the first component of the first vertex.
    pub byte_offset: u64,
    /// Bytes between two consecutive vertices.
    pub stride: u64,
}

/// A descriptor used to create a [`BindObjectId`].
#[derive(Debug, Clone)]
pub struct VertexBindingDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Buffer holding interleaved vertex records.
    pub vertex_buffer: BufferId,
    /// Buffer holding 32-bit indices.
    pub index_buffer: BufferId,
    /// One entry per program input.
    pub attributes: Vec<VertexAttributeBinding>,
}
