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

//! Defines data structures related to GPU buffer resources.

use std::borrow::Cow;

/// Describes what a [`BufferId`] will be bound as.
///
/// The device uses this to pick a memory placement and to validate later bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Interleaved vertex records.
    Vertex,
    /// 32-bit element indices.
    Index,
    /// Uniform blocks, bound by byte range to numbered slots.
    Uniform,
}

/// A descriptor used to create a [`BufferId`].
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// How the buffer will be bound.
    pub usage: BufferUsage,
}

/// An opaque handle to a GPU buffer resource.
///
/// Returned by [`GraphicsDevice::create_buffer`](crate::renderer::GraphicsDevice::create_buffer)
/// and used to reference the buffer in every subsequent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// A byte range inside a uniform buffer, exposed to shaders at a binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformRange {
    /// Start of the range, in bytes from the beginning of the buffer.
    pub offset: u64,
    /// Length of the range in bytes.
    pub size: u64,
}

impl UniformRange {
    /// One past the last byte of the range.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Returns `true` if the two ranges share at least one byte.
    pub fn overlaps(&self, other: &UniformRange) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}
