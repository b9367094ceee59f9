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

//! Linear, alignment-aware sub-allocation of a single uniform buffer.
//!
//! Every frame the allocator is rewound and refilled:
//!
//! ```text
//! begin_frame()  -> head = 0, writable
//! push_*()       -> append raw bytes at head, no implicit padding
//! align_to(k)    -> head = next multiple of k, nothing written
//! end_frame()    -> upload [0, head) to the device, readable
//! ```
//!
//! Writes land in a CPU staging area first, so nothing may read the device buffer
//! until `end_frame` has run.

use std::borrow::Cow;

use glam::{Mat4, Vec3};
use thiserror::Error;
use umbra_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, DeviceLimits, GraphicsDevice, ResourceError,
    UniformRange,
};

/// Errors raised by [`FrameUniformAllocator`].
#[derive(Debug, Error)]
pub enum UniformError {
    /// A push or alignment was attempted outside `begin_frame`/`end_frame`.
    #[error("uniform writer is not open; call begin_frame first")]
    NotOpen,
    /// The buffer was read before the frame's data was uploaded.
    #[error("uniform data read before end_frame")]
    NotClosed,
    /// The frame needs more bytes than the device allows in one uniform block.
    /// This is a configuration error: fewer entities or lights must be submitted.
    #[error("uniform data needs {requested} bytes, capacity is {capacity}")]
    CapacityExceeded {
        /// Head position the write would have reached.
        requested: u64,
        /// Buffer capacity.
        capacity: u64,
    },
    /// The upload failed.
    #[error("uniform upload failed: {0}")]
    Device(#[from] ResourceError),
}

/// Rounds `value` up to the next multiple of `alignment`. Alignments of 0 and 1
/// leave the value unchanged.
pub fn align_up(value: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        return value;
    }
    value.div_ceil(alignment) * alignment
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    Idle,
    Open,
    Closed,
}

/// A write head over one device buffer of fixed capacity.
#[derive(Debug)]
pub struct FrameUniformAllocator {
    buffer: BufferId,
    capacity: u64,
    alignment: u64,
    staging: Vec<u8>,
    state: FrameState,
}

impl FrameUniformAllocator {
    /// Creates the shared buffer, sized to the device's maximum uniform block.
    pub fn new(device: &dyn GraphicsDevice, limits: &DeviceLimits) -> Result<Self, ResourceError> {
        let capacity = limits.max_uniform_block_size;
        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some(Cow::Borrowed("Frame Uniforms")),
            size: capacity,
            usage: BufferUsage::Uniform,
        })?;
        log::info!(
            "FrameUniformAllocator: Created {buffer:?} ({capacity} bytes, {}-byte block alignment)",
            limits.min_uniform_block_offset_alignment
        );
        Ok(Self {
            buffer,
            capacity,
            alignment: limits.min_uniform_block_offset_alignment.max(1),
            staging: Vec::with_capacity(capacity as usize),
            state: FrameState::Idle,
        })
    }

    /// Rewinds the head and opens the writer.
    pub fn begin_frame(&mut self) {
        self.staging.clear();
        self.state = FrameState::Open;
    }

    /// Current write position.
    pub fn head(&self) -> u64 {
        self.staging.len() as u64
    }

    /// Buffer size in bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// The device's minimum offset alignment for uniform blocks.
    pub fn block_alignment(&self) -> u64 {
        self.alignment
    }

    fn ensure_open(&self) -> Result<(), UniformError> {
        match self.state {
            FrameState::Open => Ok(()),
            FrameState::Idle | FrameState::Closed => Err(UniformError::NotOpen),
        }
    }

    fn reserve(&self, new_head: u64) -> Result<(), UniformError> {
        if new_head > self.capacity {
            log::error!(
                "FrameUniformAllocator: Frame needs {new_head} bytes, capacity is {}",
                self.capacity
            );
            return Err(UniformError::CapacityExceeded {
                requested: new_head,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Appends raw bytes at the head.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), UniformError> {
        self.ensure_open()?;
        self.reserve(self.head() + bytes.len() as u64)?;
        self.staging.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends one `f32`.
    pub fn push_scalar(&mut self, value: f32) -> Result<(), UniformError> {
        self.push_bytes(bytemuck::bytes_of(&value))
    }

    /// Appends one `i32`.
    pub fn push_int(&mut self, value: i32) -> Result<(), UniformError> {
        self.push_bytes(bytemuck::bytes_of(&value))
    }

    /// Appends three `f32`s (12 bytes).
    pub fn push_vec3(&mut self, value: Vec3) -> Result<(), UniformError> {
        self.push_bytes(bytemuck::bytes_of(&value))
    }

    /// Appends a column-major 4x4 matrix (64 bytes).
    pub fn push_mat4(&mut self, value: &Mat4) -> Result<(), UniformError> {
        self.push_bytes(bytemuck::bytes_of(value))
    }

    /// Advances the head to the next multiple of `alignment` without writing
    /// anything meaningful. Returns the new head.
    pub fn align_to(&mut self, alignment: u64) -> Result<u64, UniformError> {
        self.ensure_open()?;
        let aligned = align_up(self.head(), alignment);
        self.reserve(aligned)?;
        self.staging.resize(aligned as usize, 0);
        Ok(aligned)
    }

    /// Aligns the head to the device's block alignment.
    pub fn align_to_block(&mut self) -> Result<u64, UniformError> {
        self.align_to(self.alignment)
    }

    /// The range written since `start`.
    pub fn range_since(&self, start: u64) -> UniformRange {
        UniformRange {
            offset: start,
            size: self.head().saturating_sub(start),
        }
    }

    /// Closes the writer and uploads `[0, head)`.
    pub fn end_frame(&mut self, device: &dyn GraphicsDevice) -> Result<(), UniformError> {
        self.ensure_open()?;
        if !self.staging.is_empty() {
            device.write_buffer(self.buffer, 0, &self.staging)?;
        }
        self.state = FrameState::Closed;
        log::trace!(
            "FrameUniformAllocator: Uploaded {} of {} bytes",
            self.staging.len(),
            self.capacity
        );
        Ok(())
    }

    /// The device buffer, for binding. Only valid between `end_frame` and the next
    /// `begin_frame`.
    pub fn buffer(&self) -> Result<BufferId, UniformError> {
        match self.state {
            FrameState::Closed => Ok(self.buffer),
            FrameState::Idle | FrameState::Open => Err(UniformError::NotClosed),
        }
    }

    /// Releases the device buffer.
    pub fn destroy(self, device: &dyn GraphicsDevice) {
        if let Err(e) = device.destroy_buffer(self.buffer) {
            log::warn!("FrameUniformAllocator: Failed to destroy {:?}: {e}", self.buffer);
        }
    }
}
