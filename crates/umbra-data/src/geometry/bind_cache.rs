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

//! Negotiation of vertex bindings between program inputs and submesh layouts.

use std::borrow::Cow;

use thiserror::Error;
use umbra_core::renderer::{
    BindObjectId, GraphicsDevice, ResourceError, VertexAttributeBinding, VertexBindingDescriptor,
};

use super::mesh::{BindObject, Mesh};
use crate::program::{Program, ProgramId};

/// Errors raised while resolving a bind object.
#[derive(Debug, Error)]
pub enum BindError {
    /// The program reads an attribute the submesh does not provide. This is a
    /// contract violation between assets and shaders and is not recoverable.
    #[error("program '{program}' reads location {location}, which submesh {submesh} of '{mesh}' does not provide")]
    MissingAttribute {
        /// Program name.
        program: String,
        /// Mesh label.
        mesh: String,
        /// Submesh index.
        submesh: usize,
        /// Unmatched input location.
        location: u32,
    },
    /// The submesh index is out of range.
    #[error("mesh '{mesh}' has no submesh {submesh}")]
    InvalidSubmesh {
        /// Mesh label.
        mesh: String,
        /// Requested index.
        submesh: usize,
    },
    /// The device failed to create the binding.
    #[error("device failed to create a vertex binding: {0}")]
    Device(#[from] ResourceError),
}

impl Mesh {
    /// Returns the bind object wiring `program`'s inputs to submesh `submesh`,
    /// creating and caching it on first use.
    ///
    /// Each program input is matched to the layout slot with the same location and
    /// read at `slot.byte_offset + submesh.vertex_byte_offset` with the layout's
    /// stride. Slots the program does not read are ignored. A cached bind whose
    /// program handle is no longer current is destroyed and rebuilt.
    pub fn find_or_create_bind(
        &mut self,
        device: &dyn GraphicsDevice,
        submesh: usize,
        program: &Program,
    ) -> Result<BindObjectId, BindError> {
        let (vertex_buffer, index_buffer) = (self.vertex_buffer, self.index_buffer);
        let label = self.label.clone();
        let target = self
            .submeshes
            .get_mut(submesh)
            .ok_or_else(|| BindError::InvalidSubmesh {
                mesh: label.clone(),
                submesh,
            })?;

        if let Some(position) = target.binds.iter().position(|b| b.program == program.id()) {
            let cached = target.binds[position];
            if cached.program_handle == program.handle() {
                return Ok(cached.handle);
            }
            log::debug!(
                "BindCache: Bind {:?} of '{label}'[{submesh}] is stale for '{}', rebuilding",
                cached.handle,
                program.name()
            );
            target.binds.swap_remove(position);
            if let Err(e) = device.destroy_vertex_binding(cached.handle) {
                log::warn!("BindCache: Failed to destroy stale bind {:?}: {e}", cached.handle);
            }
        }

        let mut attributes = Vec::with_capacity(program.inputs().len());
        for input in program.inputs() {
            let Some(slot) = target.layout.slot(input.location) else {
                let error = BindError::MissingAttribute {
                    program: program.name().to_string(),
                    mesh: label,
                    submesh,
                    location: input.location,
                };
                log::error!("BindCache: {error}");
                return Err(error);
            };
            if slot.component_count != input.component_count {
                log::debug!(
                    "BindCache: '{}' reads {} component(s) at location {}, '{label}'[{submesh}] stores {}",
                    program.name(),
                    input.component_count,
                    input.location,
                    slot.component_count
                );
            }
            attributes.push(VertexAttributeBinding {
                location: slot.location,
                component_count: slot.component_count,
                byte_offset: slot.byte_offset + target.vertex_byte_offset,
                stride: target.layout.stride(),
            });
        }

        let bind_label = format!("{label}[{submesh}]/{}", program.name());
        let handle = device.create_vertex_binding(&VertexBindingDescriptor {
            label: Some(Cow::Borrowed(&bind_label)),
            vertex_buffer,
            index_buffer,
            attributes,
        })?;
        target.binds.push(BindObject {
            handle,
            program: program.id(),
            program_handle: program.handle(),
        });
        log::debug!("BindCache: Created {handle:?} for {bind_label}");
        Ok(handle)
    }

    /// Destroys every bind object negotiated against `program`. Returns how many
    /// were removed.
    pub fn evict_program(&mut self, device: &dyn GraphicsDevice, program: ProgramId) -> usize {
        let mut evicted = 0;
        for submesh in &mut self.submeshes {
            submesh.binds.retain(|bind| {
                if bind.program != program {
                    return true;
                }
                if let Err(e) = device.destroy_vertex_binding(bind.handle) {
                    log::warn!("BindCache: Failed to destroy bind {:?}: {e}", bind.handle);
                }
                evicted += 1;
                false
            });
        }
        if evicted > 0 {
            log::debug!(
                "BindCache: Evicted {evicted} bind(s) of {program:?} from '{}'",
                self.label
            );
        }
        evicted
    }
}
