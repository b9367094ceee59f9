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

//! Depth-tested drawing of every entity's submeshes with a lit mesh program.

use std::borrow::Cow;

use umbra_core::renderer::{
    BufferId, CommandEncoder, GraphicsDevice, RenderPassDescriptor, RenderTarget, TextureId,
    UniformRange,
};
use umbra_data::geometry::GeometryStore;
use umbra_data::program::Program;
use umbra_data::scene::Entity;
use umbra_data::texture::TextureCache;

use super::{LaneError, ALBEDO_TEXTURE_UNIT, ENTITY_UNIFORM_SLOT, GLOBAL_UNIFORM_SLOT};

/// Inputs of one geometry pass.
#[derive(Debug, Clone, Copy)]
pub struct GeometryPass<'a> {
    /// Debug label of the pass.
    pub label: &'a str,
    /// The screen for forward drawing, the G-buffer for deferred modes.
    pub target: RenderTarget,
    /// Clear color of every color attachment.
    pub clear_color: [f32; 4],
    /// The mesh program.
    pub program: &'a Program,
    /// This frame's uniform buffer, closed.
    pub uniform_buffer: BufferId,
    /// The global block inside `uniform_buffer`.
    pub global: UniformRange,
    /// Packed entities.
    pub entities: &'a [Entity],
}

/// Encodes geometry passes.
///
/// For every entity the per-entity uniform block is bound, then every submesh of
/// its model is drawn over its whole index range with its albedo texture. Bind
/// objects are resolved through each mesh's cache, so the first draw of a
/// (submesh, program) pair creates one.
#[derive(Debug, Default)]
pub struct GeometryLane;

impl GeometryLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Records one geometry pass. Returns the number of draws.
    ///
    /// A program that failed to build only clears the target.
    ///
    /// ## Errors
    /// * `LaneError::Bind` - A submesh cannot satisfy the program's inputs.
    /// * `LaneError::UnpackedEntity` - An entity has no uniform block this frame.
    /// * `LaneError::UnknownModel` / `LaneError::UnknownMesh` - Dangling references.
    pub fn record(
        &self,
        device: &dyn GraphicsDevice,
        encoder: &mut dyn CommandEncoder,
        store: &mut GeometryStore,
        textures: &TextureCache,
        pass: &GeometryPass<'_>,
    ) -> Result<usize, LaneError> {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(Cow::Borrowed(pass.label)),
            target: pass.target,
            clear_color: Some(pass.clear_color),
            clear_depth: Some(1.0),
            depth_test: true,
        });

        if !pass.program.is_functional() {
            log::warn!(
                "GeometryLane: Program '{}' is not functional, '{}' only clears",
                pass.program.name(),
                pass.label
            );
            return Ok(0);
        }

        render_pass.set_program(pass.program.handle());
        render_pass.set_uniform_range(GLOBAL_UNIFORM_SLOT, pass.uniform_buffer, pass.global);

        let mut draws = 0;
        for (index, entity) in pass.entities.iter().enumerate() {
            let range = entity
                .uniform_range
                .ok_or(LaneError::UnpackedEntity(index))?;
            render_pass.set_uniform_range(ENTITY_UNIFORM_SLOT, pass.uniform_buffer, range);

            let model = store
                .model(entity.model)
                .cloned()
                .ok_or(LaneError::UnknownModel(entity.model))?;
            let albedo: Vec<Option<TextureId>> = model
                .materials
                .iter()
                .map(|&material| {
                    store
                        .material(material)
                        .and_then(|m| m.textures.albedo)
                        .and_then(|handle| textures.texture_id(handle))
                })
                .collect();

            let mesh = store
                .mesh_mut(model.mesh)
                .ok_or(LaneError::UnknownMesh(model.mesh))?;
            for submesh in 0..mesh.submeshes().len() {
                let bind = mesh.find_or_create_bind(device, submesh, pass.program)?;
                let (first, count) = {
                    let s = &mesh.submeshes()[submesh];
                    (s.first_index(), s.index_count())
                };
                render_pass.set_vertex_binding(bind);
                render_pass.set_texture(
                    ALBEDO_TEXTURE_UNIT,
                    albedo.get(submesh).copied().flatten(),
                );
                render_pass.draw_indexed(first..first + count, 0);
                draws += 1;
            }
        }

        log::trace!(
            "GeometryLane: '{}' recorded {draws} draw(s) for {} entit(ies)",
            pass.label,
            pass.entities.len()
        );
        Ok(draws)
    }
}
