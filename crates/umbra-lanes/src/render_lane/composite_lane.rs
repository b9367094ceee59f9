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

//! Fullscreen passes: the textured quad and every G-buffer composite.

use std::borrow::Cow;

use umbra_core::renderer::{
    CommandEncoder, GraphicsDevice, RenderPassDescriptor, RenderTarget, TextureId,
};
use umbra_data::geometry::GeometryStore;
use umbra_data::program::Program;

use super::{FullscreenQuad, LaneError};

/// Inputs of one fullscreen pass.
#[derive(Debug, Clone, Copy)]
pub struct CompositePass<'a> {
    /// Debug label of the pass.
    pub label: &'a str,
    /// Clear color of the screen.
    pub clear_color: [f32; 4],
    /// Program sampling `textures`.
    pub program: &'a Program,
    /// Bound to units `0..textures.len()`, in order.
    pub textures: &'a [TextureId],
}

/// Draws the fullscreen quad to the screen with a set of textures bound.
#[derive(Debug)]
pub struct CompositeLane {
    quad: FullscreenQuad,
}

impl CompositeLane {
    /// Creates a lane drawing `quad`.
    pub fn new(quad: FullscreenQuad) -> Self {
        Self { quad }
    }

    /// The quad this lane draws.
    pub fn quad(&self) -> FullscreenQuad {
        self.quad
    }

    /// Records one fullscreen pass. Returns the number of draws, 0 or 1.
    ///
    /// A program that failed to build only clears the screen.
    pub fn record(
        &self,
        device: &dyn GraphicsDevice,
        encoder: &mut dyn CommandEncoder,
        store: &mut GeometryStore,
        pass: &CompositePass<'_>,
    ) -> Result<usize, LaneError> {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(Cow::Borrowed(pass.label)),
            target: RenderTarget::Screen,
            clear_color: Some(pass.clear_color),
            clear_depth: Some(1.0),
            depth_test: false,
        });

        if !pass.program.is_functional() {
            log::warn!(
                "CompositeLane: Program '{}' is not functional, '{}' only clears",
                pass.program.name(),
                pass.label
            );
            return Ok(0);
        }

        let mesh = store
            .mesh_mut(self.quad.mesh())
            .ok_or(LaneError::UnknownMesh(self.quad.mesh()))?;
        let bind = mesh.find_or_create_bind(device, 0, pass.program)?;

        render_pass.set_program(pass.program.handle());
        render_pass.set_vertex_binding(bind);
        for (unit, &texture) in pass.textures.iter().enumerate() {
            render_pass.set_texture(unit as u32, Some(texture));
        }
        render_pass.draw_indexed(0..self.quad.index_count(), 0);

        log::trace!(
            "CompositeLane: '{}' sampled {} texture(s)",
            pass.label,
            pass.textures.len()
        );
        Ok(1)
    }
}
