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

//! The screen-covering quad shared by textured-quad and composite passes.

use umbra_core::asset::RawMesh;
use umbra_core::renderer::{GraphicsDevice, ResourceError};
use umbra_data::geometry::{GeometryStore, MeshId};

/// Index count of the quad's two triangles.
pub(crate) const QUAD_INDEX_COUNT: u32 = 6;

/// A two-triangle quad spanning clip space, with normals and texture coordinates.
///
/// The mesh lives in the geometry store, so bind objects for it are negotiated and
/// evicted like any other submesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenQuad {
    mesh: MeshId,
}

impl FullscreenQuad {
    /// Uploads the quad into `store`.
    pub fn new(
        device: &dyn GraphicsDevice,
        store: &mut GeometryStore,
    ) -> Result<Self, ResourceError> {
        let raw = RawMesh {
            name: "fullscreen quad".to_string(),
            positions: vec![
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            tex_coords: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            indices: vec![0, 1, 2, 0, 2, 3],
            ..Default::default()
        };
        let mesh = store.upload_mesh(device, "Fullscreen Quad", std::slice::from_ref(&raw))?;
        log::debug!("FullscreenQuad: Uploaded as {mesh:?}");
        Ok(Self { mesh })
    }

    /// The quad's mesh in the geometry store.
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        QUAD_INDEX_COUNT
    }
}
