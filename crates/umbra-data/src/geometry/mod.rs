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

//! GPU-resident geometry: interleaved layouts, meshes with shared buffers, the
//! per-submesh bind-object cache, materials and the model store.

mod bind_cache;
mod layout;
mod material;
mod mesh;
mod store;

pub use self::bind_cache::BindError;
pub use self::layout::{
    BufferLayout, VertexAttributeSlot, BITANGENT_LOCATION, NORMAL_LOCATION, POSITION_LOCATION,
    TANGENT_LOCATION, TEX_COORD_LOCATION,
};
pub use self::material::Material;
pub use self::mesh::{BindObject, Mesh, Submesh};
pub use self::store::{GeometryStore, MaterialId, MeshId, Model, ModelId};
