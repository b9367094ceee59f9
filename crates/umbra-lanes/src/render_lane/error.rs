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

use thiserror::Error;
use umbra_core::renderer::ResourceError;
use umbra_data::geometry::{BindError, MeshId, ModelId};
use umbra_data::uniform::UniformError;

/// Errors raised while encoding a pass.
#[derive(Debug, Error)]
pub enum LaneError {
    /// Bind negotiation failed; see [`BindError::MissingAttribute`].
    #[error(transparent)]
    Bind(#[from] BindError),
    /// The uniform buffer was unusable.
    #[error(transparent)]
    Uniform(#[from] UniformError),
    /// An entity refers to a model the store does not have.
    #[error("model {0:?} does not exist")]
    UnknownModel(ModelId),
    /// A model refers to a mesh the store does not have.
    #[error("mesh {0:?} does not exist")]
    UnknownMesh(MeshId),
    /// An entity was drawn before its uniform block was packed.
    #[error("entity {0} has no uniform block for this frame")]
    UnpackedEntity(usize),
    /// A device resource operation failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
