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

use glam::Mat4;
use umbra_core::renderer::UniformRange;

use crate::geometry::ModelId;

/// A drawable instance of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Model-to-world transform.
    pub transform: Mat4,
    /// What to draw.
    pub model: ModelId,
    /// This frame's uniform block. Recomputed every frame.
    pub uniform_range: Option<UniformRange>,
}

impl Entity {
    /// Places `model` with `transform`.
    pub fn new(model: ModelId, transform: Mat4) -> Self {
        Self {
            transform,
            model,
            uniform_range: None,
        }
    }
}
