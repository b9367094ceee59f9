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

//! Data layouts and resource caches for the Umbra renderer.
//!
//! Everything here is owned by the render context and mutated on the render thread:
//! programs and textures at init and on hot-reload, geometry once per loaded model,
//! bind objects lazily on first draw, and uniform data once per frame.

#![warn(missing_docs)]

pub mod geometry;
pub mod program;
pub mod scene;
pub mod texture;
pub mod uniform;

#[cfg(test)]
pub(crate) mod test_support;
