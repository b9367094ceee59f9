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

//! Provides the public, backend-agnostic rendering contracts for Umbra.
//!
//! This module defines the "common language" for every rendering operation: the
//! abstract [`GraphicsDevice`] and [`CommandEncoder`] traits, the descriptors they
//! consume, the opaque IDs they hand out, and the error types they report.
//!
//! The data and lane crates only ever see these contracts. A concrete backend (the
//! headless device in `umbra-infra`, or a real API binding) implements them.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{RenderError, ResourceError, ShaderError};
pub use self::traits::{CommandEncoder, GraphicsDevice, RenderPass};
