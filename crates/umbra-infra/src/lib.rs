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

//! Concrete implementations of the collaborators declared in `umbra-core`.
//!
//! - [`graphics::headless`]: a [`GraphicsDevice`](umbra_core::renderer::GraphicsDevice)
//!   that keeps every resource in memory and records submitted passes.
//! - [`asset`]: an `image`-crate decoder and a `tobj` scene importer.
//! - [`io`]: filesystem access for shader sources.

pub mod asset;
pub mod graphics;
pub mod io;

pub use asset::{ImageCrateDecoder, ObjSceneImporter};
pub use graphics::headless::{DrawCall, HeadlessDevice, RecordedCommand, RecordedPass};
pub use io::FsSourceProvider;
