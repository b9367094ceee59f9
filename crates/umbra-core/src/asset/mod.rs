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

//! Contracts for the collaborators that feed the engine with content.
//!
//! The engine never decodes images, parses scene files or touches the filesystem
//! itself. It calls through these traits, and every failure they report is a
//! recoverable [`ContentError`]: the caller logs it and continues with a sentinel.

mod error;
mod image;
mod scene;
mod source;

pub use self::error::ContentError;
pub use self::image::{DecodedImage, ImageDecoder};
pub use self::scene::{
    RawMaterial, RawMesh, RawNode, RawScene, SceneImporter, TextureKind, TextureSlots,
};
pub use self::source::SourceProvider;
