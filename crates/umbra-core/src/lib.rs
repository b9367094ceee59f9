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

//! # Umbra Core
//!
//! Foundational crate containing the device traits, resource identifiers, and
//! collaborator contracts that the rest of the engine is written against.
//!
//! Nothing in here talks to a real graphics API, decodes an image or parses a
//! scene file. Those capabilities are described as traits ([`GraphicsDevice`],
//! [`asset::ImageDecoder`], [`asset::SceneImporter`], [`asset::SourceProvider`])
//! and implemented elsewhere.
//!
//! [`GraphicsDevice`]: renderer::GraphicsDevice

#![warn(missing_docs)]

pub mod asset;
pub mod renderer;
