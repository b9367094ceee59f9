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

//! Render pass descriptions and command buffer handles.

use crate::renderer::api::framebuffer::FramebufferId;
use std::borrow::Cow;

/// An opaque handle to a finished, not yet submitted, command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandBufferId(pub usize);

/// Where a render pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// The display surface.
    Screen,
    /// An offscreen framebuffer.
    Offscreen(FramebufferId),
}

/// Describes a render pass.
#[derive(Debug, Clone)]
pub struct RenderPassDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The pass's destination.
    pub target: RenderTarget,
    /// Color every color attachment is cleared to, or `None` to load.
    pub clear_color: Option<[f32; 4]>,
    /// Value the depth attachment is cleared to, or `None` to load.
    pub clear_depth: Option<f32>,
    /// Whether fragments are depth-tested and depth-written.
    pub depth_test: bool,
}
