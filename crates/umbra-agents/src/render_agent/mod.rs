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

//! Orchestration of the renderer.
//!
//! The agent decides *which* passes run each frame and in what order; the lanes in
//! `umbra-lanes` encode them. [`Engine`] owns a [`RenderContext`] and drives one
//! frame at a time:
//!
//! 1. `update`: mode selection, hot-reload with bind eviction, camera movement and
//!    uniform packing, which closes the uniform writer.
//! 2. `render`: the [`ModeDispatcher`] encodes the current mode's passes, then the
//!    command buffer is submitted.

mod context;
mod dispatcher;
mod frame;
mod mode;

pub use self::context::{Collaborators, RenderContext, ShaderSet};
pub use self::dispatcher::{DispatchStats, FrameScene, ModeDispatcher};
pub use self::frame::{Engine, FrameError, FrameInput, FrameStats};
pub use self::mode::{ParseModeError, RenderMode};
