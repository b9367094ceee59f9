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

//! A GPU-less [`GraphicsDevice`](umbra_core::renderer::GraphicsDevice).
//!
//! The headless device validates what a driver would validate (buffer bounds,
//! texture upload sizes, stage entry points, framebuffer completeness), reflects
//! vertex inputs out of GLSL-style sources, and records every submitted render pass
//! so the engine can run, and be inspected, without a window or a GPU.

mod device;
mod encoder;
mod reflect;

pub use self::device::{HeadlessDevice, TextureInfo};
pub use self::encoder::{DrawCall, RecordedCommand, RecordedPass};
