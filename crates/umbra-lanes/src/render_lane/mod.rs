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

//! Rendering lanes: the G-buffer target set, the fullscreen quad, the geometry and
//! composite passes, and per-frame uniform packing.

mod composite_lane;
mod error;
mod gbuffer;
mod geometry_lane;
mod packing;
mod quad;

pub use self::composite_lane::{CompositeLane, CompositePass};
pub use self::error::LaneError;
pub use self::gbuffer::{GBuffer, GBufferAttachment};
pub use self::geometry_lane::{GeometryLane, GeometryPass};
pub use self::packing::{
    entity_block_size, frame_size, global_block_size, pack_frame, FrameBindings, LIGHT_MEMBER_ALIGNMENT,
};
pub use self::quad::FullscreenQuad;

/// Uniform slot of the per-frame global block.
pub const GLOBAL_UNIFORM_SLOT: u32 = 0;
/// Uniform slot of the per-entity block.
pub const ENTITY_UNIFORM_SLOT: u32 = 1;
/// Texture unit of a submesh's albedo texture in geometry passes.
pub const ALBEDO_TEXTURE_UNIT: u32 = 0;
