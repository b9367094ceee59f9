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

//! Per-frame uniform packing.
//!
//! One global block followed by one block per entity, all in the frame uniform
//! buffer:
//!
//! ```text
//! offset 0      vec3 camera_position
//!               int  light_count
//!               per light, every member at a 16-byte boundary:
//!                 int type, vec3 color, vec3 direction, vec3 position
//! aligned(A)    entity 0: mat4 world, mat4 world_view_projection
//! aligned(A)    entity 1: ...
//! ```
//!
//! where `A` is the device's minimum uniform block offset alignment.

use glam::Mat4;
use umbra_core::renderer::{GraphicsDevice, UniformRange};
use umbra_data::scene::{Camera, Entity, Light};
use umbra_data::uniform::{align_up, FrameUniformAllocator, UniformError};

/// Boundary every light member starts on.
pub const LIGHT_MEMBER_ALIGNMENT: u64 = 16;

const MAT4_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

/// Where this frame's global block landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBindings {
    /// The global parameters, bound at the global uniform slot.
    pub global: UniformRange,
}

/// Byte size of the global block for `light_count` lights.
pub fn global_block_size(light_count: usize) -> u64 {
    // vec3 + int, then each light ends 12 bytes past a 64-byte stride.
    match light_count {
        0 => 16,
        n => 64 * n as u64 + 12,
    }
}

/// Byte size of one entity block before alignment padding.
pub fn entity_block_size() -> u64 {
    2 * MAT4_SIZE
}

/// Rewinds the allocator, packs the global block and one block per entity, and
/// closes the frame. Each entity's `uniform_range` is overwritten, and left
/// `None` when the frame fails.
///
/// ## Errors
/// `UniformError::CapacityExceeded` when the scene does not fit in one uniform
/// block; nothing is uploaded and the frame cannot be drawn.
pub fn pack_frame(
    uniforms: &mut FrameUniformAllocator,
    device: &dyn GraphicsDevice,
    camera: &Camera,
    lights: &[Light],
    entities: &mut [Entity],
) -> Result<FrameBindings, UniformError> {
    for entity in entities.iter_mut() {
        entity.uniform_range = None;
    }
    uniforms.begin_frame();

    let global_start = uniforms.head();
    uniforms.push_vec3(camera.position)?;
    uniforms.push_int(lights.len() as i32)?;
    for light in lights {
        uniforms.align_to(LIGHT_MEMBER_ALIGNMENT)?;
        uniforms.push_int(light.ty.as_uniform())?;
        uniforms.align_to(LIGHT_MEMBER_ALIGNMENT)?;
        uniforms.push_vec3(light.color)?;
        uniforms.align_to(LIGHT_MEMBER_ALIGNMENT)?;
        uniforms.push_vec3(light.direction)?;
        uniforms.align_to(LIGHT_MEMBER_ALIGNMENT)?;
        uniforms.push_vec3(light.position)?;
    }
    let global = uniforms.range_since(global_start);

    let view_projection = camera.view_projection_matrix();
    let mut ranges = Vec::with_capacity(entities.len());
    for entity in entities.iter() {
        let start = uniforms.align_to_block()?;
        uniforms.push_mat4(&entity.transform)?;
        uniforms.push_mat4(&(view_projection * entity.transform))?;
        ranges.push(uniforms.range_since(start));
    }

    uniforms.end_frame(device)?;
    for (entity, range) in entities.iter_mut().zip(ranges) {
        entity.uniform_range = Some(range);
    }
    log::trace!(
        "FramePacking: {} light(s), {} entity block(s), {} of {} bytes",
        lights.len(),
        entities.len(),
        uniforms.head(),
        uniforms.capacity()
    );
    Ok(FrameBindings { global })
}

/// Total bytes `pack_frame` writes for the given scene size.
pub fn frame_size(light_count: usize, entity_count: usize, block_alignment: u64) -> u64 {
    if entity_count == 0 {
        return global_block_size(light_count);
    }
    let first = align_up(global_block_size(light_count), block_alignment);
    let stride = align_up(entity_block_size(), block_alignment);
    first + stride * (entity_count as u64 - 1) + entity_block_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use umbra_core::renderer::DeviceLimits;
    use umbra_data::geometry::ModelId;
    use umbra_infra::HeadlessDevice;

    fn setup(capacity: u64, alignment: u64) -> (HeadlessDevice, FrameUniformAllocator) {
        let limits = DeviceLimits {
            max_uniform_block_size: capacity,
            min_uniform_block_offset_alignment: alignment,
        };
        let device = HeadlessDevice::with_limits(limits);
        let uniforms = FrameUniformAllocator::new(&device, &limits).unwrap();
        (device, uniforms)
    }

    fn lights(count: usize) -> Vec<Light> {
        (0..count)
            .map(|i| Light::point(Vec3::splat(i as f32), Vec3::ONE))
            .collect()
    }

    fn entities(count: usize) -> Vec<Entity> {
        (0..count)
            .map(|i| Entity::new(ModelId(0), Mat4::from_translation(Vec3::X * i as f32)))
            .collect()
    }

    #[test]
    fn global_block_matches_closed_form() {
        let (device, mut uniforms) = setup(4096, 256);
        for count in 0..4 {
            let bindings =
                pack_frame(&mut uniforms, &device, &Camera::default(), &lights(count), &mut [])
                    .unwrap();
            assert_eq!(bindings.global.offset, 0);
            assert_eq!(bindings.global.size, global_block_size(count));
        }
        assert_eq!(global_block_size(1), 76);
        assert_eq!(global_block_size(3), 204);
    }

    #[test]
    fn three_entities_three_lights_are_aligned_and_disjoint() {
        let (device, mut uniforms) = setup(65536, 256);
        let mut scene = entities(3);
        let bindings = pack_frame(
            &mut uniforms,
            &device,
            &Camera::default(),
            &lights(3),
            &mut scene,
        )
        .unwrap();

        let ranges: Vec<UniformRange> = scene.iter().map(|e| e.uniform_range.unwrap()).collect();
        assert_eq!(
            ranges.iter().map(|r| r.offset).collect::<Vec<_>>(),
            vec![256, 512, 768]
        );
        for (i, range) in ranges.iter().enumerate() {
            assert_eq!(range.size, entity_block_size());
            assert!(!range.overlaps(&bindings.global));
            for other in &ranges[i + 1..] {
                assert!(!range.overlaps(other));
            }
        }
        assert_eq!(uniforms.head(), frame_size(3, 3, 256));
        assert!(uniforms.head() <= uniforms.capacity());
    }

    #[test]
    fn entity_block_holds_world_then_world_view_projection() {
        let (device, mut uniforms) = setup(1024, 64);
        let camera = Camera::default();
        let mut scene = entities(2);
        pack_frame(&mut uniforms, &device, &camera, &[], &mut scene).unwrap();

        let bytes = device.buffer_contents(uniforms.buffer().unwrap()).unwrap();
        let range = scene[1].uniform_range.unwrap();
        let start = range.offset as usize;
        let values = floats(&bytes[start..start + 128]);
        assert_eq!(&values[..16], &scene[1].transform.to_cols_array());
        let expected = camera.view_projection_matrix() * scene[1].transform;
        for (got, want) in values[16..].iter().zip(expected.to_cols_array()) {
            approx::assert_relative_eq!(*got, want, epsilon = 1e-5);
        }
    }

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn overflowing_scene_is_a_capacity_error() {
        let (device, mut uniforms) = setup(512, 256);
        let mut scene = entities(3);
        let err = pack_frame(&mut uniforms, &device, &Camera::default(), &[], &mut scene)
            .unwrap_err();
        assert!(matches!(err, UniformError::CapacityExceeded { capacity: 512, .. }));
        assert!(scene.iter().all(|e| e.uniform_range.is_none()));
        assert!(matches!(uniforms.buffer(), Err(UniformError::NotClosed)));
    }

    #[test]
    fn failed_frame_drops_ranges_of_the_previous_one() {
        let (device, mut uniforms) = setup(512, 256);
        let mut scene = entities(1);
        pack_frame(&mut uniforms, &device, &Camera::default(), &[], &mut scene).unwrap();
        assert!(scene[0].uniform_range.is_some());

        // The global block alone no longer fits.
        let crowded = lights(8);
        assert!(pack_frame(&mut uniforms, &device, &Camera::default(), &crowded, &mut scene).is_err());
        assert!(scene[0].uniform_range.is_none());
    }
}
