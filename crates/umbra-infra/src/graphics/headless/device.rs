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

use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;
use umbra_core::renderer::{
    ActiveVertexInput, BindObjectId, BufferDescriptor, BufferId, BufferUsage, CommandBufferId,
    CommandEncoder, DeviceLimits, FramebufferDescriptor, FramebufferId, FramebufferStatus,
    GraphicsDevice, ProgramBuild, ProgramDescriptor, ProgramHandle, RenderError, ResourceError,
    SamplerState, ShaderError, ShaderStage, TextureDescriptor, TextureFormat, TextureId,
    VertexAttributeBinding, VertexBindingDescriptor,
};

use super::encoder::{HeadlessCommandEncoder, RecordedPass};
use super::reflect;

#[derive(Debug)]
struct HeadlessBuffer {
    usage: BufferUsage,
    bytes: Vec<u8>,
}

/// Everything the headless device knows about a live texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub sampler: SamplerState,
    pub mip_levels: u32,
    /// Whether a full image has been uploaded.
    pub initialized: bool,
}

#[derive(Debug)]
struct HeadlessProgram {
    label: String,
    linked: bool,
    inputs: Vec<ActiveVertexInput>,
}

#[derive(Debug)]
struct HeadlessVertexBinding {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    attributes: Vec<VertexAttributeBinding>,
}

#[derive(Debug)]
struct HeadlessFramebuffer {
    label: String,
    color_attachments: Vec<TextureId>,
    depth_attachment: Option<TextureId>,
}

/// Failures a test can make the device report.
#[derive(Debug, Default)]
struct Faults {
    incomplete_framebuffers: Option<String>,
    program_creation: bool,
}

/// The tables behind a [`HeadlessDevice`]. Shared with its command encoders.
#[derive(Debug, Default)]
pub(crate) struct HeadlessState {
    next_id: usize,
    faults: Faults,
    buffers: AHashMap<usize, HeadlessBuffer>,
    textures: AHashMap<usize, TextureInfo>,
    programs: AHashMap<usize, HeadlessProgram>,
    vertex_bindings: AHashMap<usize, HeadlessVertexBinding>,
    framebuffers: AHashMap<usize, HeadlessFramebuffer>,
    pub(crate) pending: AHashMap<usize, Vec<RecordedPass>>,
    submitted: Vec<RecordedPass>,
}

impl HeadlessState {
    pub(crate) fn allocate_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn framebuffer_status(&self, framebuffer: &HeadlessFramebuffer) -> FramebufferStatus {
        if framebuffer.color_attachments.is_empty() && framebuffer.depth_attachment.is_none() {
            return FramebufferStatus::Incomplete("no attachments".to_string());
        }

        let mut size: Option<(u32, u32)> = None;
        let attachments = framebuffer
            .color_attachments
            .iter()
            .map(|id| (*id, false))
            .chain(framebuffer.depth_attachment.map(|id| (id, true)));

        for (id, expect_depth) in attachments {
            let Some(texture) = self.textures.get(&id.0) else {
                return FramebufferStatus::Incomplete(format!("attachment {id:?} does not exist"));
            };
            if texture.format.is_depth() != expect_depth {
                let role = if expect_depth { "depth" } else { "color" };
                return FramebufferStatus::Incomplete(format!(
                    "attachment {id:?} has format {:?}, not usable as {role}",
                    texture.format
                ));
            }
            match size {
                None => size = Some((texture.width, texture.height)),
                Some(expected) if expected != (texture.width, texture.height) => {
                    return FramebufferStatus::Incomplete(format!(
                        "attachment sizes differ ({}x{} vs {}x{})",
                        expected.0, expected.1, texture.width, texture.height
                    ));
                }
                Some(_) => {}
            }
        }
        FramebufferStatus::Complete
    }
}

/// A [`GraphicsDevice`] that keeps every resource in memory.
///
/// Cloning is cheap and yields a second handle onto the same tables, so a test can
/// hand one clone to the engine and keep another to inspect what was created and
/// submitted.
#[derive(Debug, Clone)]
pub struct HeadlessDevice {
    state: Arc<Mutex<HeadlessState>>,
    limits: Option<DeviceLimits>,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDevice {
    /// Creates a device reporting [`DeviceLimits::default`].
    pub fn new() -> Self {
        Self::with_limits(DeviceLimits::default())
    }

    /// Creates a device reporting the given limits.
    pub fn with_limits(limits: DeviceLimits) -> Self {
        log::info!(
            "HeadlessDevice: Created (max uniform block {} bytes, uniform offset alignment {})",
            limits.max_uniform_block_size,
            limits.min_uniform_block_offset_alignment
        );
        Self {
            state: Arc::new(Mutex::new(HeadlessState::default())),
            limits: Some(limits),
        }
    }

    /// Creates a device whose capability query fails.
    pub fn without_limits() -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState::default())),
            limits: None,
        }
    }

    fn lock(&self, table: &str) -> Result<MutexGuard<'_, HeadlessState>, ResourceError> {
        self.state
            .lock()
            .map_err(|e| ResourceError::BackendError(format!("Mutex poisoned ({table}): {e}")))
    }

    /// Returns a copy of a buffer's bytes.
    pub fn buffer_contents(&self, id: BufferId) -> Option<Vec<u8>> {
        let state = self.lock("buffers").ok()?;
        state.buffers.get(&id.0).map(|b| b.bytes.clone())
    }

    /// Returns the usage a buffer was created with.
    pub fn buffer_usage(&self, id: BufferId) -> Option<BufferUsage> {
        let state = self.lock("buffers").ok()?;
        state.buffers.get(&id.0).map(|b| b.usage)
    }

    /// Returns the description of a live texture.
    pub fn texture_info(&self, id: TextureId) -> Option<TextureInfo> {
        let state = self.lock("textures").ok()?;
        state.textures.get(&id.0).cloned()
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.lock("textures").map_or(0, |s| s.textures.len())
    }

    /// Whether a program handle still refers to a live program object.
    pub fn is_program_alive(&self, program: ProgramHandle) -> bool {
        self.lock("programs")
            .is_ok_and(|s| s.programs.contains_key(&program.0))
    }

    /// Number of live vertex bindings.
    pub fn vertex_binding_count(&self) -> usize {
        self.lock("vertex_bindings")
            .map_or(0, |s| s.vertex_bindings.len())
    }

    /// Returns the attribute wiring of a live vertex binding.
    pub fn vertex_binding_attributes(&self, id: BindObjectId) -> Option<Vec<VertexAttributeBinding>> {
        let state = self.lock("vertex_bindings").ok()?;
        state
            .vertex_bindings
            .get(&id.0)
            .map(|b| b.attributes.clone())
    }

    /// Number of live framebuffers.
    pub fn framebuffer_count(&self) -> usize {
        self.lock("framebuffers").map_or(0, |s| s.framebuffers.len())
    }

    /// Makes every framebuffer report itself incomplete for `reason`, or restores
    /// the real completeness check with `None`.
    pub fn reject_framebuffers(&self, reason: Option<&str>) {
        if let Ok(mut state) = self.lock("faults") {
            state.faults.incomplete_framebuffers = reason.map(str::to_string);
        }
    }

    /// Makes `create_program` fail with a backend error until switched off.
    pub fn fail_program_creation(&self, fail: bool) {
        if let Ok(mut state) = self.lock("faults") {
            state.faults.program_creation = fail;
        }
    }

    /// Returns every pass submitted so far, oldest first.
    pub fn submitted_passes(&self) -> Vec<RecordedPass> {
        self.lock("submitted")
            .map(|s| s.submitted.clone())
            .unwrap_or_default()
    }

    /// Returns and forgets every pass submitted so far.
    pub fn take_submitted_passes(&self) -> Vec<RecordedPass> {
        self.lock("submitted")
            .map(|mut s| std::mem::take(&mut s.submitted))
            .unwrap_or_default()
    }
}

fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

impl GraphicsDevice for HeadlessDevice {
    fn limits(&self) -> Result<DeviceLimits, RenderError> {
        self.limits.ok_or_else(|| {
            RenderError::CapabilityQueryFailed("device does not expose its limits".to_string())
        })
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        self.create_buffer_with_data(descriptor, &vec![0u8; descriptor.size as usize])
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if data.len() as u64 != descriptor.size {
            return Err(ResourceError::Unsupported(format!(
                "buffer '{}' declared {} bytes but got {}",
                descriptor.label.as_deref().unwrap_or_default(),
                descriptor.size,
                data.len()
            )));
        }
        let mut state = self.lock("buffers")?;
        let id = BufferId(state.allocate_id());
        state.buffers.insert(
            id.0,
            HeadlessBuffer {
                usage: descriptor.usage,
                bytes: data.to_vec(),
            },
        );
        log::debug!(
            "HeadlessDevice: Created buffer '{}' with ID: {:?}, size: {} bytes",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            descriptor.size
        );
        Ok(id)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut state = self.lock("buffers")?;
        let buffer = state
            .buffers
            .get_mut(&id.0)
            .ok_or(ResourceError::NotFound)?;
        let start = offset as usize;
        let end = start
            .checked_add(data.len())
            .ok_or(ResourceError::OutOfBounds)?;
        if end > buffer.bytes.len() {
            return Err(ResourceError::OutOfBounds);
        }
        buffer.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut state = self.lock("buffers")?;
        if state.buffers.remove(&id.0).is_some() {
            log::debug!("HeadlessDevice: Destroyed buffer with ID: {id:?}");
            Ok(())
        } else {
            Err(ResourceError::NotFound)
        }
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(ResourceError::Unsupported(format!(
                "texture '{}' has a zero dimension ({}x{})",
                descriptor.label.as_deref().unwrap_or_default(),
                descriptor.width,
                descriptor.height
            )));
        }
        if descriptor.mipmapped && descriptor.format.is_depth() {
            return Err(ResourceError::Unsupported(
                "depth textures cannot be mipmapped".to_string(),
            ));
        }
        let mut state = self.lock("textures")?;
        let id = TextureId(state.allocate_id());
        let mip_levels = if descriptor.mipmapped {
            mip_level_count(descriptor.width, descriptor.height)
        } else {
            1
        };
        state.textures.insert(
            id.0,
            TextureInfo {
                label: descriptor.label.as_ref().map(|l| l.to_string()),
                width: descriptor.width,
                height: descriptor.height,
                format: descriptor.format,
                sampler: descriptor.sampler,
                mip_levels,
                initialized: false,
            },
        );
        log::debug!(
            "HeadlessDevice: Created texture '{}' with ID: {:?}, {}x{} {:?}, {} mip level(s)",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            descriptor.width,
            descriptor.height,
            descriptor.format,
            mip_levels
        );
        Ok(id)
    }

    fn write_texture(&self, id: TextureId, data: &[u8]) -> Result<(), ResourceError> {
        let mut state = self.lock("textures")?;
        let texture = state
            .textures
            .get_mut(&id.0)
            .ok_or(ResourceError::NotFound)?;
        let expected = texture.width as usize
            * texture.height as usize
            * texture.format.bytes_per_texel() as usize;
        if data.len() != expected {
            log::error!(
                "HeadlessDevice: Texture {id:?} upload has {} bytes, expected {expected}",
                data.len()
            );
            return Err(ResourceError::OutOfBounds);
        }
        texture.initialized = true;
        Ok(())
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let mut state = self.lock("textures")?;
        if state.textures.remove(&id.0).is_some() {
            log::debug!("HeadlessDevice: Destroyed texture with ID: {id:?}");
            Ok(())
        } else {
            Err(ResourceError::NotFound)
        }
    }

    fn create_program(&self, descriptor: &ProgramDescriptor) -> Result<ProgramBuild, ResourceError> {
        if self.lock("faults")?.faults.program_creation {
            return Err(ResourceError::BackendError(format!(
                "program '{}' could not be created",
                descriptor.label
            )));
        }
        let mut errors = Vec::new();

        let vertex = reflect::compile_stage(&descriptor.vertex_source, ShaderStage::Vertex)
            .map_err(|details| ShaderError::CompilationError {
                label: descriptor.label.to_string(),
                stage: ShaderStage::Vertex,
                details,
            });
        let fragment = reflect::compile_stage(&descriptor.fragment_source, ShaderStage::Fragment)
            .map_err(|details| ShaderError::CompilationError {
                label: descriptor.label.to_string(),
                stage: ShaderStage::Fragment,
                details,
            });

        let inputs = match (vertex, fragment) {
            (Ok(vertex), Ok(_)) => vertex.inputs,
            (vertex, fragment) => {
                errors.extend(vertex.err());
                errors.extend(fragment.err());
                errors.push(ShaderError::LinkError {
                    label: descriptor.label.to_string(),
                    details: "one or more attached shaders failed to compile".to_string(),
                });
                Vec::new()
            }
        };

        let mut state = self.lock("programs")?;
        let handle = ProgramHandle(state.allocate_id());
        state.programs.insert(
            handle.0,
            HeadlessProgram {
                label: descriptor.label.to_string(),
                linked: errors.is_empty(),
                inputs,
            },
        );
        log::debug!(
            "HeadlessDevice: Created program '{}' with handle: {:?} (linked: {})",
            descriptor.label,
            handle,
            errors.is_empty()
        );
        Ok(ProgramBuild { handle, errors })
    }

    fn program_vertex_inputs(
        &self,
        program: ProgramHandle,
    ) -> Result<Vec<ActiveVertexInput>, ResourceError> {
        let state = self.lock("programs")?;
        let entry = state
            .programs
            .get(&program.0)
            .ok_or(ResourceError::InvalidHandle)?;
        if !entry.linked {
            log::debug!(
                "HeadlessDevice: Program '{}' is not linked, reporting no inputs",
                entry.label
            );
            return Ok(Vec::new());
        }
        Ok(entry.inputs.clone())
    }

    fn destroy_program(&self, program: ProgramHandle) -> Result<(), ResourceError> {
        let mut state = self.lock("programs")?;
        if state.programs.remove(&program.0).is_some() {
            log::debug!("HeadlessDevice: Destroyed program with handle: {program:?}");
            Ok(())
        } else {
            Err(ResourceError::InvalidHandle)
        }
    }

    fn create_vertex_binding(
        &self,
        descriptor: &VertexBindingDescriptor,
    ) -> Result<BindObjectId, ResourceError> {
        let mut state = self.lock("vertex_bindings")?;
        let vertex_len = state
            .buffers
            .get(&descriptor.vertex_buffer.0)
            .ok_or(ResourceError::NotFound)?
            .bytes
            .len() as u64;
        if !state.buffers.contains_key(&descriptor.index_buffer.0) {
            return Err(ResourceError::NotFound);
        }
        for attribute in &descriptor.attributes {
            let footprint = attribute.byte_offset + u64::from(attribute.component_count) * 4;
            if attribute.component_count == 0 || attribute.component_count > 4 {
                return Err(ResourceError::Unsupported(format!(
                    "attribute at location {} has {} components",
                    attribute.location, attribute.component_count
                )));
            }
            if footprint > vertex_len {
                return Err(ResourceError::OutOfBounds);
            }
        }

        let id = BindObjectId(state.allocate_id());
        state.vertex_bindings.insert(
            id.0,
            HeadlessVertexBinding {
                vertex_buffer: descriptor.vertex_buffer,
                index_buffer: descriptor.index_buffer,
                attributes: descriptor.attributes.clone(),
            },
        );
        log::debug!(
            "HeadlessDevice: Created vertex binding '{}' with ID: {:?}, {} attribute(s)",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            descriptor.attributes.len()
        );
        Ok(id)
    }

    fn destroy_vertex_binding(&self, id: BindObjectId) -> Result<(), ResourceError> {
        let mut state = self.lock("vertex_bindings")?;
        match state.vertex_bindings.remove(&id.0) {
            Some(binding) => {
                log::debug!(
                    "HeadlessDevice: Destroyed vertex binding {id:?} (buffers {:?}/{:?})",
                    binding.vertex_buffer,
                    binding.index_buffer
                );
                Ok(())
            }
            None => Err(ResourceError::NotFound),
        }
    }

    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor,
    ) -> Result<FramebufferId, ResourceError> {
        let mut state = self.lock("framebuffers")?;
        let id = FramebufferId(state.allocate_id());
        state.framebuffers.insert(
            id.0,
            HeadlessFramebuffer {
                label: descriptor
                    .label
                    .as_deref()
                    .unwrap_or_default()
                    .to_string(),
                color_attachments: descriptor.color_attachments.to_vec(),
                depth_attachment: descriptor.depth_attachment,
            },
        );
        log::debug!(
            "HeadlessDevice: Created framebuffer '{}' with ID: {:?}, {} color attachment(s)",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            descriptor.color_attachments.len()
        );
        Ok(id)
    }

    fn framebuffer_status(&self, id: FramebufferId) -> Result<FramebufferStatus, ResourceError> {
        let state = self.lock("framebuffers")?;
        let framebuffer = state
            .framebuffers
            .get(&id.0)
            .ok_or(ResourceError::NotFound)?;
        let status = match &state.faults.incomplete_framebuffers {
            Some(reason) => FramebufferStatus::Incomplete(reason.clone()),
            None => state.framebuffer_status(framebuffer),
        };
        if let FramebufferStatus::Incomplete(reason) = &status {
            log::debug!(
                "HeadlessDevice: Framebuffer '{}' incomplete: {reason}",
                framebuffer.label
            );
        }
        Ok(status)
    }

    fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError> {
        let mut state = self.lock("framebuffers")?;
        if state.framebuffers.remove(&id.0).is_some() {
            log::debug!("HeadlessDevice: Destroyed framebuffer with ID: {id:?}");
            Ok(())
        } else {
            Err(ResourceError::NotFound)
        }
    }

    fn create_command_encoder(&self, label: Option<&str>) -> Box<dyn CommandEncoder> {
        Box::new(HeadlessCommandEncoder {
            state: Arc::clone(&self.state),
            label: label.map(str::to_string),
            passes: Vec::new(),
        })
    }

    fn submit_command_buffer(&self, command_buffer: CommandBufferId) {
        let Ok(mut state) = self.lock("submitted") else {
            log::error!("HeadlessDevice: State mutex poisoned, dropping {command_buffer:?}");
            return;
        };
        match state.pending.remove(&command_buffer.0) {
            Some(passes) => state.submitted.extend(passes),
            None => log::warn!("HeadlessDevice: Unknown command buffer {command_buffer:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use umbra_core::renderer::{RenderPassDescriptor, RenderTarget, UniformRange};

    fn texture(device: &HeadlessDevice, w: u32, h: u32, format: TextureFormat) -> TextureId {
        device
            .create_texture(&TextureDescriptor {
                label: None,
                width: w,
                height: h,
                format,
                sampler: SamplerState::NEAREST_CLAMP,
                mipmapped: false,
            })
            .unwrap()
    }

    #[test]
    fn limits_can_be_withheld() {
        assert!(HeadlessDevice::new().limits().is_ok());
        assert!(matches!(
            HeadlessDevice::without_limits().limits(),
            Err(RenderError::CapabilityQueryFailed(_))
        ));
    }

    #[test]
    fn buffer_writes_are_bounds_checked() {
        let device = HeadlessDevice::new();
        let id = device
            .create_buffer(&BufferDescriptor {
                label: Some(Cow::Borrowed("uniforms")),
                size: 8,
                usage: BufferUsage::Uniform,
            })
            .unwrap();
        device.write_buffer(id, 4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(device.buffer_contents(id).unwrap(), vec![0, 0, 0, 0, 1, 2, 3, 4]);
        assert!(matches!(
            device.write_buffer(id, 6, &[0; 4]),
            Err(ResourceError::OutOfBounds)
        ));
        device.destroy_buffer(id).unwrap();
        assert!(matches!(device.destroy_buffer(id), Err(ResourceError::NotFound)));
    }

    #[test]
    fn mipmapped_textures_get_a_full_chain() {
        let device = HeadlessDevice::new();
        let id = device
            .create_texture(&TextureDescriptor {
                label: None,
                width: 256,
                height: 64,
                format: TextureFormat::Rgba8Unorm,
                sampler: SamplerState::TRILINEAR_REPEAT,
                mipmapped: true,
            })
            .unwrap();
        assert_eq!(device.texture_info(id).unwrap().mip_levels, 9);
        assert!(device.write_texture(id, &[0; 16]).is_err());
        device.write_texture(id, &vec![0; 256 * 64 * 4]).unwrap();
        assert!(device.texture_info(id).unwrap().initialized);
    }

    #[test]
    fn framebuffer_completeness() {
        let device = HeadlessDevice::new();
        let color = texture(&device, 64, 64, TextureFormat::Rgba8Unorm);
        let depth = texture(&device, 64, 64, TextureFormat::Depth24);
        let small = texture(&device, 32, 32, TextureFormat::Rgba8Unorm);

        let ok = device
            .create_framebuffer(&FramebufferDescriptor {
                label: None,
                color_attachments: &[color],
                depth_attachment: Some(depth),
            })
            .unwrap();
        assert!(device.framebuffer_status(ok).unwrap().is_complete());

        let mismatched = device
            .create_framebuffer(&FramebufferDescriptor {
                label: None,
                color_attachments: &[color, small],
                depth_attachment: Some(depth),
            })
            .unwrap();
        assert!(!device.framebuffer_status(mismatched).unwrap().is_complete());

        let swapped = device
            .create_framebuffer(&FramebufferDescriptor {
                label: None,
                color_attachments: &[depth],
                depth_attachment: None,
            })
            .unwrap();
        assert!(!device.framebuffer_status(swapped).unwrap().is_complete());
    }

    #[test]
    fn injected_faults_override_real_checks() {
        let device = HeadlessDevice::new();
        let color = texture(&device, 8, 8, TextureFormat::Rgba8Unorm);
        let framebuffer = device
            .create_framebuffer(&FramebufferDescriptor {
                label: None,
                color_attachments: &[color],
                depth_attachment: None,
            })
            .unwrap();

        device.reject_framebuffers(Some("driver says no"));
        assert_eq!(
            device.framebuffer_status(framebuffer).unwrap(),
            FramebufferStatus::Incomplete("driver says no".to_string())
        );
        device.reject_framebuffers(None);
        assert!(device.framebuffer_status(framebuffer).unwrap().is_complete());
        assert_eq!(device.framebuffer_count(), 1);

        let descriptor = ProgramDescriptor {
            label: "quad",
            vertex_source: Cow::Borrowed("void main() {}\n"),
            fragment_source: Cow::Borrowed("void main() {}\n"),
        };
        device.fail_program_creation(true);
        assert!(matches!(
            device.create_program(&descriptor),
            Err(ResourceError::BackendError(_))
        ));
        device.fail_program_creation(false);
        assert!(device.create_program(&descriptor).unwrap().is_linked());
    }

    #[test]
    fn failed_programs_keep_a_handle_without_inputs() {
        let device = HeadlessDevice::new();
        let build = device
            .create_program(&ProgramDescriptor {
                label: "broken",
                vertex_source: Cow::Borrowed("layout(location = 0) in vec3 p;\n"),
                fragment_source: Cow::Borrowed("void main() {}\n"),
            })
            .unwrap();
        assert!(!build.is_linked());
        assert!(matches!(build.errors[0], ShaderError::CompilationError { .. }));
        assert!(matches!(build.errors.last(), Some(ShaderError::LinkError { .. })));
        assert!(device.is_program_alive(build.handle));
        assert!(device.program_vertex_inputs(build.handle).unwrap().is_empty());
    }

    #[test]
    fn passes_are_visible_only_after_submission() {
        let device = HeadlessDevice::new();
        let mut encoder = device.create_command_encoder(Some("frame"));
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some(Cow::Borrowed("main")),
                target: RenderTarget::Screen,
                clear_color: Some([0.0, 0.0, 0.0, 1.0]),
                clear_depth: None,
                depth_test: false,
            });
            pass.set_program(ProgramHandle(1));
            pass.set_uniform_range(0, BufferId(2), UniformRange { offset: 0, size: 16 });
            pass.set_texture(0, Some(TextureId(3)));
            pass.draw_indexed(0..6, 0);
        }
        let buffer = encoder.finish();
        assert!(device.submitted_passes().is_empty());

        device.submit_command_buffer(buffer);
        let passes = device.take_submitted_passes();
        assert_eq!(passes.len(), 1);
        let draws = passes[0].draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count(), 6);
        assert_eq!(draws[0].textures.get(&0), Some(&TextureId(3)));
        assert!(device.submitted_passes().is_empty());
    }
}
