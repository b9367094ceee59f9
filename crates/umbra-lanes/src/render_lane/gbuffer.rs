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

//! The deferred geometry buffer: five color attachments and a depth attachment
//! assembled into one offscreen target.

use std::borrow::Cow;

use umbra_core::renderer::{
    FramebufferDescriptor, FramebufferId, FramebufferStatus, GraphicsDevice, RenderError,
    RenderTarget, SamplerState, TextureDescriptor, TextureFormat, TextureId,
};

/// The color attachments of a [`GBuffer`], in attachment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GBufferAttachment {
    /// Albedo in RGB, ambient occlusion in A.
    AlbedoAo,
    /// Specular in RGB, roughness in A.
    SpecularRoughness,
    /// World-space normals.
    Normals,
    /// Emitted color.
    Emissive,
    /// World-space position, in floating point.
    Position,
}

impl GBufferAttachment {
    /// Every color attachment, in attachment (and composite texture unit) order.
    pub const ALL: [GBufferAttachment; 5] = [
        GBufferAttachment::AlbedoAo,
        GBufferAttachment::SpecularRoughness,
        GBufferAttachment::Normals,
        GBufferAttachment::Emissive,
        GBufferAttachment::Position,
    ];

    /// Storage format.
    pub fn format(self) -> TextureFormat {
        match self {
            GBufferAttachment::Position => TextureFormat::Rgba16Float,
            _ => TextureFormat::Rgba8Unorm,
        }
    }

    /// Attachment index.
    pub fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            GBufferAttachment::AlbedoAo => "GBuffer Albedo+AO",
            GBufferAttachment::SpecularRoughness => "GBuffer Specular+Roughness",
            GBufferAttachment::Normals => "GBuffer Normals",
            GBufferAttachment::Emissive => "GBuffer Emissive",
            GBufferAttachment::Position => "GBuffer Position",
        }
    }
}

const LABEL: &str = "GBuffer";
const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth24;

/// A complete, display-sized G-buffer.
///
/// All attachments share the same size, use nearest filtering and clamp to edge.
#[derive(Debug)]
pub struct GBuffer {
    width: u32,
    height: u32,
    colors: [TextureId; 5],
    depth: TextureId,
    framebuffer: FramebufferId,
}

fn attachment_texture(
    device: &dyn GraphicsDevice,
    label: &'static str,
    width: u32,
    height: u32,
    format: TextureFormat,
) -> Result<TextureId, RenderError> {
    Ok(device.create_texture(&TextureDescriptor {
        label: Some(Cow::Borrowed(label)),
        width,
        height,
        format,
        sampler: SamplerState::NEAREST_CLAMP,
        mipmapped: false,
    })?)
}

fn release_textures(device: &dyn GraphicsDevice, textures: &[TextureId]) {
    for &texture in textures {
        if let Err(e) = device.destroy_texture(texture) {
            log::warn!("GBuffer: Failed to destroy attachment {texture:?}: {e}");
        }
    }
}

impl GBuffer {
    /// Creates every attachment and verifies the target is complete.
    ///
    /// ## Errors
    /// * `RenderError::IncompleteFramebuffer` - The device rejected the target.
    /// * `RenderError::ResourceError` - An attachment could not be created.
    ///
    /// Nothing is leaked on failure.
    pub fn create(device: &dyn GraphicsDevice, width: u32, height: u32) -> Result<Self, RenderError> {
        let mut created: Vec<TextureId> = Vec::with_capacity(6);
        let result = Self::create_into(device, width, height, &mut created);
        if result.is_err() {
            release_textures(device, &created);
        }
        result
    }

    fn create_into(
        device: &dyn GraphicsDevice,
        width: u32,
        height: u32,
        created: &mut Vec<TextureId>,
    ) -> Result<Self, RenderError> {
        for attachment in GBufferAttachment::ALL {
            let texture =
                attachment_texture(device, attachment.label(), width, height, attachment.format())?;
            created.push(texture);
        }
        let depth = attachment_texture(device, "GBuffer Depth", width, height, DEPTH_FORMAT)?;
        created.push(depth);

        let colors = [created[0], created[1], created[2], created[3], created[4]];
        let framebuffer = device.create_framebuffer(&FramebufferDescriptor {
            label: Some(Cow::Borrowed(LABEL)),
            color_attachments: &colors,
            depth_attachment: Some(depth),
        })?;

        match device.framebuffer_status(framebuffer)? {
            FramebufferStatus::Complete => {}
            FramebufferStatus::Incomplete(reason) => {
                log::error!("GBuffer: Target is incomplete: {reason}");
                if let Err(e) = device.destroy_framebuffer(framebuffer) {
                    log::warn!("GBuffer: Failed to destroy {framebuffer:?}: {e}");
                }
                return Err(RenderError::IncompleteFramebuffer {
                    label: LABEL.to_string(),
                    reason,
                });
            }
        }

        log::info!("GBuffer: Created {width}x{height} target {framebuffer:?}");
        Ok(Self {
            width,
            height,
            colors,
            depth,
            framebuffer,
        })
    }

    /// Recreates every attachment at the new size. A no-op if the size is
    /// unchanged. On failure the current target is kept.
    pub fn resize(
        &mut self,
        device: &dyn GraphicsDevice,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        let replacement = Self::create(device, width, height)?;
        let old = std::mem::replace(self, replacement);
        old.destroy(device);
        Ok(())
    }

    /// Releases the target and every attachment.
    pub fn destroy(self, device: &dyn GraphicsDevice) {
        if let Err(e) = device.destroy_framebuffer(self.framebuffer) {
            log::warn!("GBuffer: Failed to destroy {:?}: {e}", self.framebuffer);
        }
        release_textures(device, &self.colors);
        release_textures(device, &[self.depth]);
        log::debug!("GBuffer: Destroyed {}x{} target", self.width, self.height);
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The texture backing a color attachment.
    pub fn attachment(&self, attachment: GBufferAttachment) -> TextureId {
        self.colors[attachment.index()]
    }

    /// All color attachments, in attachment order.
    pub fn color_attachments(&self) -> &[TextureId; 5] {
        &self.colors
    }

    /// The depth attachment.
    pub fn depth(&self) -> TextureId {
        self.depth
    }

    /// The offscreen framebuffer.
    pub fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    /// The render target geometry passes write to.
    pub fn target(&self) -> RenderTarget {
        RenderTarget::Offscreen(self.framebuffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_infra::HeadlessDevice;

    #[test]
    fn attachments_have_expected_formats_and_sampling() {
        let device = HeadlessDevice::new();
        let gbuffer = GBuffer::create(&device, 320, 200).unwrap();

        for attachment in GBufferAttachment::ALL {
            let info = device.texture_info(gbuffer.attachment(attachment)).unwrap();
            assert_eq!(info.format, attachment.format());
            assert_eq!((info.width, info.height), (320, 200));
            assert_eq!(info.sampler, SamplerState::NEAREST_CLAMP);
        }
        let position = device
            .texture_info(gbuffer.attachment(GBufferAttachment::Position))
            .unwrap();
        assert_eq!(position.format, TextureFormat::Rgba16Float);
        assert!(device.texture_info(gbuffer.depth()).unwrap().format.is_depth());
        assert_eq!(device.texture_count(), 6);
    }

    #[test]
    fn resize_recreates_and_releases() {
        let device = HeadlessDevice::new();
        let mut gbuffer = GBuffer::create(&device, 64, 64).unwrap();
        let before = gbuffer.framebuffer();

        gbuffer.resize(&device, 64, 64).unwrap();
        assert_eq!(gbuffer.framebuffer(), before);

        gbuffer.resize(&device, 128, 32).unwrap();
        assert_ne!(gbuffer.framebuffer(), before);
        assert_eq!(gbuffer.size(), (128, 32));
        assert_eq!(device.texture_count(), 6);

        gbuffer.destroy(&device);
        assert_eq!(device.texture_count(), 0);
    }

    #[test]
    fn incomplete_target_is_fatal_and_releases_everything() {
        let device = HeadlessDevice::new();
        device.reject_framebuffers(Some("unsupported attachment combination"));

        let err = GBuffer::create(&device, 64, 64).unwrap_err();
        match err {
            RenderError::IncompleteFramebuffer { label, reason } => {
                assert_eq!(label, "GBuffer");
                assert_eq!(reason, "unsupported attachment combination");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(device.framebuffer_count(), 0);
        assert_eq!(device.texture_count(), 0);
    }

    #[test]
    fn failed_resize_keeps_the_current_target() {
        let device = HeadlessDevice::new();
        let mut gbuffer = GBuffer::create(&device, 64, 64).unwrap();
        let before = gbuffer.framebuffer();

        device.reject_framebuffers(Some("too large"));
        assert!(gbuffer.resize(&device, 128, 128).is_err());
        assert_eq!(gbuffer.framebuffer(), before);
        assert_eq!(gbuffer.size(), (64, 64));
        assert_eq!(device.framebuffer_count(), 1);
        assert_eq!(device.texture_count(), 6);
    }

    #[test]
    fn zero_sized_target_fails_without_leaking() {
        let device = HeadlessDevice::new();
        assert!(GBuffer::create(&device, 0, 10).is_err());
        assert_eq!(device.texture_count(), 0);
    }
}
