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

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use umbra_lanes::render_lane::GBufferAttachment;

/// What the renderer shows. Each mode is a fixed sequence of passes.
///
/// Configuration names modes by [`RenderMode::name`] (`"framebuffer"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RenderMode {
    /// A single texture on the fullscreen quad.
    TexturedQuad,
    /// Forward-lit meshes straight to the screen.
    Mesh,
    /// Meshes into the G-buffer, then all five attachments composited.
    #[default]
    Framebuffer,
    /// The G-buffer albedo attachment alone.
    Albedo,
    /// The G-buffer normals attachment alone.
    Normal,
    /// The G-buffer position attachment alone.
    Position,
    /// The G-buffer depth attachment through the depth view program.
    Depth,
}

/// An unrecognized mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown render mode '{0}'")]
pub struct ParseModeError(pub String);

impl RenderMode {
    /// Every mode, in cycling order.
    pub const ALL: [RenderMode; 7] = [
        RenderMode::TexturedQuad,
        RenderMode::Mesh,
        RenderMode::Framebuffer,
        RenderMode::Albedo,
        RenderMode::Normal,
        RenderMode::Position,
        RenderMode::Depth,
    ];

    /// Configuration name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::TexturedQuad => "textured_quad",
            RenderMode::Mesh => "mesh",
            RenderMode::Framebuffer => "framebuffer",
            RenderMode::Albedo => "albedo",
            RenderMode::Normal => "normal",
            RenderMode::Position => "position",
            RenderMode::Depth => "depth",
        }
    }

    /// The next mode, wrapping around.
    pub fn cycle(self) -> RenderMode {
        let index = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Whether the mode draws meshes into the G-buffer before compositing.
    pub fn uses_gbuffer(self) -> bool {
        !matches!(self, RenderMode::TexturedQuad | RenderMode::Mesh)
    }

    /// The single attachment a debug view samples, if any.
    pub fn debug_attachment(self) -> Option<GBufferAttachment> {
        match self {
            RenderMode::Albedo => Some(GBufferAttachment::AlbedoAo),
            RenderMode::Normal => Some(GBufferAttachment::Normals),
            RenderMode::Position => Some(GBufferAttachment::Position),
            RenderMode::TexturedQuad
            | RenderMode::Mesh
            | RenderMode::Framebuffer
            | RenderMode::Depth => None,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

impl TryFrom<String> for RenderMode {
    type Error = ParseModeError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_and_tolerate_spelling() {
        for mode in RenderMode::ALL {
            assert_eq!(mode.name().parse::<RenderMode>(), Ok(mode));
        }
        assert_eq!("Textured-Quad".parse(), Ok(RenderMode::TexturedQuad));
        assert_eq!(
            "wireframe".parse::<RenderMode>(),
            Err(ParseModeError("wireframe".to_string()))
        );
    }

    #[test]
    fn cycle_visits_every_mode() {
        let mut mode = RenderMode::TexturedQuad;
        let mut seen = Vec::new();
        for _ in 0..RenderMode::ALL.len() {
            seen.push(mode);
            mode = mode.cycle();
        }
        assert_eq!(seen, RenderMode::ALL);
        assert_eq!(mode, RenderMode::TexturedQuad);
    }

    #[test]
    fn gbuffer_modes_and_their_attachments() {
        let gbuffer: Vec<RenderMode> = RenderMode::ALL
            .into_iter()
            .filter(|mode| mode.uses_gbuffer())
            .collect();
        assert_eq!(
            gbuffer,
            [
                RenderMode::Framebuffer,
                RenderMode::Albedo,
                RenderMode::Normal,
                RenderMode::Position,
                RenderMode::Depth,
            ]
        );
        assert_eq!(
            RenderMode::Normal.debug_attachment(),
            Some(GBufferAttachment::Normals)
        );
        assert_eq!(RenderMode::Framebuffer.debug_attachment(), None);
        assert_eq!(RenderMode::Depth.debug_attachment(), None);
    }
}
