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

use super::ContentError;
use std::path::{Path, PathBuf};

/// The five texture roles a material can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Base color. Stored in the material's albedo slot.
    Diffuse,
    /// Self-illumination.
    Emissive,
    /// Specular intensity.
    Specular,
    /// Tangent-space normals.
    Normals,
    /// Height field. Stored in the material's bump slot.
    Height,
}

impl TextureKind {
    /// Every kind, in slot order.
    pub const ALL: [TextureKind; 5] = [
        TextureKind::Diffuse,
        TextureKind::Emissive,
        TextureKind::Specular,
        TextureKind::Normals,
        TextureKind::Height,
    ];
}

/// One optional value per [`TextureKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSlots<T> {
    /// Diffuse / albedo slot.
    pub albedo: Option<T>,
    /// Emissive slot.
    pub emissive: Option<T>,
    /// Specular slot.
    pub specular: Option<T>,
    /// Normal map slot.
    pub normals: Option<T>,
    /// Height / bump slot.
    pub bump: Option<T>,
}

impl<T> Default for TextureSlots<T> {
    fn default() -> Self {
        Self {
            albedo: None,
            emissive: None,
            specular: None,
            normals: None,
            bump: None,
        }
    }
}

impl<T> TextureSlots<T> {
    /// Returns the slot for `kind`.
    pub fn get(&self, kind: TextureKind) -> Option<&T> {
        match kind {
            TextureKind::Diffuse => self.albedo.as_ref(),
            TextureKind::Emissive => self.emissive.as_ref(),
            TextureKind::Specular => self.specular.as_ref(),
            TextureKind::Normals => self.normals.as_ref(),
            TextureKind::Height => self.bump.as_ref(),
        }
    }

    /// Replaces the slot for `kind`.
    pub fn set(&mut self, kind: TextureKind, value: Option<T>) {
        let slot = match kind {
            TextureKind::Diffuse => &mut self.albedo,
            TextureKind::Emissive => &mut self.emissive,
            TextureKind::Specular => &mut self.specular,
            TextureKind::Normals => &mut self.normals,
            TextureKind::Height => &mut self.bump,
        };
        *slot = value;
    }

    /// Number of populated slots.
    pub fn count(&self) -> usize {
        TextureKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .count()
    }
}

/// Triangulated geometry for one mesh, already in scene space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    /// Mesh name, for diagnostics.
    pub name: String,
    /// One position per vertex.
    pub positions: Vec<[f32; 3]>,
    /// One normal per vertex.
    pub normals: Vec<[f32; 3]>,
    /// Optional texture coordinates, one per vertex.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    /// Optional tangents, one per vertex. Only used together with `bitangents`.
    pub tangents: Option<Vec<[f32; 3]>>,
    /// Optional bitangents, one per vertex. Only used together with `tangents`.
    pub bitangents: Option<Vec<[f32; 3]>>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Index into [`RawScene::materials`].
    pub material_index: usize,
}

impl RawMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` when both tangents and bitangents are present.
    pub fn has_tangent_space(&self) -> bool {
        self.tangents.is_some() && self.bitangents.is_some()
    }
}

/// Material properties as found in the scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMaterial {
    /// Material name.
    pub name: String,
    /// Diffuse color.
    pub albedo: [f32; 3],
    /// Emissive color.
    pub emissive: [f32; 3],
    /// Smoothness in `[0, 1]`.
    pub smoothness: f32,
    /// Texture paths, already resolved against the scene file's directory.
    pub textures: TextureSlots<PathBuf>,
}

impl Default for RawMaterial {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            albedo: [1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            smoothness: 0.0,
            textures: TextureSlots::default(),
        }
    }
}

/// A node of the scene tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNode {
    /// Node name.
    pub name: String,
    /// Indices into [`RawScene::meshes`].
    pub meshes: Vec<usize>,
    /// Child nodes.
    pub children: Vec<RawNode>,
}

/// Everything a scene importer produces for one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScene {
    /// Root of the node tree.
    pub root: RawNode,
    /// Every mesh referenced by the tree.
    pub meshes: Vec<RawMesh>,
    /// Every material referenced by the meshes.
    pub materials: Vec<RawMaterial>,
}

/// Parses a scene file.
pub trait SceneImporter {
    /// Imports the scene at `path`, pre-triangulated and pre-transformed into a
    /// single coordinate space.
    fn import(&self, path: &Path) -> Result<RawScene, ContentError>;
}
