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

//! Wavefront OBJ/MTL scene import backed by `tobj`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use umbra_core::asset::{
    ContentError, RawMaterial, RawMesh, RawNode, RawScene, SceneImporter, TextureKind,
    TextureSlots,
};

use super::tangent_space::{compute_smooth_normals, compute_tangent_space};

/// Imports OBJ files as a two-level tree: one root node with one child per OBJ
/// object (`o`/`g` group).
///
/// OBJ has no node transforms, so the output is already in scene space. Missing
/// normals are generated; tangent frames are generated whenever texture coordinates
/// exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjSceneImporter;

/// Maximum OBJ `Ns` exponent, mapped to a smoothness of 1.
const MAX_SHININESS: f32 = 1000.0;

fn parse_color(value: &str) -> Option<[f32; 3]> {
    let mut channels = value.split_whitespace().map(str::parse::<f32>);
    match (channels.next(), channels.next(), channels.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b))) => Some([r, g, b]),
        _ => None,
    }
}

/// MTL map statements may carry options (`-bm 0.5 file.png`); the file is last.
fn texture_path(directory: &Path, statement: &str) -> Option<PathBuf> {
    statement
        .split_whitespace()
        .last()
        .map(|file| directory.join(file))
}

fn convert_material(directory: &Path, material: &tobj::Material) -> RawMaterial {
    let param = |key: &str| material.unknown_param.get(key).map(String::as_str);
    let defaults = RawMaterial::default();

    let mut textures = TextureSlots::default();
    let sources = [
        (TextureKind::Diffuse, material.diffuse_texture.as_deref()),
        (TextureKind::Emissive, param("map_Ke")),
        (TextureKind::Specular, material.specular_texture.as_deref()),
        (
            TextureKind::Normals,
            material.normal_texture.as_deref().or_else(|| param("norm")),
        ),
        (TextureKind::Height, param("disp").or_else(|| param("bump"))),
    ];
    for (kind, statement) in sources {
        textures.set(kind, statement.and_then(|s| texture_path(directory, s)));
    }

    RawMaterial {
        name: material.name.clone(),
        albedo: material.diffuse.unwrap_or(defaults.albedo),
        emissive: param("Ke").and_then(parse_color).unwrap_or(defaults.emissive),
        smoothness: material
            .shininess
            .map_or(defaults.smoothness, |ns| (ns / MAX_SHININESS).clamp(0.0, 1.0)),
        textures,
    }
}

fn convert_mesh(model: &tobj::Model) -> RawMesh {
    let mesh = &model.mesh;
    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|v| [v[0], v[1], v[2]])
        .collect();

    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    } else {
        log::debug!(
            "ObjSceneImporter: '{}' has no normals, generating smooth normals",
            model.name
        );
        compute_smooth_normals(&positions, &mesh.indices)
    };

    let tex_coords: Option<Vec<[f32; 2]>> =
        (!mesh.texcoords.is_empty() && mesh.texcoords.len() / 2 == positions.len()).then(|| {
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| [t[0], t[1]])
                .collect()
        });

    let (tangents, bitangents) = match &tex_coords {
        Some(uvs) => {
            let (t, b) = compute_tangent_space(&positions, &normals, uvs, &mesh.indices);
            (Some(t), Some(b))
        }
        None => (None, None),
    };

    RawMesh {
        name: model.name.clone(),
        positions,
        normals,
        tex_coords,
        tangents,
        bitangents,
        indices: mesh.indices.clone(),
        material_index: mesh.material_id.unwrap_or(0),
    }
}

fn load_scene(path: &Path) -> Result<RawScene> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("Failed to parse OBJ file '{}'", path.display()))?;

    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let materials = match materials {
        Ok(materials) => materials
            .iter()
            .map(|m| convert_material(directory, m))
            .collect(),
        Err(e) => {
            log::warn!(
                "ObjSceneImporter: No usable material library for '{}': {e}",
                path.display()
            );
            Vec::new()
        }
    };

    let mut root = RawNode {
        name: path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };
    let mut meshes = Vec::with_capacity(models.len());
    for model in &models {
        if model.mesh.indices.is_empty() {
            log::debug!("ObjSceneImporter: Skipping empty object '{}'", model.name);
            continue;
        }
        root.children.push(RawNode {
            name: model.name.clone(),
            meshes: vec![meshes.len()],
            children: Vec::new(),
        });
        meshes.push(convert_mesh(model));
    }

    Ok(RawScene {
        root,
        meshes,
        materials,
    })
}

impl SceneImporter for ObjSceneImporter {
    fn import(&self, path: &Path) -> std::result::Result<RawScene, ContentError> {
        let scene = load_scene(path).map_err(|e| ContentError::SceneImport {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
        log::info!(
            "ObjSceneImporter: Imported '{}' ({} mesh(es), {} material(s))",
            path.display(),
            scene.meshes.len(),
            scene.materials.len()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    const OBJ: &str = "mtllib scene.mtl
o Floor
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl tiles
f 1/1 2/2 3/3 4/4
o Marker
v 0 1 0
v 1 1 0
v 0 2 0
usemtl glow
f 5 6 7
";

    const MTL: &str = "newmtl tiles
Kd 0.5 0.5 0.5
Ns 500
map_Kd textures/tiles.png
norm textures/tiles_n.png

newmtl glow
Kd 1 0 0
Ke 2 1 0
map_Ke glow.png
";

    fn write_scene() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scene.obj"), OBJ).unwrap();
        fs::write(dir.path().join("scene.mtl"), MTL).unwrap();
        dir
    }

    #[test]
    fn imports_objects_as_children_of_one_root() {
        let dir = write_scene();
        let scene = ObjSceneImporter
            .import(&dir.path().join("scene.obj"))
            .unwrap();

        assert_eq!(scene.root.name, "scene");
        assert_eq!(scene.root.children.len(), 2);
        assert_eq!(scene.meshes.len(), 2);

        let floor = &scene.meshes[0];
        assert_eq!(floor.indices.len(), 6, "quad is triangulated");
        assert!(floor.tex_coords.is_some());
        assert!(floor.has_tangent_space());

        let marker = &scene.meshes[1];
        assert!(marker.tex_coords.is_none());
        assert!(!marker.has_tangent_space());
        assert_eq!(marker.normals.len(), 3);
        assert_relative_eq!(marker.normals[0][2].abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn materials_resolve_textures_against_scene_directory() {
        let dir = write_scene();
        let scene = ObjSceneImporter
            .import(&dir.path().join("scene.obj"))
            .unwrap();

        let tiles = &scene.materials[scene.meshes[0].material_index];
        assert_eq!(tiles.name, "tiles");
        assert_relative_eq!(tiles.smoothness, 0.5);
        assert_eq!(
            tiles.textures.albedo.as_deref(),
            Some(dir.path().join("textures/tiles.png").as_path())
        );
        assert!(tiles.textures.normals.is_some());
        assert!(tiles.textures.emissive.is_none());

        let glow = &scene.materials[scene.meshes[1].material_index];
        assert_eq!(glow.emissive, [2.0, 1.0, 0.0]);
        assert_eq!(glow.textures.count(), 1);
        assert!(glow.textures.emissive.is_some());
    }

    #[test]
    fn missing_file_is_a_content_error() {
        let err = ObjSceneImporter
            .import(Path::new("missing/scene.obj"))
            .unwrap_err();
        assert!(matches!(err, ContentError::SceneImport { .. }));
    }
}
