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

use std::borrow::Cow;
use std::path::Path;

use umbra_core::asset::{ImageDecoder, RawMesh, RawNode, SceneImporter};
use umbra_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, GraphicsDevice, ResourceError,
};

use super::material::Material;
use super::mesh::{Mesh, Submesh};
use crate::texture::TextureCache;

/// Index of a [`Mesh`] in its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Index of a [`Model`] in its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(pub usize);

/// Index of a [`Material`] in its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// A mesh plus one material per submesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// The geometry.
    pub mesh: MeshId,
    /// `materials[i]` shades `mesh.submeshes[i]`.
    pub materials: Vec<MaterialId>,
}

/// Owns meshes, materials and the models that pair them.
#[derive(Debug, Default)]
pub struct GeometryStore {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    models: Vec<Model>,
}

impl GeometryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports a scene file and turns it into one [`Model`].
    ///
    /// Every mesh reachable from the root node becomes a submesh, in depth-first
    /// order. Materials are loaded once per call, textures through the shared
    /// cache. Import failures and empty scenes are logged and yield `None` without
    /// touching the store.
    pub fn load_model(
        &mut self,
        device: &dyn GraphicsDevice,
        importer: &dyn SceneImporter,
        decoder: &dyn ImageDecoder,
        textures: &mut TextureCache,
        path: &Path,
    ) -> Option<ModelId> {
        let scene = match importer.import(path) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("GeometryStore: {e}");
                return None;
            }
        };

        let order = depth_first_meshes(&scene.root, scene.meshes.len());
        if order.is_empty() {
            log::warn!(
                "GeometryStore: Scene '{}' references no meshes",
                path.display()
            );
            return None;
        }

        let raw_meshes: Vec<&RawMesh> = order.iter().map(|&i| &scene.meshes[i]).collect();
        let label = path.display().to_string();
        let mesh = match self.upload(device, &label, &raw_meshes) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("GeometryStore: Failed to upload '{label}': {e}");
                return None;
            }
        };

        let first_material = self.materials.len();
        for raw in &scene.materials {
            self.materials
                .push(Material::load(raw, device, decoder, textures));
        }
        let mut fallback: Option<MaterialId> = None;
        let materials = raw_meshes
            .iter()
            .map(|raw| {
                if raw.material_index < scene.materials.len() {
                    MaterialId(first_material + raw.material_index)
                } else {
                    *fallback.get_or_insert_with(|| {
                        log::debug!(
                            "GeometryStore: '{}' uses a missing material, using the default",
                            raw.name
                        );
                        self.materials.push(Material::default());
                        MaterialId(self.materials.len() - 1)
                    })
                }
            })
            .collect();

        self.models.push(Model { mesh, materials });
        let id = ModelId(self.models.len() - 1);
        log::info!(
            "GeometryStore: Loaded '{label}' as {id:?} ({} submesh(es), {} material(s))",
            raw_meshes.len(),
            scene.materials.len()
        );
        Some(id)
    }

    /// Builds a mesh directly from raw geometry, one submesh per entry.
    ///
    /// ## Errors
    /// * `ResourceError::Unsupported` - If `meshes` is empty.
    /// * Any device error from buffer creation or upload.
    pub fn upload_mesh(
        &mut self,
        device: &dyn GraphicsDevice,
        label: &str,
        meshes: &[RawMesh],
    ) -> Result<MeshId, ResourceError> {
        let refs: Vec<&RawMesh> = meshes.iter().collect();
        self.upload(device, label, &refs)
    }

    fn upload(
        &mut self,
        device: &dyn GraphicsDevice,
        label: &str,
        meshes: &[&RawMesh],
    ) -> Result<MeshId, ResourceError> {
        if meshes.is_empty() {
            return Err(ResourceError::Unsupported(format!(
                "mesh '{label}' has no submeshes"
            )));
        }

        let mut submeshes: Vec<Submesh> = meshes.iter().map(|raw| Submesh::from_raw(raw)).collect();
        let (mut vertex_size, mut index_size) = (0u64, 0u64);
        for submesh in &mut submeshes {
            submesh.vertex_byte_offset = vertex_size;
            submesh.index_byte_offset = index_size;
            vertex_size += submesh.vertex_bytes().len() as u64;
            index_size += submesh.index_bytes().len() as u64;
        }

        let vertex_buffer = device.create_buffer(&BufferDescriptor {
            label: Some(Cow::Owned(format!("{label} vertices"))),
            size: vertex_size,
            usage: BufferUsage::Vertex,
        })?;
        let index_buffer = match device.create_buffer(&BufferDescriptor {
            label: Some(Cow::Owned(format!("{label} indices"))),
            size: index_size,
            usage: BufferUsage::Index,
        }) {
            Ok(buffer) => buffer,
            Err(e) => {
                release(device, &[vertex_buffer]);
                return Err(e);
            }
        };

        for submesh in &submeshes {
            let written = device
                .write_buffer(vertex_buffer, submesh.vertex_byte_offset, submesh.vertex_bytes())
                .and_then(|_| {
                    device.write_buffer(
                        index_buffer,
                        submesh.index_byte_offset,
                        submesh.index_bytes(),
                    )
                });
            if let Err(e) = written {
                release(device, &[vertex_buffer, index_buffer]);
                return Err(e);
            }
        }

        log::debug!(
            "GeometryStore: Uploaded '{label}' ({} submesh(es), {vertex_size} vertex bytes, {index_size} index bytes)",
            submeshes.len()
        );
        self.meshes.push(Mesh {
            label: label.to_string(),
            submeshes,
            vertex_buffer,
            index_buffer,
        });
        Ok(MeshId(self.meshes.len() - 1))
    }

    /// Pairs an uploaded mesh with materials. Submeshes without an entry in
    /// `materials` draw untextured.
    ///
    /// ## Errors
    /// * `ResourceError::NotFound` - The mesh or one of the materials is unknown.
    pub fn add_model(
        &mut self,
        mesh: MeshId,
        materials: Vec<MaterialId>,
    ) -> Result<ModelId, ResourceError> {
        if mesh.0 >= self.meshes.len() || materials.iter().any(|m| m.0 >= self.materials.len()) {
            return Err(ResourceError::NotFound);
        }
        self.models.push(Model { mesh, materials });
        Ok(ModelId(self.models.len() - 1))
    }

    /// Returns a mesh.
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    /// Returns a mesh for bind resolution.
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    /// Iterates mutably over every mesh.
    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.iter_mut()
    }

    /// Returns a model.
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    /// Returns a material.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Number of models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Releases every mesh. The store is empty afterwards.
    pub fn destroy_all(&mut self, device: &dyn GraphicsDevice) {
        for mesh in self.meshes.drain(..) {
            mesh.destroy(device);
        }
        self.models.clear();
        self.materials.clear();
    }
}

fn release(device: &dyn GraphicsDevice, buffers: &[BufferId]) {
    for &buffer in buffers {
        if let Err(e) = device.destroy_buffer(buffer) {
            log::warn!("GeometryStore: Failed to release {buffer:?}: {e}");
        }
    }
}

/// Pre-order walk of the node tree with an explicit stack. Out-of-range mesh
/// references are skipped.
fn depth_first_meshes(root: &RawNode, mesh_count: usize) -> Vec<usize> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for &mesh in &node.meshes {
            if mesh < mesh_count {
                order.push(mesh);
            } else {
                log::warn!(
                    "GeometryStore: Node '{}' references missing mesh {mesh}",
                    node.name
                );
            }
        }
        stack.extend(node.children.iter().rev());
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryDecoder, MemoryImporter};
    use std::path::PathBuf;
    use umbra_core::asset::{RawMaterial, RawScene, TextureSlots};
    use umbra_infra::HeadlessDevice;

    fn quad(material_index: usize) -> RawMesh {
        RawMesh {
            name: "quad".to_string(),
            positions: vec![[0.0; 3]; 4],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            tex_coords: Some(vec![[0.0; 2]; 4]),
            indices: vec![0, 1, 2, 0, 2, 3],
            material_index,
            ..Default::default()
        }
    }

    fn node(name: &str, meshes: Vec<usize>, children: Vec<RawNode>) -> RawNode {
        RawNode {
            name: name.to_string(),
            meshes,
            children,
        }
    }

    fn textured_scene() -> RawScene {
        RawScene {
            root: node(
                "root",
                vec![2],
                vec![node("a", vec![0], vec![node("a1", vec![1], vec![])])],
            ),
            meshes: vec![quad(0), quad(1), quad(7)],
            materials: vec![
                RawMaterial {
                    name: "brick".to_string(),
                    textures: TextureSlots {
                        albedo: Some(PathBuf::from("brick.png")),
                        normals: Some(PathBuf::from("brick_n.png")),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                RawMaterial {
                    name: "brick_again".to_string(),
                    textures: TextureSlots {
                        albedo: Some(PathBuf::from("brick.png")),
                        emissive: Some(PathBuf::from("missing.png")),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn depth_first_order_is_preorder() {
        let root = node(
            "r",
            vec![0],
            vec![
                node("a", vec![1], vec![node("a1", vec![2], vec![])]),
                node("b", vec![3, 9], vec![]),
            ],
        );
        assert_eq!(depth_first_meshes(&root, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn submeshes_are_packed_at_running_offsets() {
        let device = HeadlessDevice::new();
        let mut store = GeometryStore::new();
        let id = store
            .upload_mesh(&device, "pair", &[quad(0), quad(0)])
            .unwrap();
        let mesh = store.mesh(id).unwrap();

        let second = &mesh.submeshes()[1];
        assert_eq!(second.vertex_byte_offset(), 4 * 32);
        assert_eq!(second.index_byte_offset(), 6 * 4);
        assert_eq!(second.first_index(), 6);

        let vertices = device.buffer_contents(mesh.vertex_buffer()).unwrap();
        let indices = device.buffer_contents(mesh.index_buffer()).unwrap();
        assert_eq!(vertices.len(), 2 * 4 * 32);
        assert_eq!(indices.len(), 12 * 4);
        // Indices stay local to their submesh.
        assert_eq!(&indices[24..28], &0u32.to_ne_bytes());
        assert_eq!(&indices[28..32], &1u32.to_ne_bytes());
    }

    #[test]
    fn load_model_merges_tree_and_resolves_materials() {
        let device = HeadlessDevice::new();
        let importer = MemoryImporter::default().with_scene("scene.obj", textured_scene());
        let decoder = MemoryDecoder::default()
            .with_image("brick.png", 3)
            .with_image("brick_n.png", 3);
        let mut textures = TextureCache::new();
        let mut store = GeometryStore::new();

        let id = store
            .load_model(&device, &importer, &decoder, &mut textures, Path::new("scene.obj"))
            .unwrap();
        let model = store.model(id).unwrap().clone();
        let mesh = store.mesh(model.mesh).unwrap();
        assert_eq!(mesh.submeshes().len(), 3);
        assert_eq!(model.materials.len(), 3);

        // Submesh order is root (mesh 2), then a (mesh 0), then a1 (mesh 1).
        let names: Vec<_> = model
            .materials
            .iter()
            .map(|m| store.material(*m).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["default", "brick", "brick_again"]);

        let brick = store.material(model.materials[1]).unwrap();
        let again = store.material(model.materials[2]).unwrap();
        assert_eq!(brick.textures.albedo, again.textures.albedo);
        assert!(brick.textures.normals.is_some());
        assert!(again.textures.emissive.is_none());
        assert_eq!(textures.len(), 2);
    }

    #[test]
    fn failed_or_empty_imports_leave_the_store_untouched() {
        let device = HeadlessDevice::new();
        let empty = RawScene {
            root: node("root", vec![], vec![node("child", vec![], vec![])]),
            ..Default::default()
        };
        let importer = MemoryImporter::default().with_scene("empty.obj", empty);
        let decoder = MemoryDecoder::default();
        let mut textures = TextureCache::new();
        let mut store = GeometryStore::new();

        for path in ["empty.obj", "missing.obj"] {
            assert!(store
                .load_model(&device, &importer, &decoder, &mut textures, Path::new(path))
                .is_none());
        }
        assert_eq!(store.model_count(), 0);
        assert!(store.mesh(MeshId(0)).is_none());
        assert!(store.material(MaterialId(0)).is_none());
    }
}
