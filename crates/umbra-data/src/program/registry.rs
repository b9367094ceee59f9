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
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use umbra_core::asset::SourceProvider;
use umbra_core::renderer::{
    GraphicsDevice, ProgramDescriptor, ProgramHandle, ResourceError, ShaderError, ShaderStage,
};

use super::preprocess::compose_stage;

/// Stable identity of a program inside its registry.
///
/// Survives hot-reloads; only the [`ProgramHandle`] behind it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub usize);

/// One entry of a program's vertex-input contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexInput {
    /// Attribute location.
    pub location: u32,
    /// 1 for a scalar, 2..=4 for a vector.
    pub component_count: u32,
}

/// Errors raised when (re)building a registered program.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// The ID does not belong to this registry.
    #[error("program {0:?} is not registered")]
    Unknown(ProgramId),
    /// The source could not be read. The previous build is still in place.
    #[error("source of program '{name}' could not be read: {reason}")]
    Unreadable {
        /// Program name.
        name: String,
        /// I/O error text.
        reason: String,
    },
    /// The device refused to create a program object at all.
    #[error("device error while building a program: {0}")]
    Device(#[from] ResourceError),
}

/// A compiled program together with its identity and reflected inputs.
#[derive(Debug)]
pub struct Program {
    id: ProgramId,
    name: String,
    path: PathBuf,
    handle: ProgramHandle,
    modified: Option<SystemTime>,
    inputs: Vec<VertexInput>,
    diagnostics: Vec<ShaderError>,
}

impl Program {
    /// The registry identity.
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// The name given at load time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current device program object.
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Source modification time recorded at the last (re)build, if it was known.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Active vertex inputs, ordered by location.
    pub fn inputs(&self) -> &[VertexInput] {
        &self.inputs
    }

    /// Diagnostics of the last build. Empty on success.
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// Whether the last build linked.
    pub fn is_functional(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub(crate) fn set_modified(&mut self, modified: Option<SystemTime>) {
        self.modified = modified;
    }
}

struct Built {
    handle: ProgramHandle,
    inputs: Vec<VertexInput>,
    diagnostics: Vec<ShaderError>,
}

/// Owns every shader program the renderer uses.
///
/// Programs keep their slot for the lifetime of the registry, so a [`ProgramId`] is
/// a plain index.
#[derive(Debug, Default)]
pub struct ProgramRegistry {
    programs: Vec<Program>,
}

impl ProgramRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path`, builds a vertex and a fragment stage from it and links them.
    ///
    /// Build failures are logged and kept as diagnostics on the returned program; an
    /// unreadable file is treated as empty source. Either way the program is
    /// registered and can be fixed through hot-reload.
    ///
    /// ## Errors
    /// * `ProgramError::Device` - If the device could not create a program object.
    pub fn load(
        &mut self,
        device: &dyn GraphicsDevice,
        sources: &dyn SourceProvider,
        path: impl Into<PathBuf>,
        name: &str,
    ) -> Result<ProgramId, ProgramError> {
        let path = path.into();
        let modified = sources.modified(&path).ok();
        let (source, load_error) = match sources.read_to_string(&path) {
            Ok(source) => (source, None),
            Err(e) => {
                let error = ShaderError::LoadError {
                    path: path.display().to_string(),
                    source_error: e.to_string(),
                };
                log::error!("ProgramRegistry: {error}");
                (String::new(), Some(error))
            }
        };

        let mut built = build(device, name, &source)?;
        if let Some(error) = load_error {
            built.diagnostics.insert(0, error);
        }

        let id = ProgramId(self.programs.len());
        log::info!(
            "ProgramRegistry: Loaded '{name}' from '{}' as {id:?} ({} input(s), functional: {})",
            path.display(),
            built.inputs.len(),
            built.diagnostics.is_empty()
        );
        self.programs.push(Program {
            id,
            name: name.to_string(),
            path,
            handle: built.handle,
            modified,
            inputs: built.inputs,
            diagnostics: built.diagnostics,
        });
        Ok(id)
    }

    /// Rebuilds a program from its source, in place.
    ///
    /// The old program object is destroyed and replaced; identity, name, path and
    /// registry position are kept. Returns the new handle.
    ///
    /// ## Errors
    /// * `ProgramError::Unreadable` - The source could not be read; nothing changed.
    /// * `ProgramError::Device` - No program object could be created. The old one is
    ///   already gone, so the entry is marked non-functional until a later reload
    ///   succeeds.
    pub fn reload(
        &mut self,
        device: &dyn GraphicsDevice,
        sources: &dyn SourceProvider,
        id: ProgramId,
    ) -> Result<ProgramHandle, ProgramError> {
        let program = self
            .programs
            .get_mut(id.0)
            .ok_or(ProgramError::Unknown(id))?;

        let source = sources
            .read_to_string(&program.path)
            .map_err(|e| ProgramError::Unreadable {
                name: program.name.clone(),
                reason: e.to_string(),
            })?;

        if let Err(e) = device.destroy_program(program.handle) {
            log::warn!(
                "ProgramRegistry: Failed to destroy old handle {:?} of '{}': {e}",
                program.handle,
                program.name
            );
        }

        let built = match build(device, &program.name, &source) {
            Ok(built) => built,
            Err(e) => {
                program.inputs.clear();
                program.diagnostics = vec![ShaderError::LinkError {
                    label: program.name.clone(),
                    details: format!("no program object after reload: {e}"),
                }];
                return Err(e.into());
            }
        };
        log::info!(
            "ProgramRegistry: Reloaded '{}' ({:?} -> {:?}, functional: {})",
            program.name,
            program.handle,
            built.handle,
            built.diagnostics.is_empty()
        );
        program.handle = built.handle;
        program.inputs = built.inputs;
        program.diagnostics = built.diagnostics;
        Ok(program.handle)
    }

    /// Returns a program by identity.
    pub fn get(&self, id: ProgramId) -> Option<&Program> {
        self.programs.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ProgramId) -> Option<&mut Program> {
        self.programs.get_mut(id.0)
    }

    /// Looks a program up by the name it was loaded with.
    pub fn find(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.name == name)
    }

    /// Iterates over every registered program, in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    /// Number of registered programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Destroys every program object. The registry is empty afterwards.
    pub fn destroy_all(&mut self, device: &dyn GraphicsDevice) {
        for program in self.programs.drain(..) {
            if let Err(e) = device.destroy_program(program.handle) {
                log::warn!(
                    "ProgramRegistry: Failed to destroy '{}' ({:?}): {e}",
                    program.name,
                    program.handle
                );
            }
        }
    }
}

fn build(device: &dyn GraphicsDevice, name: &str, source: &str) -> Result<Built, ResourceError> {
    let descriptor = ProgramDescriptor {
        label: name,
        vertex_source: Cow::Owned(compose_stage(source, name, ShaderStage::Vertex)),
        fragment_source: Cow::Owned(compose_stage(source, name, ShaderStage::Fragment)),
    };
    let build = device.create_program(&descriptor)?;
    for error in &build.errors {
        log::error!("ProgramRegistry: {error}");
    }

    let mut inputs: Vec<VertexInput> = if build.is_linked() {
        device
            .program_vertex_inputs(build.handle)?
            .into_iter()
            .map(|input| VertexInput {
                location: input.location,
                component_count: input.ty.component_count(),
            })
            .collect()
    } else {
        Vec::new()
    };
    inputs.sort_by_key(|input| input.location);

    Ok(Built {
        handle: build.handle,
        inputs,
        diagnostics: build.errors,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::MemorySources;
    use umbra_infra::HeadlessDevice;

    pub(crate) const MESH_SOURCE: &str = "#ifdef VERTEX
layout(location = 1) in vec3 a_normal;
layout(location = 0) in vec3 a_position;
layout(location = 2) in vec2 a_uv;
void main() {}
#endif
#ifdef FRAGMENT
void main() {}
#endif
";

    #[test]
    fn load_reflects_inputs_in_location_order() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", MESH_SOURCE, 1);

        let mut registry = ProgramRegistry::new();
        let id = registry
            .load(&device, &sources, "mesh.glsl", "mesh")
            .unwrap();
        let program = registry.get(id).unwrap();

        assert!(program.is_functional());
        assert_eq!(
            program.inputs(),
            &[
                VertexInput { location: 0, component_count: 3 },
                VertexInput { location: 1, component_count: 3 },
                VertexInput { location: 2, component_count: 2 },
            ]
        );
        assert_eq!(registry.find("mesh").map(Program::id), Some(id));
    }

    #[test]
    fn broken_source_still_registers_a_program() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("bad.glsl", "#ifdef VERTEX\nvoid main() {}\n#endif\n", 1);

        let mut registry = ProgramRegistry::new();
        let id = registry.load(&device, &sources, "bad.glsl", "bad").unwrap();
        let program = registry.get(id).unwrap();

        assert!(!program.is_functional());
        assert!(program.inputs().is_empty());
        assert!(device.is_program_alive(program.handle()));
    }

    #[test]
    fn unreadable_source_is_a_load_diagnostic() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();

        let mut registry = ProgramRegistry::new();
        let id = registry
            .load(&device, &sources, "missing.glsl", "missing")
            .unwrap();
        let program = registry.get(id).unwrap();

        assert!(matches!(
            program.diagnostics().first(),
            Some(ShaderError::LoadError { .. })
        ));
        assert!(program.modified().is_none());
    }

    #[test]
    fn reload_replaces_handle_and_keeps_identity() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", MESH_SOURCE, 1);

        let mut registry = ProgramRegistry::new();
        let id = registry
            .load(&device, &sources, "mesh.glsl", "mesh")
            .unwrap();
        let old = registry.get(id).unwrap().handle();

        let new = registry.reload(&device, &sources, id).unwrap();
        assert_ne!(old, new);
        assert!(!device.is_program_alive(old));
        assert_eq!(registry.get(id).unwrap().handle(), new);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn device_failure_during_reload_disables_the_program() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", MESH_SOURCE, 1);

        let mut registry = ProgramRegistry::new();
        let id = registry
            .load(&device, &sources, "mesh.glsl", "mesh")
            .unwrap();
        let old = registry.get(id).unwrap().handle();

        device.fail_program_creation(true);
        let err = registry.reload(&device, &sources, id).unwrap_err();
        assert!(matches!(err, ProgramError::Device(_)));
        let program = registry.get(id).unwrap();
        assert!(!device.is_program_alive(old));
        assert!(!program.is_functional());
        assert!(program.inputs().is_empty());

        device.fail_program_creation(false);
        registry.reload(&device, &sources, id).unwrap();
        let program = registry.get(id).unwrap();
        assert!(program.is_functional());
        assert_eq!(program.inputs().len(), 3);
    }

    #[test]
    fn reload_without_source_keeps_the_old_build() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", MESH_SOURCE, 1);

        let mut registry = ProgramRegistry::new();
        let id = registry
            .load(&device, &sources, "mesh.glsl", "mesh")
            .unwrap();
        let old = registry.get(id).unwrap().handle();
        sources.remove("mesh.glsl");

        let err = registry.reload(&device, &sources, id).unwrap_err();
        assert!(matches!(err, ProgramError::Unreadable { .. }));
        assert_eq!(registry.get(id).unwrap().handle(), old);
        assert!(device.is_program_alive(old));
        assert!(matches!(
            registry.reload(&device, &sources, ProgramId(9)),
            Err(ProgramError::Unknown(_))
        ));
    }
}
