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

use umbra_core::asset::SourceProvider;
use umbra_core::renderer::GraphicsDevice;

use super::registry::{ProgramError, ProgramId, ProgramRegistry};

impl ProgramRegistry {
    /// Rebuilds every program whose source changed since its last build.
    ///
    /// Meant to be called once per frame. Returns the identities that got a new
    /// handle; bind objects created against them must be evicted by the caller.
    /// A program whose source cannot be read keeps its previous build and is
    /// retried on the next tick.
    pub fn tick(
        &mut self,
        device: &dyn GraphicsDevice,
        sources: &dyn SourceProvider,
    ) -> Vec<ProgramId> {
        let mut reloaded = Vec::new();

        for index in 0..self.len() {
            let id = ProgramId(index);
            let Some(program) = self.get(id) else {
                continue;
            };

            let modified = match sources.modified(program.path()) {
                Ok(modified) => modified,
                Err(e) => {
                    log::debug!(
                        "ProgramRegistry: Cannot stat '{}' for '{}': {e}",
                        program.path().display(),
                        program.name()
                    );
                    continue;
                }
            };
            if program.modified().is_some_and(|known| modified <= known) {
                continue;
            }

            match self.reload(device, sources, id) {
                Ok(_) => {
                    if let Some(program) = self.get_mut(id) {
                        program.set_modified(Some(modified));
                    }
                    reloaded.push(id);
                }
                Err(ProgramError::Unreadable { name, reason }) => {
                    log::warn!("ProgramRegistry: Keeping previous build of '{name}': {reason}");
                }
                Err(e) => {
                    log::error!("ProgramRegistry: Hot-reload of {id:?} failed: {e}");
                    // The old object is gone; force another attempt next tick.
                    if let Some(program) = self.get_mut(id) {
                        program.set_modified(None);
                    }
                }
            }
        }

        reloaded
    }
}

#[cfg(test)]
mod tests {
    use super::super::registry::tests::MESH_SOURCE;
    use super::*;
    use crate::test_support::MemorySources;
    use umbra_infra::HeadlessDevice;

    #[test]
    fn only_touched_programs_are_reloaded() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", MESH_SOURCE, 10);
        sources.write("quad.glsl", MESH_SOURCE, 10);

        let mut registry = ProgramRegistry::new();
        let mesh = registry.load(&device, &sources, "mesh.glsl", "mesh").unwrap();
        let quad = registry.load(&device, &sources, "quad.glsl", "quad").unwrap();
        let mesh_handle = registry.get(mesh).unwrap().handle();
        let quad_handle = registry.get(quad).unwrap().handle();

        assert!(registry.tick(&device, &sources).is_empty());

        sources.write("mesh.glsl", MESH_SOURCE, 11);
        assert_eq!(registry.tick(&device, &sources), vec![mesh]);
        assert_ne!(registry.get(mesh).unwrap().handle(), mesh_handle);
        assert_eq!(registry.get(quad).unwrap().handle(), quad_handle);

        // The new timestamp is remembered.
        assert!(registry.tick(&device, &sources).is_empty());
    }

    #[test]
    fn fixing_a_broken_program_makes_it_functional() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", "#ifdef VERTEX\n#endif\n", 1);

        let mut registry = ProgramRegistry::new();
        let id = registry.load(&device, &sources, "mesh.glsl", "mesh").unwrap();
        assert!(!registry.get(id).unwrap().is_functional());

        sources.write("mesh.glsl", MESH_SOURCE, 2);
        assert_eq!(registry.tick(&device, &sources), vec![id]);
        let program = registry.get(id).unwrap();
        assert!(program.is_functional());
        assert_eq!(program.inputs().len(), 3);
    }

    #[test]
    fn program_loaded_without_source_is_built_once_it_appears() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();

        let mut registry = ProgramRegistry::new();
        let id = registry.load(&device, &sources, "late.glsl", "late").unwrap();
        assert!(registry.tick(&device, &sources).is_empty());

        sources.write("late.glsl", MESH_SOURCE, 5);
        assert_eq!(registry.tick(&device, &sources), vec![id]);
        assert!(registry.get(id).unwrap().is_functional());
    }

    #[test]
    fn device_failure_is_retried_on_the_next_tick() {
        let device = HeadlessDevice::new();
        let sources = MemorySources::default();
        sources.write("mesh.glsl", MESH_SOURCE, 1);

        let mut registry = ProgramRegistry::new();
        let id = registry.load(&device, &sources, "mesh.glsl", "mesh").unwrap();

        sources.write("mesh.glsl", MESH_SOURCE, 2);
        device.fail_program_creation(true);
        assert!(registry.tick(&device, &sources).is_empty());
        assert!(!registry.get(id).unwrap().is_functional());

        device.fail_program_creation(false);
        assert_eq!(registry.tick(&device, &sources), vec![id]);
        assert!(registry.get(id).unwrap().is_functional());
    }
}
