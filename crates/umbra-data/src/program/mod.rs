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

//! Shader programs: compilation from a shared source, vertex-input reflection and
//! hot-reload.

mod hot_reload;
mod preprocess;
mod registry;

pub use self::preprocess::{compose_stage, program_define, VERSION_DIRECTIVE};
pub use self::registry::{Program, ProgramError, ProgramId, ProgramRegistry, VertexInput};
