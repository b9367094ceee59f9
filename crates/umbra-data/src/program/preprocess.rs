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

use umbra_core::renderer::ShaderStage;

/// First line of every synthesized translation unit.
pub const VERSION_DIRECTIVE: &str = "#version 450 core";

/// Turns a program name into the identifier it is defined as.
///
/// `"mesh"` becomes `MESH`, `"depth-view"` becomes `DEPTH_VIEW`. A leading digit is
/// prefixed with `_`.
pub fn program_define(name: &str) -> String {
    let mut define: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if define.is_empty() || define.starts_with(|c: char| c.is_ascii_digit()) {
        define.insert(0, '_');
    }
    define
}

/// Builds one stage's translation unit from the shared program source.
///
/// The shared source must not carry its own `#version` line; it selects its stage
/// with `#ifdef VERTEX` / `#ifdef FRAGMENT`.
pub fn compose_stage(source: &str, program_name: &str, stage: ShaderStage) -> String {
    format!(
        "{VERSION_DIRECTIVE}\n#define {}\n#define {}\n{source}",
        program_define(program_name),
        stage.define()
    )
}
