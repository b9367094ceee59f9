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

//! Shader programs, their build results and vertex-input reflection.

use crate::renderer::error::ShaderError;
use std::borrow::Cow;
use std::fmt;

/// An opaque handle to a linked (or failed) program object on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub usize);

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl ShaderStage {
    /// The preprocessor define that selects this stage in a shared source file.
    pub fn define(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// The two translation units handed to the device for one program.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    /// A label used in diagnostics.
    pub label: &'a str,
    /// Full vertex-stage source, directives included.
    pub vertex_source: Cow<'a, str>,
    /// Full fragment-stage source, directives included.
    pub fragment_source: Cow<'a, str>,
}

/// What the device hands back after compiling and linking a program.
///
/// A handle is always produced, even when compilation or linking failed, so callers
/// can keep running and retry later.
#[derive(Debug)]
pub struct ProgramBuild {
    /// The program object.
    pub handle: ProgramHandle,
    /// Compile and link diagnostics. Empty on success.
    pub errors: Vec<ShaderError>,
}

impl ProgramBuild {
    /// Returns `true` if both stages compiled and the program linked.
    pub fn is_linked(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Declared type of a vertex input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexInputType {
    /// `float`
    Float,
    /// `vec2`
    Vec2,
    /// `vec3`
    Vec3,
    /// `vec4`
    Vec4,
}

impl VertexInputType {
    /// Number of 32-bit float components.
    pub fn component_count(&self) -> u32 {
        match self {
            VertexInputType::Float => 1,
            VertexInputType::Vec2 => 2,
            VertexInputType::Vec3 => 3,
            VertexInputType::Vec4 => 4,
        }
    }

    /// Parses a GLSL type keyword.
    pub fn from_glsl(keyword: &str) -> Option<Self> {
        match keyword {
            "float" => Some(VertexInputType::Float),
            "vec2" => Some(VertexInputType::Vec2),
            "vec3" => Some(VertexInputType::Vec3),
            "vec4" => Some(VertexInputType::Vec4),
            _ => None,
        }
    }
}

/// A vertex input reported by the device after linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVertexInput {
    /// The input's name in source.
    pub name: String,
    /// The attribute location it reads from.
    pub location: u32,
    /// Its declared type.
    pub ty: VertexInputType,
}
