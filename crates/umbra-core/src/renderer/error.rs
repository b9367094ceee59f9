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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::program::ShaderStage;
use std::fmt;

/// An error related to loading, compiling or linking a shader program.
///
/// These are reported, never fatal: the program keeps a (non-functional) handle and
/// the engine keeps running so the source can be fixed and hot-reloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The shader source could not be read.
    LoadError {
        /// The path of the file that failed to load.
        path: String,
        /// The underlying I/O error.
        source_error: String,
    },
    /// One stage failed to compile.
    CompilationError {
        /// The program label.
        label: String,
        /// The stage that failed.
        stage: ShaderStage,
        /// Compiler output.
        details: String,
    },
    /// The compiled stages failed to link.
    LinkError {
        /// The program label.
        label: String,
        /// Linker output.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LoadError { path, source_error } => {
                write!(
                    f,
                    "Failed to load shader source from '{path}': {source_error}"
                )
            }
            ShaderError::CompilationError {
                label,
                stage,
                details,
            } => {
                write!(
                    f,
                    "Shader compilation failed for '{label}' ({stage} stage): {details}"
                )
            }
            ShaderError::LinkError { label, details } => {
                write!(f, "Program link failed for '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// An attempt was made to access a resource out of its bounds.
    OutOfBounds,
    /// The device cannot honour the request (format, size, ...).
    Unsupported(String),
    /// An error originating from the backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::Unsupported(msg) => write!(f, "Unsupported resource request: {msg}"),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A fatal error raised while bringing the renderer up.
///
/// Nothing downstream can run without the device capabilities or the offscreen
/// target, so these abort startup.
#[derive(Debug)]
pub enum RenderError {
    /// The device could not report its limits.
    CapabilityQueryFailed(String),
    /// An offscreen target was created but is not renderable.
    IncompleteFramebuffer {
        /// The target's label.
        label: String,
        /// The device's reason.
        reason: String,
    },
    /// Any other initialization failure.
    InitializationFailed(String),
    /// A resource operation failed during initialization.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::CapabilityQueryFailed(msg) => {
                write!(f, "Failed to query device capabilities: {msg}")
            }
            RenderError::IncompleteFramebuffer { label, reason } => {
                write!(f, "Framebuffer '{label}' is incomplete: {reason}")
            }
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize renderer: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::LoadError {
            path: "shaders/mesh.glsl".to_string(),
            source_error: "File not found".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Failed to load shader source from 'shaders/mesh.glsl': File not found"
        );

        let err_comp = ShaderError::CompilationError {
            label: "mesh".to_string(),
            stage: ShaderStage::Fragment,
            details: "syntax error at line 5".to_string(),
        };
        assert_eq!(
            format!("{err_comp}"),
            "Shader compilation failed for 'mesh' (fragment stage): syntax error at line 5"
        );
    }

    #[test]
    fn render_error_wraps_resource_error() {
        let render_err: RenderError = ResourceError::OutOfBounds.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Resource access out of bounds."
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn incomplete_framebuffer_display() {
        let err = RenderError::IncompleteFramebuffer {
            label: "GBuffer".to_string(),
            reason: "attachment sizes differ".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Framebuffer 'GBuffer' is incomplete: attachment sizes differ"
        );
    }
}
