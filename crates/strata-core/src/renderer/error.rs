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

//! Defines the error types shared by the binding subsystem.

use crate::renderer::api::shader::ShaderModuleId;
use std::fmt;

/// An error related to the reflection data of a shader module.
#[derive(Debug)]
pub enum ShaderError {
    /// The reflection manifest of a shader could not be parsed.
    ParseError {
        /// A descriptive label for the shader, if available.
        label: String,
        /// Detailed error message from the parser.
        details: String,
    },
    /// The same `(set, binding)` pair was declared twice within one module.
    DuplicateBinding {
        /// The module that carries the duplicate declaration.
        module: ShaderModuleId,
        /// The binding set index.
        set: u32,
        /// The slot index within the set.
        binding: u32,
    },
    /// A binding was declared without a name, so it can never be looked up.
    UnnamedBinding {
        /// The module that carries the declaration.
        module: ShaderModuleId,
        /// The binding set index.
        set: u32,
        /// The slot index within the set.
        binding: u32,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::ParseError { label, details } => {
                write!(f, "Failed to parse reflection data for '{label}': {details}")
            }
            ShaderError::DuplicateBinding {
                module,
                set,
                binding,
            } => {
                write!(
                    f,
                    "Shader module {module:?} declares set {set} binding {binding} more than once"
                )
            }
            ShaderError::UnnamedBinding {
                module,
                set,
                binding,
            } => {
                write!(
                    f,
                    "Shader module {module:?} declares an unnamed binding at set {set} binding {binding}"
                )
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation of backend objects from resolved bindings.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A referenced layout or resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::DuplicateBinding {
            module: ShaderModuleId(3),
            set: 1,
            binding: 4,
        };
        assert_eq!(
            format!("{err}"),
            "Shader module ShaderModuleId(3) declares set 1 binding 4 more than once"
        );

        let err_parse = ShaderError::ParseError {
            label: "lit.vert".to_string(),
            details: "unexpected token".to_string(),
        };
        assert_eq!(
            format!("{err_parse}"),
            "Failed to parse reflection data for 'lit.vert': unexpected token"
        );
    }

    #[test]
    fn resource_error_wraps_shader_error() {
        let shader_err = ShaderError::UnnamedBinding {
            module: ShaderModuleId(7),
            set: 0,
            binding: 2,
        };
        let res_err: ResourceError = shader_err.into();
        assert_eq!(
            format!("{res_err}"),
            "Shader resource error: Shader module ShaderModuleId(7) declares an unnamed binding at set 0 binding 2"
        );
        assert!(res_err.source().is_some());
        assert!(ResourceError::NotFound.source().is_none());
    }
}
