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

//! Shader-side binding declarations.
//!
//! A compiled shader module declares, for every binding set it uses, an ordered list of
//! named bindings. These declarations are immutable once the module is loaded and are
//! only ever read by the resolver.

mod binding;
mod reflection;

pub use self::binding::*;
pub use self::reflection::*;

use crate::renderer::api::util::ShaderStageFlags;
use std::fmt::Debug;

/// An opaque handle representing a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderModuleId(pub usize);

/// The binding-related view of a compiled shader module.
///
/// Implemented by whatever object owns the shader binary. The binding subsystem only
/// needs to enumerate the declared binding sets and the stages the module runs in.
pub trait ShaderModuleBinary: Send + Sync + Debug {
    /// Returns the id of the module.
    fn id(&self) -> ShaderModuleId;

    /// Returns a human-readable label used in diagnostics.
    fn label(&self) -> &str {
        ""
    }

    /// Returns the number of binding sets declared by the module.
    fn binding_set_count(&self) -> usize;

    /// Returns the binding set at position `index` (not the set id).
    fn binding_set(&self, index: usize) -> Option<&ShaderBindingSetInfo>;

    /// Returns the stages this module is used in.
    fn shader_stages(&self) -> ShaderStageFlags;
}
