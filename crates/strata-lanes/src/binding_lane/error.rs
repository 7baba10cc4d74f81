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

//! Errors raised while resolving binding sets.

use strata_core::renderer::ShaderBindingKind;
use thiserror::Error;

/// A fatal condition that aborts a whole resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The same `(set, binding)` is declared as two different resource kinds.
    #[error(
        "binding '{name}' at set {set} binding {binding} is declared as both {first} and {second}"
    )]
    KindConflict {
        /// The binding set index.
        set: u32,
        /// The slot index within the set.
        binding: u32,
        /// The name of the conflicting binding.
        name: String,
        /// The kind seen first.
        first: ShaderBindingKind,
        /// The conflicting kind.
        second: ShaderBindingKind,
    },
    /// Some, but not all, bindings of a set were found in the registry.
    #[error("binding set {set} incomplete: {found} binding(s) resolved, missing {missing:?}")]
    IncompleteBindingSet {
        /// The binding set index.
        set: u32,
        /// How many bindings were found.
        found: usize,
        /// The names that could not be resolved, in slot order.
        missing: Vec<String>,
    },
}

impl ResolutionError {
    /// Returns the set index the error refers to.
    pub fn set(&self) -> u32 {
        match self {
            ResolutionError::KindConflict { set, .. }
            | ResolutionError::IncompleteBindingSet { set, .. } => *set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_conflict_display_names_both_kinds() {
        let err = ResolutionError::KindConflict {
            set: 0,
            binding: 5,
            name: "lights".to_string(),
            first: ShaderBindingKind::ConstantBuffer,
            second: ShaderBindingKind::StructuredBuffer,
        };
        assert_eq!(
            err.to_string(),
            "binding 'lights' at set 0 binding 5 is declared as both constant buffer and structured buffer"
        );
        assert_eq!(err.set(), 0);
    }

    #[test]
    fn incomplete_set_display_lists_missing_names() {
        let err = ResolutionError::IncompleteBindingSet {
            set: 2,
            found: 1,
            missing: vec!["albedo".to_string(), "normal".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "binding set 2 incomplete: 1 binding(s) resolved, missing [\"albedo\", \"normal\"]"
        );
        assert_eq!(err.set(), 2);
    }
}
