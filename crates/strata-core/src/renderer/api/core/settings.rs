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

//! Global settings for binding resolution.

use serde::{Deserialize, Serialize};

/// A collection of settings that affect how binding sets are resolved and assembled.
///
/// Settings are plain data so they can live in a RON configuration file next to the
/// rest of the engine's configuration:
///
/// ```
/// use strata_core::renderer::BindingSettings;
///
/// let settings = BindingSettings::from_ron_str("(max_worker_threads: 8)").unwrap();
/// assert_eq!(settings.max_worker_threads, 8);
/// assert!(settings.require_fragment_stage);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingSettings {
    /// If `true`, sets skipped because the registry provides none of their bindings
    /// are reported at debug level.
    pub log_skipped_sets: bool,
    /// If `true`, environment-provided descriptors are cached and shared between
    /// pipelines whose environment sets have the same layout. Registries that do not
    /// track their name set are resolved on every build regardless.
    pub cache_environment_sets: bool,
    /// If `true`, graphics pipelines without a fragment module are rejected.
    pub require_fragment_stage: bool,
    /// The maximum number of worker threads used for batch resolution.
    pub max_worker_threads: usize,
    /// The number of binding sets a pipeline may use. Shaders declaring a set index at
    /// or above this limit are rejected before any set is resolved.
    pub max_binding_sets: u32,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            log_skipped_sets: true,
            cache_environment_sets: true,
            require_fragment_stage: true,
            max_worker_threads: 4,
            max_binding_sets: 8,
        }
    }
}

impl BindingSettings {
    /// Parses settings from a RON document. Missing fields keep their default values.
    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        let mut settings: BindingSettings = ron::from_str(source)?;
        settings.max_worker_threads = settings.max_worker_threads.max(1);
        Ok(settings)
    }

    /// Returns the number of worker threads to use, never less than one.
    pub fn worker_threads(&self) -> usize {
        self.max_worker_threads.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = BindingSettings::from_ron_str("()").unwrap();
        assert_eq!(settings, BindingSettings::default());
    }

    #[test]
    fn worker_threads_are_clamped() {
        let settings = BindingSettings::from_ron_str("(max_worker_threads: 0)").unwrap();
        assert_eq!(settings.max_worker_threads, 1);

        let manual = BindingSettings {
            max_worker_threads: 0,
            ..Default::default()
        };
        assert_eq!(manual.worker_threads(), 1);
    }

    #[test]
    fn binding_set_limit_defaults_to_eight() {
        assert_eq!(BindingSettings::default().max_binding_sets, 8);

        let settings = BindingSettings::from_ron_str("(max_binding_sets: 4)").unwrap();
        assert_eq!(settings.max_binding_sets, 4);
        assert_eq!(settings.max_worker_threads, 4);
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(BindingSettings::from_ron_str("(log_skipped_sets: 3)").is_err());
    }
}
