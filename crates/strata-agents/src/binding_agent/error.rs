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

//! Errors raised while building pipeline bindings.

use strata_core::renderer::{ResourceError, ShaderStage};
use strata_lanes::binding_lane::ResolutionError;
use thiserror::Error;

/// An error that prevents a pipeline's bindings from being built.
///
/// None of these are fatal to the frame: the object owning the pipeline is skipped
/// until the condition clears.
#[derive(Debug, Error)]
pub enum PipelineBindingError {
    /// A shader module the pipeline kind requires was not supplied.
    #[error("pipeline has no {stage} shader module")]
    MissingShaderStage {
        /// The missing stage.
        stage: ShaderStage,
    },

    /// Aggregation or resolution rejected the pipeline's bindings.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A set declared by the shaders was provided by neither the environment nor the object.
    #[error("binding set {set} is provided by neither the environment nor the object")]
    UnresolvedSetAfterBothPasses {
        /// The unclaimed set index.
        set: u32,
    },

    /// A shader declared a set index beyond the configured number of binding sets.
    #[error("binding set {set} exceeds the limit of {limit} binding sets")]
    SetIndexOutOfRange {
        /// The offending set index.
        set: u32,
        /// The configured number of binding sets.
        limit: u32,
    },

    /// The device failed to create a layout or bind group.
    #[error("device error: {0}")]
    Device(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_errors_keep_their_message() {
        let err: PipelineBindingError = ResolutionError::IncompleteBindingSet {
            set: 2,
            found: 1,
            missing: vec!["albedo".to_string()],
        }
        .into();

        assert!(err.to_string().starts_with("binding set 2 incomplete"));
    }

    #[test]
    fn missing_stage_names_the_stage() {
        let err = PipelineBindingError::MissingShaderStage {
            stage: ShaderStage::Fragment,
        };
        assert_eq!(err.to_string(), "pipeline has no fragment shader module");
    }

    #[test]
    fn set_limit_reports_index_and_limit() {
        let err = PipelineBindingError::SetIndexOutOfRange {
            set: u32::MAX,
            limit: 8,
        };
        assert_eq!(
            err.to_string(),
            "binding set 4294967295 exceeds the limit of 8 binding sets"
        );
    }
}
