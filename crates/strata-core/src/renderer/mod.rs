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

//! Provides the public, backend-agnostic binding contracts for Strata.
//!
//! This module defines the "common language" shared by the binding resolver and
//! its collaborators. It contains the shader-side declarations (what a compiled
//! module expects), the resource-side lookup surface (what materials, objects and
//! environments can provide), and the device seam used to turn a resolved layout
//! into backend objects.
//!
//! The 'what' lives here; the resolution algorithm itself is implemented in the
//! `strata-lanes` crate and orchestrated by `strata-agents`.

pub mod api;
pub mod binding;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::binding::*;
pub use self::error::{ResourceError, ShaderError};
pub use self::traits::BindingDevice;
