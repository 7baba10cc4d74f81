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

//! Binding lane - turns shader binding declarations into resolved binding sets.
//!
//! The lane runs in three steps:
//!
//! 1. [`aggregate_bindings`] merges the declarations of every stage into one
//!    per-set, per-slot view and rejects kind conflicts.
//! 2. [`BindingSetResolver`] looks every slot up in a [`ResourceBindingRegistry`]
//!    and classifies each set as resolved, foreign, or incomplete.
//! 3. Resolved sets become [`BindingSetDescriptor`]s, reported as
//!    [`BindingSetInfo`] values in ascending set order.
//!
//! [`ResourceBindingRegistry`]: strata_core::renderer::ResourceBindingRegistry

mod aggregator;
mod descriptor;
mod error;
mod resolver;

pub use aggregator::*;
pub use descriptor::*;
pub use error::*;
pub use resolver::*;
