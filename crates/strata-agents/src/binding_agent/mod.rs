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

//! Acts as the **[A]gent** for binding resolution.
//!
//! A pipeline's binding sets come from two layers. The [`GraphicsEnvironment`] owns
//! the registry shared by everything rendered in one pass (camera, lights, shadow
//! maps); every object brings its own registry for the rest (materials, per-object
//! constants). The environment resolves what it can, the object resolves what is
//! left, and the two are merged into one [`PipelineBindings`] indexed by set number.
//!
//! [`BindingAgent`] applies this to many objects at once and drops the ones that
//! cannot currently be rendered.

mod agent;
mod cache;
mod environment;
mod error;
mod pipeline;

pub use agent::*;
pub use cache::*;
pub use environment::*;
pub use error::*;
pub use pipeline::*;
