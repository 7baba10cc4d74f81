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

//! Resource-side binding contracts.
//!
//! - [`NamedBinding`]: a named, mutable holder of a live resource handle.
//! - [`ResourceBindingRegistry`]: the lookup surface the resolver queries by name.
//! - [`BindingCollection`] and [`CompositeRegistry`]: a simple container-backed registry.

mod collection;
mod named;
mod registry;

pub use self::collection::*;
pub use self::named::*;
pub use self::registry::*;
