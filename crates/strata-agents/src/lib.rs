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

//! Agents that turn shader modules and resource registries into pipeline bindings.
//!
//! The agents drive the lanes of `strata-lanes`: they decide which registry a set is
//! resolved against, cache the results that can be shared, and fan work out over
//! worker threads.

#![warn(missing_docs)]

pub mod binding_agent;
