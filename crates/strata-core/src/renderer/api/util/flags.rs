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

//! Flags representing which shader stages can access a resource binding.

use super::enums::ShaderStage;
use serde::{Deserialize, Serialize};

/// Flags representing which shader stages can access a resource binding.
///
/// Declarations coming from different stages that share a binding slot are merged
/// by OR-ing their flags together, so a slot seen by both the vertex and the
/// fragment module ends up visible to [`ShaderStageFlags::VERTEX_FRAGMENT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaderStageFlags {
    bits: u32,
}

impl ShaderStageFlags {
    /// No shader stages.
    pub const NONE: Self = Self { bits: 0 };
    /// Vertex shader stage.
    pub const VERTEX: Self = Self { bits: 1 << 0 };
    /// Fragment shader stage.
    pub const FRAGMENT: Self = Self { bits: 1 << 1 };
    /// Compute shader stage.
    pub const COMPUTE: Self = Self { bits: 1 << 2 };
    /// All graphics stages (vertex + fragment).
    pub const VERTEX_FRAGMENT: Self = Self {
        bits: Self::VERTEX.bits | Self::FRAGMENT.bits,
    };
    /// All stages.
    pub const ALL: Self = Self {
        bits: Self::VERTEX.bits | Self::FRAGMENT.bits | Self::COMPUTE.bits,
    };

    /// Creates a new set of shader stage flags from raw bits.
    ///
    /// Bits that do not correspond to a known stage are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits: bits & Self::ALL.bits,
        }
    }

    /// Creates flags from a single shader stage.
    pub const fn from_stage(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => Self::VERTEX,
            ShaderStage::Fragment => Self::FRAGMENT,
            ShaderStage::Compute => Self::COMPUTE,
        }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if these flags contain a specific stage.
    pub const fn contains(&self, stage: ShaderStage) -> bool {
        let stage_bits = Self::from_stage(stage).bits;
        (self.bits & stage_bits) == stage_bits
    }

    /// Checks if these flags are empty (no stages).
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates over the individual stages contained in these flags.
    pub fn stages(self) -> impl Iterator<Item = ShaderStage> {
        ShaderStage::ALL
            .into_iter()
            .filter(move |stage| self.contains(*stage))
    }
}

impl From<ShaderStage> for ShaderStageFlags {
    fn from(stage: ShaderStage) -> Self {
        Self::from_stage(stage)
    }
}

impl std::ops::BitOr for ShaderStageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ShaderStageFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl std::fmt::Display for ShaderStageFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for stage in self.stages() {
            if !first {
                f.write_str("|")?;
            }
            first = false;
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}
