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

//! Device capabilities queried once at initialization.

/// Hardware limits that drive uniform buffer sizing and alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Largest uniform block the device accepts, in bytes.
    pub max_uniform_block_size: u64,
    /// Required alignment of a uniform range's start offset, in bytes.
    pub min_uniform_block_offset_alignment: u64,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_uniform_block_size: 64 * 1024,
            min_uniform_block_offset_alignment: 256,
        }
    }
}
