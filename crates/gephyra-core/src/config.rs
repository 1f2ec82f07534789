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

//! Configuration for the lifecycle bridge.

use serde::{Deserialize, Serialize};

/// Configuration for a [`BridgeController`](crate::BridgeController).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Name given to the spawned worker thread, visible in debuggers and
    /// thread listings.
    pub thread_name: String,
    /// Optional stack size for the worker thread, in bytes.
    /// `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name: "gephyra-worker".to_string(),
            stack_size: None,
        }
    }
}
