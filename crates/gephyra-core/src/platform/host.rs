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

//! Services the host platform offers to the application loop.
//!
//! These sit next to the lifecycle bridge rather than inside it: the worker
//! loop may call them at any time, independently of the bridge's state. The
//! bridge itself never invokes them.

use std::fs;
use std::path::PathBuf;

/// Read-only access to the host's packaged assets.
///
/// Implementations return the full asset contents, or `None` when the asset
/// does not exist or cannot be read.
pub trait AssetSource: Send + Sync {
    /// Loads the named asset into a buffer.
    fn load(&self, name: &str) -> Option<Vec<u8>>;
}

/// Visibility toggle for the host's on-screen keyboard.
///
/// Unrelated to lifecycle state; the application loop may call it whether
/// the bridge is alive or paused.
pub trait SoftKeyboard: Send + Sync {
    /// Shows or hides the on-screen keyboard.
    fn set_visible(&self, visible: bool);
}

/// An [`AssetSource`] backed by a plain directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    /// Creates an asset source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssetSource {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.root.join(name);
        log::debug!("Loading asset \"{name}\"");
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::info!("Failed to load asset \"{name}\": {err}");
                None
            }
        }
    }
}
