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

//! The opaque window handle forwarded through the bridge.

use raw_window_handle::RawWindowHandle;

/// An opaque, non-owning reference to an OS-owned window surface.
///
/// The handle's lifetime belongs to the operating system: it is valid
/// between the host's window-created and window-destroyed callbacks, and the
/// bridge never dereferences or frees it. The bridge only forwards it to the
/// application and compares it by identity (e.g. to decide whether a reset
/// refers to the currently remembered window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle {
    raw: RawWindowHandle,
}

// The wrapped raw handle is treated as an identity token: the bridge moves
// it between the control and worker threads but never dereferences it.
unsafe impl Send for WindowHandle {}
unsafe impl Sync for WindowHandle {}

impl WindowHandle {
    /// Wraps a raw platform window handle.
    pub fn from_raw(raw: RawWindowHandle) -> Self {
        Self { raw }
    }

    /// Returns the underlying raw handle, e.g. to create a rendering
    /// surface for it.
    pub fn raw(&self) -> RawWindowHandle {
        self.raw
    }
}

impl From<RawWindowHandle> for WindowHandle {
    fn from(raw: RawWindowHandle) -> Self {
        Self::from_raw(raw)
    }
}
