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

use std::fmt;
use std::sync::Arc;

use crate::input::InputQueueHandle;
use crate::platform::window::WindowHandle;

/// A lifecycle request travelling from the control thread to the worker.
///
/// Exactly one message is in flight at a time; the rendezvous channel's
/// slot is the container, not a queue.
#[derive(Clone)]
pub(crate) enum BridgeMessage {
    /// A window surface became available.
    SetWindow(WindowHandle),
    /// The carried window surface is going away.
    ResetWindow(WindowHandle),
    /// Attach this input queue to the worker's poll cycle.
    SetInputQueue(InputQueueHandle),
    /// Detach this input queue from the worker's poll cycle.
    ResetInputQueue(InputQueueHandle),
    /// Suspend the worker until the host resumes it.
    Pause,
    /// Ask the application loop to exit.
    Close,
}

impl fmt::Debug for BridgeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeMessage::SetWindow(window) => write!(f, "SetWindow({window:?})"),
            BridgeMessage::ResetWindow(window) => write!(f, "ResetWindow({window:?})"),
            BridgeMessage::SetInputQueue(queue) => {
                write!(f, "SetInputQueue({:p})", Arc::as_ptr(queue))
            }
            BridgeMessage::ResetInputQueue(queue) => {
                write!(f, "ResetInputQueue({:p})", Arc::as_ptr(queue))
            }
            BridgeMessage::Pause => write!(f, "Pause"),
            BridgeMessage::Close => write!(f, "Close"),
        }
    }
}
