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

//! The typed event stream delivered to the application loop.

use crate::input::InputEvent;
use crate::platform::window::WindowHandle;

/// A lifecycle or input event observed by the worker thread.
///
/// Produced only by the [`EventPoller`](crate::EventPoller), delivered to
/// the application's [`EventHandler`] exactly once, and never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// A window surface became available. The application may start drawing
    /// to the carried handle.
    WindowCreated(WindowHandle),
    /// The carried window surface is going away. The application must stop
    /// using it before the handler returns.
    WindowDestroyed(WindowHandle),
    /// The worker woke up from a pause.
    Resumed {
        /// Monotonic timestamp, in seconds since the worker was started.
        /// Always delivered before the `WindowCreated` replay that follows a
        /// resume, so the application has a valid time base for
        /// window-dependent work.
        time_secs: f64,
    },
    /// A user input event drained from the attached input queue.
    Input(InputEvent),
    /// The host asked the worker to shut down. The application loop is
    /// expected to exit after observing this; the bridge does not force
    /// termination.
    CloseRequested,
}

/// The application-side consumer of [`BridgeEvent`]s.
///
/// Called synchronously from the worker thread only, never concurrently
/// with itself and never re-entrantly. The returned `bool` reports whether
/// the event was handled; for input events it is forwarded back to the
/// input queue when the event is finished.
pub trait EventHandler {
    /// Handles one event, returning whether it was consumed.
    fn handle(&mut self, event: BridgeEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(BridgeEvent) -> bool,
{
    fn handle(&mut self, event: BridgeEvent) -> bool {
        self(event)
    }
}
