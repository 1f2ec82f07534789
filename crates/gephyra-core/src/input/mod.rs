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

//! Input events and the input-queue contract the bridge drains them from.

use std::sync::Arc;

mod channel_queue;

pub use self::channel_queue::{ChannelInputQueue, ReservedFilter};

/// A backend-agnostic representation of a user input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyPressed {
        /// The raw platform key code.
        key_code: u32,
    },
    /// A key was released.
    KeyReleased {
        /// The raw platform key code.
        key_code: u32,
    },
    /// A touch pointer went down.
    TouchBegan {
        /// The platform pointer id.
        pointer: u32,
        /// The x-coordinate in surface pixels.
        x: f32,
        /// The y-coordinate in surface pixels.
        y: f32,
    },
    /// A touch pointer moved.
    TouchMoved {
        /// The platform pointer id.
        pointer: u32,
        /// The x-coordinate in surface pixels.
        x: f32,
        /// The y-coordinate in surface pixels.
        y: f32,
    },
    /// A touch pointer was lifted.
    TouchEnded {
        /// The platform pointer id.
        pointer: u32,
        /// The x-coordinate in surface pixels.
        x: f32,
        /// The y-coordinate in surface pixels.
        y: f32,
    },
}

/// The contract of an OS-owned input queue.
///
/// Any input backend can implement this trait to feed events through the
/// bridge. The queue is attached to and detached from the worker's poll
/// cycle by lifecycle messages; while attached, the
/// [`EventPoller`](crate::EventPoller) drains it completely on each poll
/// that finds it readable.
pub trait InputQueue: Send + Sync {
    /// Takes the next pending event, if any. Must not block.
    fn next_event(&self) -> Option<InputEvent>;

    /// Returns `true` when the platform claims this event for itself (for
    /// example for IME pre-processing). Claimed events are not delivered to
    /// the application and must not be finished by the caller.
    fn pre_dispatch(&self, event: &InputEvent) -> bool;

    /// Reports the application's verdict for a delivered event back to the
    /// platform.
    fn finish_event(&self, event: InputEvent, handled: bool);
}

/// A shared, non-owning reference to an input queue.
///
/// The queue's real owner is the host platform; the bridge compares handles
/// by identity ([`Arc::ptr_eq`]) to decide whether a detach request refers
/// to the currently attached queue.
pub type InputQueueHandle = Arc<dyn InputQueue>;
