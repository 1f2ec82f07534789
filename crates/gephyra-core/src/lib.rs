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

//! # Gephyra Core
//!
//! A bridge between an operating-system-owned control thread (the thread on
//! which window, input-queue and pause/resume callbacks arrive) and a single
//! long-lived worker thread running a render/logic loop.
//!
//! The control side drives a [`BridgeController`]; the worker side drives an
//! [`EventPoller`] once per loop iteration and observes the host's lifecycle
//! as a linearized stream of [`BridgeEvent`]s. The control thread does not
//! return from a lifecycle call until the worker has fully applied it.

#![warn(missing_docs)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod platform;
pub mod utils;

pub use bridge::{BridgeController, EventPoller, LifecycleState};
pub use config::BridgeConfig;
pub use error::{BridgeError, ChannelError};
pub use event::{BridgeEvent, EventHandler};
pub use input::{ChannelInputQueue, InputEvent, InputQueue, InputQueueHandle};
pub use platform::window::WindowHandle;
pub use utils::timer::Stopwatch;
