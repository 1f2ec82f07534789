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

//! The cross-thread lifecycle bridge.
//!
//! The control thread owns a [`BridgeController`] and calls its lifecycle
//! entry points; the worker thread drives an [`EventPoller`] once per loop
//! iteration. Between them sits a depth-1 rendezvous channel: the control
//! thread blocks on each message until the worker has fully applied it, so
//! the host never proceeds past a lifecycle callback while the worker still
//! holds a stale window or input-queue handle.

mod channel;
mod controller;
mod message;
mod poller;
mod state;

pub use self::controller::BridgeController;
pub use self::poller::EventPoller;
pub use self::state::LifecycleState;

pub(crate) use self::channel::RendezvousChannel;
pub(crate) use self::message::BridgeMessage;
