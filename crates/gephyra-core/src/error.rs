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

//! Defines the error types of the lifecycle bridge.

use std::fmt;

/// An error reported by the rendezvous channel on the control-thread side.
///
/// Both variants are best-effort outcomes: the caller logs them and carries
/// on, since failing the host process over a display-layer hiccup would be
/// strictly worse than losing one lifecycle message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The worker side is dead; the message was refused without blocking.
    Disconnected,
    /// The worker exited while the message was still outstanding; the
    /// message is treated as dropped.
    Dropped,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Disconnected => {
                write!(f, "worker thread is dead, message refused")
            }
            ChannelError::Dropped => {
                write!(f, "worker thread exited before processing the message")
            }
        }
    }
}

impl std::error::Error for ChannelError {}

/// An error reported by [`BridgeController`](crate::BridgeController)
/// lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// `start` was called while a worker thread already exists (or its
    /// previous incarnation has not been stopped yet).
    AlreadyStarted,
    /// The operating system refused to spawn the worker thread.
    SpawnFailed(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::AlreadyStarted => {
                write!(f, "bridge worker thread is already running")
            }
            BridgeError::SpawnFailed(details) => {
                write!(f, "failed to spawn bridge worker thread: {details}")
            }
        }
    }
}

impl std::error::Error for BridgeError {}
