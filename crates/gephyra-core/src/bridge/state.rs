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

/// The coarse state of the bridge's worker thread.
///
/// Exactly one instance exists per bridge, guarded by the rendezvous
/// channel's lock. `Dead` is both the initial and the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No worker thread exists (never started, or stopped and joined).
    Dead,
    /// The worker thread is running and polling for events.
    Alive,
    /// The worker thread is suspended on the resume condition.
    Paused,
    /// The worker has been told to exit and has not finished yet.
    Dying,
}

impl LifecycleState {
    /// Whether the rendezvous channel may accept a message in this state.
    ///
    /// Only `Dead` refuses outright; the pause-time policy for individual
    /// message kinds belongs to the controller, not the channel.
    pub fn accepts_messages(self) -> bool {
        self != LifecycleState::Dead
    }

    /// Whether a transition from `self` to `next` is part of the lifecycle.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Dead, Alive) | (Alive, Paused) | (Alive, Dying) | (Paused, Alive) | (Paused, Dying) | (Dying, Dead)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Dead => "dead",
            LifecycleState::Alive => "alive",
            LifecycleState::Paused => "paused",
            LifecycleState::Dying => "dying",
        };
        write!(f, "{name}")
    }
}
