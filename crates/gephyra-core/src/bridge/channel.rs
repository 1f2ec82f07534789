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

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::message::BridgeMessage;
use super::state::LifecycleState;
use crate::error::ChannelError;
use crate::platform::window::WindowHandle;

/// Occupancy of the depth-1 message slot.
#[derive(Debug)]
enum Slot {
    Empty,
    Full(BridgeMessage),
    Processing,
}

impl Slot {
    fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Everything both threads share, under the channel's single lock.
struct Guarded {
    lifecycle: LifecycleState,
    slot: Slot,
    /// Latched once the worker has come alive; distinguishes "not yet
    /// polling" from "already finished" for `await_alive`.
    started: bool,
    /// The most recently set, not-yet-reset window handle. Written by the
    /// worker while applying window messages, and by the controller while
    /// the worker is paused (deferred bookkeeping replayed on resume).
    current_window: Option<WindowHandle>,
}

/// The shared core of the bridge: a depth-1 rendezvous message slot plus
/// the lifecycle state and window bookkeeping, all guarded by one mutex.
///
/// `send` does not return until the worker has *processed* the message (or
/// the worker died, in which case the message counts as dropped). Delivery
/// alone is not enough: the control thread must never outrun the worker's
/// application of a lifecycle change, or the host would reclaim window and
/// input-queue handles the worker still uses.
pub(crate) struct RendezvousChannel {
    guarded: Mutex<Guarded>,
    /// Signaled when the slot empties, the worker comes alive, or the
    /// worker dies; senders and `start` wait here.
    acked: Condvar,
    /// Signaled by `resume` (or a forced resume during stop); the paused
    /// worker waits here.
    resumed: Condvar,
}

impl RendezvousChannel {
    pub(crate) fn new() -> Self {
        Self {
            guarded: Mutex::new(Guarded {
                lifecycle: LifecycleState::Dead,
                slot: Slot::Empty,
                started: false,
                current_window: None,
            }),
            acked: Condvar::new(),
            resumed: Condvar::new(),
        }
    }

    // The channel must keep functioning for stop() even if a thread
    // panicked while holding the lock; the guarded data stays consistent
    // because no user callback ever runs under it.
    fn lock(&self) -> MutexGuard<'_, Guarded> {
        self.guarded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transfers a message to the worker and blocks until it has been
    /// fully processed. Control-thread side.
    ///
    /// Refuses immediately when the worker is dead. Returns
    /// [`ChannelError::Dropped`] when the worker exits while the message is
    /// still outstanding; the caller treats that as a dropped message, not
    /// a fatal condition.
    pub(crate) fn send(&self, message: BridgeMessage) -> Result<(), ChannelError> {
        let mut guarded = self.lock();
        if !guarded.lifecycle.accepts_messages() {
            return Err(ChannelError::Disconnected);
        }

        // Depth-1 slot: wait for any previous message to drain first.
        guarded = self
            .acked
            .wait_while(guarded, |g| {
                !g.slot.is_empty() && g.lifecycle.accepts_messages()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if !guarded.lifecycle.accepts_messages() {
            return Err(ChannelError::Disconnected);
        }

        log::trace!("Sending {message:?}");
        guarded.slot = Slot::Full(message);

        guarded = self
            .acked
            .wait_while(guarded, |g| {
                !g.slot.is_empty() && g.lifecycle.accepts_messages()
            })
            .unwrap_or_else(PoisonError::into_inner);

        if guarded.slot.is_empty() {
            Ok(())
        } else {
            // Worker died with our message still in the slot.
            guarded.slot = Slot::Empty;
            Err(ChannelError::Dropped)
        }
    }

    /// Non-blocking check for a pending message. Worker-thread side.
    pub(crate) fn try_receive(&self) -> Option<BridgeMessage> {
        let mut guarded = self.lock();
        match std::mem::replace(&mut guarded.slot, Slot::Empty) {
            Slot::Full(message) => {
                guarded.slot = Slot::Processing;
                Some(message)
            }
            other => {
                guarded.slot = other;
                None
            }
        }
    }

    /// Marks the in-flight message as fully processed and releases the
    /// blocked sender. Worker-thread side; exactly once per received
    /// message.
    pub(crate) fn acknowledge(&self) {
        let mut guarded = self.lock();
        debug_assert!(
            matches!(guarded.slot, Slot::Processing),
            "acknowledge without an in-flight message"
        );
        guarded.slot = Slot::Empty;
        drop(guarded);
        self.acked.notify_all();
    }

    pub(crate) fn lifecycle(&self) -> LifecycleState {
        self.lock().lifecycle
    }

    pub(crate) fn current_window(&self) -> Option<WindowHandle> {
        self.lock().current_window
    }

    pub(crate) fn set_current_window(&self, window: Option<WindowHandle>) {
        self.lock().current_window = window;
    }

    /// Worker start: the worker itself flips the bridge to alive, so the
    /// state can never claim alive before the loop is able to poll.
    pub(crate) fn mark_alive(&self) {
        let mut guarded = self.lock();
        self.transition(&mut guarded, LifecycleState::Alive);
        guarded.started = true;
        drop(guarded);
        self.acked.notify_all();
    }

    /// Blocks until the worker has come alive at least once. Returns
    /// immediately if the worker already finished its whole run.
    pub(crate) fn await_alive(&self) {
        let guarded = self.lock();
        let _guarded = self
            .acked
            .wait_while(guarded, |g| !g.started)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Marks the bridge as dying if it is currently alive. Returns whether
    /// the transition happened.
    pub(crate) fn mark_dying_if_alive(&self) -> bool {
        let mut guarded = self.lock();
        if guarded.lifecycle == LifecycleState::Alive {
            self.transition(&mut guarded, LifecycleState::Dying);
            true
        } else {
            false
        }
    }

    /// Final teardown: the bridge is dead, the slot and bookkeeping are
    /// cleared, and every waiter is released. Idempotent.
    pub(crate) fn finish_dead(&self) {
        let mut guarded = self.lock();
        if !guarded.slot.is_empty() {
            log::debug!("Dropping unprocessed {:?} during teardown", guarded.slot);
        }
        guarded.lifecycle = LifecycleState::Dead;
        guarded.current_window = None;
        drop(guarded);
        self.acked.notify_all();
        self.resumed.notify_all();
    }

    /// Worker-side entry into the paused state. Returns the current window
    /// so the poller can announce its destruction.
    pub(crate) fn enter_paused(&self) -> Option<WindowHandle> {
        let mut guarded = self.lock();
        self.transition(&mut guarded, LifecycleState::Paused);
        guarded.current_window
    }

    /// Worker-side suspension point: blocks until the bridge leaves the
    /// paused state. Returns the current window *at wake time*, since the
    /// controller may have updated the bookkeeping while the worker slept.
    pub(crate) fn await_resume(&self) -> Option<WindowHandle> {
        let guarded = self.lock();
        let guarded = self
            .resumed
            .wait_while(guarded, |g| g.lifecycle == LifecycleState::Paused)
            .unwrap_or_else(PoisonError::into_inner);
        guarded.current_window
    }

    /// Control-side resume: wakes the paused worker directly, bypassing the
    /// message slot (the worker is not polling while suspended). Returns
    /// whether the bridge was actually paused.
    pub(crate) fn signal_resume(&self) -> bool {
        let mut guarded = self.lock();
        if guarded.lifecycle != LifecycleState::Paused {
            return false;
        }
        self.transition(&mut guarded, LifecycleState::Alive);
        drop(guarded);
        self.resumed.notify_all();
        true
    }

    fn transition(&self, guarded: &mut Guarded, next: LifecycleState) {
        if !guarded.lifecycle.can_transition_to(next) {
            log::warn!("Lifecycle transition {} -> {next} is out of order", guarded.lifecycle);
        }
        log::trace!("Lifecycle {} -> {next}", guarded.lifecycle);
        guarded.lifecycle = next;
    }
}
