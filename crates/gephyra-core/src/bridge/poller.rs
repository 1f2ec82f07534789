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

use std::sync::Arc;

use super::channel::RendezvousChannel;
use super::message::BridgeMessage;
use crate::event::{BridgeEvent, EventHandler};
use crate::input::InputQueueHandle;
use crate::utils::timer::Stopwatch;

/// The worker-side event pump.
///
/// The application loop calls [`poll`](EventPoller::poll) once per
/// iteration. Each call performs one non-blocking check of the lifecycle
/// channel and, failing that, a full drain of the attached input queue.
/// The single exception to "non-blocking" is the pause message, which
/// suspends the calling thread on the resume condition until the host
/// resumes (or stops) the bridge.
pub struct EventPoller {
    channel: Arc<RendezvousChannel>,
    watch: Stopwatch,
    input_queue: Option<InputQueueHandle>,
}

impl EventPoller {
    pub(crate) fn new(channel: Arc<RendezvousChannel>, watch: Stopwatch) -> Self {
        Self {
            channel,
            watch,
            input_queue: None,
        }
    }

    /// Services at most one ready event source, delivering every resulting
    /// event to `handler`. Returns whether anything was serviced, so the
    /// caller can decide between looping immediately and idling.
    ///
    /// Lifecycle messages win over input; when the input queue is the ready
    /// source, *all* currently pending input events are drained, in order.
    pub fn poll<H: EventHandler>(&mut self, handler: &mut H) -> bool {
        if let Some(message) = self.channel.try_receive() {
            self.process_message(message, handler);
            return true;
        }
        self.drain_input(handler)
    }

    /// Applies one lifecycle message, delivers the translated events, and
    /// acknowledges the message exactly once.
    fn process_message<H: EventHandler>(&mut self, message: BridgeMessage, handler: &mut H) {
        log::trace!("Processing {message:?}");
        match message {
            BridgeMessage::Pause => {
                // The pause path acknowledges mid-sequence; see below.
                self.suspend_until_resumed(handler);
                return;
            }
            BridgeMessage::SetWindow(window) => {
                self.channel.set_current_window(Some(window));
                handler.handle(BridgeEvent::WindowCreated(window));
            }
            BridgeMessage::ResetWindow(window) => {
                if self.channel.current_window() == Some(window) {
                    self.channel.set_current_window(None);
                }
                handler.handle(BridgeEvent::WindowDestroyed(window));
            }
            BridgeMessage::SetInputQueue(queue) => {
                if self.input_queue.take().is_some() {
                    log::debug!("Detaching previously attached input queue");
                }
                self.input_queue = Some(queue);
                log::debug!("Input queue attached");
            }
            BridgeMessage::ResetInputQueue(queue) => match &self.input_queue {
                Some(attached) if Arc::ptr_eq(attached, &queue) => {
                    self.input_queue = None;
                    log::debug!("Input queue detached");
                }
                _ => log::debug!("Ignoring detach of a queue that is not attached"),
            },
            BridgeMessage::Close => {
                log::info!("Close requested by the host");
                handler.handle(BridgeEvent::CloseRequested);
            }
        }
        self.channel.acknowledge();
    }

    /// The one deliberate suspension point of the bridge.
    ///
    /// Order matters: the window-destroyed event is delivered *before* the
    /// acknowledge, so the host's pause call does not return while the
    /// application still draws to the window; the acknowledge happens
    /// *before* the wait, because the resume that would end the wait can
    /// only be issued once the host's pause call has returned.
    fn suspend_until_resumed<H: EventHandler>(&mut self, handler: &mut H) {
        if let Some(window) = self.channel.enter_paused() {
            handler.handle(BridgeEvent::WindowDestroyed(window));
        }
        self.channel.acknowledge();
        log::debug!("Worker suspended");

        let window = self.channel.await_resume();
        let time_secs = self.watch.elapsed_secs_f64();
        log::debug!("Worker resumed at t={time_secs:.3}s");
        handler.handle(BridgeEvent::Resumed { time_secs });
        if let Some(window) = window {
            handler.handle(BridgeEvent::WindowCreated(window));
        }
    }

    /// Drains every pending event from the attached input queue.
    fn drain_input<H: EventHandler>(&mut self, handler: &mut H) -> bool {
        let Some(queue) = &self.input_queue else {
            return false;
        };

        let mut serviced = false;
        while let Some(event) = queue.next_event() {
            serviced = true;
            if queue.pre_dispatch(&event) {
                continue;
            }
            let handled = handler.handle(BridgeEvent::Input(event.clone()));
            queue.finish_event(event, handled);
        }
        serviced
    }
}

impl Drop for EventPoller {
    fn drop(&mut self) {
        if self.input_queue.take().is_some() {
            log::debug!("Detaching input queue on worker exit");
        }
    }
}
