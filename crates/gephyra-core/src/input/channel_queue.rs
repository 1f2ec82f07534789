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

use std::sync::Mutex;

use super::{InputEvent, InputQueue};

/// A predicate deciding whether the platform claims an event for itself.
pub type ReservedFilter = Box<dyn Fn(&InputEvent) -> bool + Send + Sync>;

/// An [`InputQueue`] fed through a flume channel.
///
/// The producing side (a host simulation, a test, an FFI shim) pushes
/// events through the [`injector`](ChannelInputQueue::injector) sender; the
/// worker drains them through the trait. Finished events are recorded
/// together with the application's handled verdict so the producing side
/// can observe them.
pub struct ChannelInputQueue {
    sender: flume::Sender<InputEvent>,
    receiver: flume::Receiver<InputEvent>,
    reserved: Option<ReservedFilter>,
    finished: Mutex<Vec<(InputEvent, bool)>>,
}

impl ChannelInputQueue {
    /// Creates a queue with an unbounded backlog and no reserved events.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            sender,
            receiver,
            reserved: None,
            finished: Mutex::new(Vec::new()),
        }
    }

    /// Creates a queue whose `filter` marks the events the platform keeps
    /// to itself; those are never delivered to the application.
    pub fn with_reserved_filter(filter: ReservedFilter) -> Self {
        let mut queue = Self::new();
        queue.reserved = Some(filter);
        queue
    }

    /// Returns a sender for the producing side.
    pub fn injector(&self) -> flume::Sender<InputEvent> {
        self.sender.clone()
    }

    /// Takes the `(event, handled)` pairs finished since the last call.
    pub fn take_finished(&self) -> Vec<(InputEvent, bool)> {
        let mut finished = self.finished.lock().unwrap();
        std::mem::take(&mut *finished)
    }
}

impl Default for ChannelInputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue for ChannelInputQueue {
    fn next_event(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }

    fn pre_dispatch(&self, event: &InputEvent) -> bool {
        let claimed = self.reserved.as_ref().is_some_and(|filter| filter(event));
        if claimed {
            log::trace!("Input event claimed by the platform: {event:?}");
        }
        claimed
    }

    fn finish_event(&self, event: InputEvent, handled: bool) {
        log::trace!("Finished input event (handled={handled}): {event:?}");
        self.finished.lock().unwrap().push((event, handled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: u32) -> InputEvent {
        InputEvent::KeyPressed { key_code: code }
    }

    #[test]
    fn injected_events_come_back_in_order() {
        let queue = ChannelInputQueue::new();
        let injector = queue.injector();

        injector.send(key(1)).expect("send 1");
        injector.send(key(2)).expect("send 2");

        assert_eq!(queue.next_event(), Some(key(1)));
        assert_eq!(queue.next_event(), Some(key(2)));
        assert_eq!(queue.next_event(), None);
    }

    #[test]
    fn reserved_filter_claims_events() {
        let queue = ChannelInputQueue::with_reserved_filter(Box::new(|event| {
            matches!(event, InputEvent::KeyPressed { key_code: 42 })
        }));

        assert!(queue.pre_dispatch(&key(42)));
        assert!(!queue.pre_dispatch(&key(7)));
    }

    #[test]
    fn finished_events_record_the_verdict() {
        let queue = ChannelInputQueue::new();
        queue.finish_event(key(1), true);
        queue.finish_event(key(2), false);

        let finished = queue.take_finished();
        assert_eq!(finished, vec![(key(1), true), (key(2), false)]);
        assert!(queue.take_finished().is_empty(), "record should be drained");
    }
}
