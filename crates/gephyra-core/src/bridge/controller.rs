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
use std::thread::{self, JoinHandle};

use super::channel::RendezvousChannel;
use super::message::BridgeMessage;
use super::poller::EventPoller;
use super::state::LifecycleState;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::input::InputQueueHandle;
use crate::platform::window::WindowHandle;
use crate::utils::timer::Stopwatch;

/// The control-thread side of the bridge.
///
/// Owns the worker thread's creation and joining and exposes the lifecycle
/// entry points the host calls from its callback thread. Every entry point
/// is synchronous: it returns once the worker has applied the change, or
/// immediately as a logged no-op when the bridge's state makes the call
/// meaningless (e.g. any window call after the bridge died).
///
/// The host may call these from different threads over time, but never
/// concurrently; the OS callback dispatch serializes them.
pub struct BridgeController {
    config: BridgeConfig,
    channel: Arc<RendezvousChannel>,
    worker: Option<JoinHandle<()>>,
}

impl BridgeController {
    /// Creates an idle controller. No thread is spawned until
    /// [`start`](Self::start).
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            channel: Arc::new(RendezvousChannel::new()),
            worker: None,
        }
    }

    /// The bridge's current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.channel.lifecycle()
    }

    /// Spawns the worker thread and hands it the event poller.
    ///
    /// `app` is the application's long-lived loop body; it must drive the
    /// poller once per iteration or lifecycle calls will stall. The
    /// transition to alive happens inside the worker itself, and `start`
    /// returns once that has happened, so the bridge never reports alive
    /// before the loop is able to poll.
    pub fn start<F>(&mut self, app: F) -> Result<(), BridgeError>
    where
        F: FnOnce(EventPoller) + Send + 'static,
    {
        if self.worker.is_some() || self.state() != LifecycleState::Dead {
            return Err(BridgeError::AlreadyStarted);
        }

        // Fresh channel per run: nothing from a previous incarnation (slot
        // contents, window bookkeeping) may leak into this one.
        self.channel = Arc::new(RendezvousChannel::new());
        let channel = Arc::clone(&self.channel);

        let mut builder = thread::Builder::new().name(self.config.thread_name.clone());
        if let Some(bytes) = self.config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let handle = builder
            .spawn(move || {
                channel.mark_alive();
                log::info!("Worker thread running");

                let poller = EventPoller::new(Arc::clone(&channel), Stopwatch::new());
                app(poller);

                if channel.mark_dying_if_alive() {
                    log::debug!("Application loop returned without a stop request");
                }
                channel.finish_dead();
                log::info!("Worker thread finished");
            })
            .map_err(|err| BridgeError::SpawnFailed(err.to_string()))?;

        self.worker = Some(handle);
        self.channel.await_alive();
        Ok(())
    }

    /// Suspends the worker loop.
    ///
    /// Returns once the worker has stopped using the current window and
    /// entered its suspension point. A no-op (logged) when the bridge is
    /// already paused or dead.
    pub fn pause(&self) {
        match self.state() {
            LifecycleState::Paused => log::debug!("Pause requested but worker already paused"),
            LifecycleState::Dead => log::debug!("Pause requested on a dead bridge"),
            _ => {
                log::debug!("Pausing");
                self.send_or_log(BridgeMessage::Pause);
                log::debug!("Paused");
            }
        }
    }

    /// Wakes a paused worker.
    ///
    /// Signals the suspension point directly instead of going through the
    /// message slot: the worker is not polling while suspended. A no-op
    /// unless the bridge is paused.
    pub fn resume(&self) {
        if self.channel.signal_resume() {
            log::debug!("Resumed");
        } else {
            log::debug!("Resume requested but worker is not paused");
        }
    }

    /// Shuts the bridge down and joins the worker thread. Idempotent, and
    /// safe to call from a different thread than the one that started the
    /// bridge.
    ///
    /// A paused worker is force-resumed first so it can observe the close
    /// request; a join failure is logged, not returned, since there is no
    /// recovery for a stuck thread short of killing the process.
    pub fn stop(&mut self) {
        log::debug!("Stopping bridge");

        if self.channel.signal_resume() {
            log::debug!("Force-resumed paused worker for shutdown");
        }
        self.channel.mark_dying_if_alive();

        if let Some(handle) = self.worker.take() {
            if let Err(err) = self.channel.send(BridgeMessage::Close) {
                log::debug!("Close message not delivered: {err}");
            }
            log::debug!("Waiting for worker thread");
            if handle.join().is_err() {
                log::error!("Worker thread panicked; continuing teardown");
            } else {
                log::debug!("Worker thread joined");
            }
        } else {
            log::trace!("Stop requested on an idle bridge");
        }

        self.channel.finish_dead();
    }

    /// Announces a new window surface to the worker.
    ///
    /// Blocks until the application has observed the window. While paused,
    /// only the "current window" bookkeeping is updated; the application
    /// sees the window once it resumes.
    pub fn set_window(&self, window: WindowHandle) {
        match self.state() {
            LifecycleState::Dead => log::debug!("set_window ignored: bridge is dead"),
            LifecycleState::Paused => {
                self.channel.set_current_window(Some(window));
                log::debug!("set_window deferred until resume");
            }
            _ => self.send_or_log(BridgeMessage::SetWindow(window)),
        }
    }

    /// Announces that a window surface is going away.
    ///
    /// Blocks until the application has stopped using it, so the host may
    /// reclaim the surface as soon as this returns.
    pub fn reset_window(&self, window: WindowHandle) {
        match self.state() {
            LifecycleState::Dead => log::debug!("reset_window ignored: bridge is dead"),
            LifecycleState::Paused => {
                if self.channel.current_window() == Some(window) {
                    self.channel.set_current_window(None);
                }
                log::debug!("reset_window applied to bookkeeping only while paused");
            }
            _ => self.send_or_log(BridgeMessage::ResetWindow(window)),
        }
    }

    /// Rebinds the current window after its underlying surface was
    /// recreated: the application observes a destroy/create pair for the
    /// *same* handle, without a logical window change.
    pub fn refresh_window(&self) {
        match self.state() {
            LifecycleState::Dead => log::debug!("refresh_window ignored: bridge is dead"),
            LifecycleState::Paused => {
                log::debug!("refresh_window ignored while paused; resume replays the window")
            }
            _ => match self.channel.current_window() {
                None => log::warn!("refresh_window requested with no current window"),
                Some(window) => {
                    self.send_or_log(BridgeMessage::ResetWindow(window));
                    self.send_or_log(BridgeMessage::SetWindow(window));
                }
            },
        }
    }

    /// Attaches an input queue to the worker's poll cycle. Any previously
    /// attached queue is detached first.
    pub fn set_input_queue(&self, queue: InputQueueHandle) {
        match self.state() {
            LifecycleState::Dead => log::debug!("set_input_queue ignored: bridge is dead"),
            LifecycleState::Paused => {
                // The host re-attaches a fresh queue after resume; a queue
                // arriving mid-pause has nothing to deliver to.
                log::debug!("set_input_queue dropped while paused");
            }
            _ => self.send_or_log(BridgeMessage::SetInputQueue(queue)),
        }
    }

    /// Detaches an input queue from the worker's poll cycle. Detaching a
    /// queue that is not attached is a no-op on the worker side.
    pub fn reset_input_queue(&self, queue: InputQueueHandle) {
        match self.state() {
            LifecycleState::Dead => log::debug!("reset_input_queue ignored: bridge is dead"),
            LifecycleState::Paused => log::debug!("reset_input_queue dropped while paused"),
            _ => self.send_or_log(BridgeMessage::ResetInputQueue(queue)),
        }
    }

    fn send_or_log(&self, message: BridgeMessage) {
        if let Err(err) = self.channel.send(message) {
            log::warn!("Lifecycle message dropped: {err}");
        }
    }
}

impl Drop for BridgeController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BridgeEvent;
    use crate::input::{ChannelInputQueue, InputEvent};
    use raw_window_handle::{RawWindowHandle, WebWindowHandle};
    use std::cell::Cell;
    use std::time::{Duration, Instant};

    fn window(id: u32) -> WindowHandle {
        WindowHandle::from_raw(RawWindowHandle::Web(WebWindowHandle::new(id)))
    }

    /// Starts a standard recording application loop: every event goes out
    /// through the returned receiver, and the loop exits on CloseRequested.
    fn start_recording_app(controller: &mut BridgeController) -> flume::Receiver<BridgeEvent> {
        let (tx, rx) = flume::unbounded();
        controller
            .start(move |mut poller| {
                let close = Cell::new(false);
                let mut handler = |event: BridgeEvent| {
                    if matches!(event, BridgeEvent::CloseRequested) {
                        close.set(true);
                    }
                    let _ = tx.send(event);
                    true
                };
                while !close.get() {
                    if !poller.poll(&mut handler) {
                        thread::sleep(Duration::from_millis(1));
                    }
                }
            })
            .expect("start should succeed");
        rx
    }

    fn recv(rx: &flume::Receiver<BridgeEvent>) -> BridgeEvent {
        rx.recv_timeout(Duration::from_secs(1))
            .expect("expected an event within the timeout")
    }

    #[test]
    fn bridge_reports_dead_until_started() {
        let controller = BridgeController::new(BridgeConfig::default());
        assert_eq!(controller.state(), LifecycleState::Dead);
    }

    #[test]
    fn start_transitions_to_alive_and_rejects_double_start() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let _rx = start_recording_app(&mut controller);
        assert_eq!(controller.state(), LifecycleState::Alive);

        let second = controller.start(|_poller| {});
        assert_eq!(second, Err(BridgeError::AlreadyStarted));

        controller.stop();
        assert_eq!(controller.state(), LifecycleState::Dead);
    }

    #[test]
    fn window_calls_block_until_the_application_observed_them() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        controller.set_window(window(1));
        // set_window returned, so the event must already be recorded.
        assert_eq!(
            rx.try_recv().expect("event should already be delivered"),
            BridgeEvent::WindowCreated(window(1))
        );

        controller.reset_window(window(1));
        assert_eq!(
            rx.try_recv().expect("event should already be delivered"),
            BridgeEvent::WindowDestroyed(window(1))
        );

        controller.stop();
    }

    #[test]
    fn pause_and_resume_cycle_replays_the_window() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        controller.set_window(window(7));
        assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(7)));

        controller.pause();
        assert_eq!(controller.state(), LifecycleState::Paused);
        assert_eq!(recv(&rx), BridgeEvent::WindowDestroyed(window(7)));

        controller.resume();
        assert_eq!(controller.state(), LifecycleState::Alive);
        assert!(matches!(recv(&rx), BridgeEvent::Resumed { .. }));
        assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(7)));

        controller.stop();
    }

    #[test]
    fn pause_twice_is_a_no_op() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        controller.set_window(window(1));
        let _ = recv(&rx);
        controller.pause();
        let _ = recv(&rx); // WindowDestroyed

        controller.pause();
        assert_eq!(controller.state(), LifecycleState::Paused);
        assert!(
            rx.try_recv().is_err(),
            "second pause must not reach the worker"
        );

        controller.stop();
    }

    #[test]
    fn set_window_while_paused_is_replayed_on_resume() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        controller.pause();
        controller.set_window(window(3));
        assert!(
            rx.try_recv().is_err(),
            "no event may reach the worker while paused"
        );

        controller.resume();
        assert!(matches!(recv(&rx), BridgeEvent::Resumed { .. }));
        assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(3)));

        controller.stop();
    }

    #[test]
    fn stop_while_paused_does_not_deadlock() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        controller.set_window(window(1));
        let _ = recv(&rx);
        controller.pause();
        let _ = recv(&rx); // WindowDestroyed

        controller.stop();
        assert_eq!(controller.state(), LifecycleState::Dead);

        // The forced resume replays the window before the close arrives.
        let drained: Vec<_> = rx.drain().collect();
        assert!(
            drained.iter().any(|e| matches!(e, BridgeEvent::CloseRequested)),
            "worker should have observed the close request: {drained:?}"
        );
    }

    #[test]
    fn stop_twice_emits_a_single_close() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        controller.stop();
        controller.stop();
        assert_eq!(controller.state(), LifecycleState::Dead);

        let closes = rx
            .drain()
            .filter(|e| matches!(e, BridgeEvent::CloseRequested))
            .count();
        assert_eq!(closes, 1, "second stop must not produce a second close");
    }

    #[test]
    fn lifecycle_calls_on_a_dead_bridge_are_no_ops() {
        let controller = BridgeController::new(BridgeConfig::default());
        controller.set_window(window(1));
        controller.reset_window(window(1));
        controller.refresh_window();
        controller.set_input_queue(Arc::new(ChannelInputQueue::new()));
        controller.pause();
        controller.resume();
        assert_eq!(controller.state(), LifecycleState::Dead);
    }

    #[test]
    fn bridge_can_be_restarted_after_stop() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);
        controller.set_window(window(1));
        let _ = recv(&rx);
        controller.stop();

        let rx = start_recording_app(&mut controller);
        assert_eq!(controller.state(), LifecycleState::Alive);
        // The previous run's window must not leak into the new one.
        controller.refresh_window();
        assert!(rx.try_recv().is_err());

        controller.stop();
    }

    #[test]
    fn input_queue_swap_detaches_the_old_queue_first() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        let rx = start_recording_app(&mut controller);

        let first = Arc::new(ChannelInputQueue::new());
        let second = Arc::new(ChannelInputQueue::new());
        let first_injector = first.injector();
        let second_injector = second.injector();

        controller.set_input_queue(Arc::clone(&first) as InputQueueHandle);
        controller.set_input_queue(Arc::clone(&second) as InputQueueHandle);

        // Events from the replaced queue never reach the application.
        first_injector
            .send(InputEvent::KeyPressed { key_code: 1 })
            .expect("inject into stale queue");
        second_injector
            .send(InputEvent::KeyPressed { key_code: 2 })
            .expect("inject into live queue");

        assert_eq!(
            recv(&rx),
            BridgeEvent::Input(InputEvent::KeyPressed { key_code: 2 })
        );
        assert!(rx.try_recv().is_err(), "stale queue must stay silent");

        controller.stop();
    }

    #[test]
    fn worker_self_exit_leads_to_dead_state() {
        let mut controller = BridgeController::new(BridgeConfig::default());
        controller
            .start(|_poller| {
                // Application loop that quits immediately on its own.
            })
            .expect("start should succeed");

        // The worker winds down without any stop request.
        let deadline = Instant::now() + Duration::from_secs(1);
        while controller.state() != LifecycleState::Dead && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(controller.state(), LifecycleState::Dead);

        // A restart is refused until stop() has joined the old worker.
        assert_eq!(
            controller.start(|_poller| {}),
            Err(BridgeError::AlreadyStarted)
        );
        controller.stop();
        let rx = start_recording_app(&mut controller);
        assert_eq!(controller.state(), LifecycleState::Alive);
        drop(rx);
        controller.stop();
    }
}
