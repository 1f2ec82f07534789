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

use gephyra_core::{
    BridgeConfig, BridgeController, BridgeEvent, ChannelInputQueue, InputEvent, InputQueueHandle,
    LifecycleState, WindowHandle,
};
use raw_window_handle::{RawWindowHandle, WebWindowHandle};
use std::cell::Cell;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn window(id: u32) -> WindowHandle {
    WindowHandle::from_raw(RawWindowHandle::Web(WebWindowHandle::new(id)))
}

/// Starts an application loop that records every event and exits when the
/// host requests a close.
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
fn full_host_lifecycle_scenario() {
    // --- 1. ARRANGE ---
    let mut controller = BridgeController::new(BridgeConfig::default());
    let rx = start_recording_app(&mut controller);
    assert_eq!(controller.state(), LifecycleState::Alive);

    // --- 2. ACT & ASSERT, following the host's callback sequence ---
    controller.set_window(window(1));
    assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(1)));

    controller.pause();
    assert_eq!(controller.state(), LifecycleState::Paused);
    assert_eq!(recv(&rx), BridgeEvent::WindowDestroyed(window(1)));

    controller.resume();
    assert_eq!(controller.state(), LifecycleState::Alive);
    let resumed = recv(&rx);
    assert!(
        matches!(resumed, BridgeEvent::Resumed { time_secs } if time_secs >= 0.0),
        "expected a resume timestamp, got {resumed:?}"
    );
    assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(1)));

    controller.stop();
    assert_eq!(controller.state(), LifecycleState::Dead);

    // --- 3. ASSERT the shutdown tail ---
    let remaining: Vec<_> = rx.drain().collect();
    assert_eq!(
        remaining,
        vec![BridgeEvent::CloseRequested],
        "the worker must observe exactly one close request"
    );
}

#[test]
fn resume_timestamps_are_monotonic_across_pause_cycles() {
    let mut controller = BridgeController::new(BridgeConfig::default());
    let rx = start_recording_app(&mut controller);

    let mut resume_times = Vec::new();
    for _ in 0..2 {
        controller.pause();
        thread::sleep(Duration::from_millis(20));
        controller.resume();
        match recv(&rx) {
            BridgeEvent::Resumed { time_secs } => resume_times.push(time_secs),
            other => panic!("expected a resume event, got {other:?}"),
        }
    }

    assert!(resume_times[0] >= 0.0);
    assert!(
        resume_times[1] >= resume_times[0],
        "resume timestamps must be non-decreasing: {resume_times:?}"
    );

    controller.stop();
}

#[test]
fn refresh_window_is_a_destroy_create_pair_for_the_same_handle() {
    let mut controller = BridgeController::new(BridgeConfig::default());
    let rx = start_recording_app(&mut controller);

    let queue = Arc::new(ChannelInputQueue::new());
    let injector = queue.injector();
    controller.set_input_queue(Arc::clone(&queue) as InputQueueHandle);
    controller.set_window(window(4));
    assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(4)));

    // Input injected after the refresh must stay behind the destroy/create
    // pair: lifecycle messages win each poll.
    controller.refresh_window();
    injector
        .send(InputEvent::TouchBegan {
            pointer: 0,
            x: 10.0,
            y: 20.0,
        })
        .expect("inject");

    assert_eq!(recv(&rx), BridgeEvent::WindowDestroyed(window(4)));
    assert_eq!(recv(&rx), BridgeEvent::WindowCreated(window(4)));
    assert_eq!(
        recv(&rx),
        BridgeEvent::Input(InputEvent::TouchBegan {
            pointer: 0,
            x: 10.0,
            y: 20.0,
        })
    );

    controller.stop();
}

#[test]
fn stop_from_a_foreign_thread_while_paused_completes() {
    let mut controller = BridgeController::new(BridgeConfig::default());
    let rx = start_recording_app(&mut controller);

    controller.set_window(window(2));
    let _ = recv(&rx);
    controller.pause();
    let _ = recv(&rx); // WindowDestroyed

    // The host may tear the bridge down from a different thread than the
    // one that started it.
    let stopper = thread::spawn(move || {
        controller.stop();
        controller
    });
    let controller = stopper.join().expect("stop thread join failed");
    assert_eq!(controller.state(), LifecycleState::Dead);

    let drained: Vec<_> = rx.drain().collect();
    assert!(
        drained
            .iter()
            .any(|e| matches!(e, BridgeEvent::CloseRequested)),
        "worker should have observed the close request: {drained:?}"
    );
}
