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

// Gephyra Sandbox
// Simulates a host platform driving the lifecycle bridge: window creation,
// input, a pause/resume cycle, a surface refresh, and shutdown, while a
// worker thread runs a small render loop on the other side.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use gephyra_core::platform::host::{AssetSource, DirAssetSource, SoftKeyboard};
use gephyra_core::{
    BridgeConfig, BridgeController, BridgeEvent, ChannelInputQueue, EventPoller, InputEvent,
    InputQueueHandle, WindowHandle,
};
use raw_window_handle::{RawWindowHandle, WebWindowHandle};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    title: String,
    frame_rate: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Gephyra Sandbox".to_string(),
            frame_rate: 30,
        }
    }
}

fn load_config() -> DemoConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("sandbox.json");
    match fs::read_to_string(&path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
            log::warn!("Invalid sandbox.json ({err}); using defaults");
            DemoConfig::default()
        }),
        Err(err) => {
            log::debug!("No sandbox.json ({err}); using defaults");
            DemoConfig::default()
        }
    }
}

/// Stand-in for the host's on-screen keyboard toggle.
struct LogKeyboard;

impl SoftKeyboard for LogKeyboard {
    fn set_visible(&self, visible: bool) {
        log::info!(
            "Soft keyboard {}",
            if visible { "shown" } else { "hidden" }
        );
    }
}

/// The application's long-lived loop, running on the worker thread.
fn render_loop(mut poller: EventPoller, keyboard: Arc<LogKeyboard>, frame_time: Duration) {
    let close = Cell::new(false);
    let surface = Cell::new(Option::<WindowHandle>::None);

    let mut handler = |event: BridgeEvent| {
        match event {
            BridgeEvent::WindowCreated(window) => {
                log::info!("Surface ready: {window:?}");
                surface.set(Some(window));
            }
            BridgeEvent::WindowDestroyed(window) => {
                log::info!("Surface gone: {window:?}");
                surface.set(None);
            }
            BridgeEvent::Resumed { time_secs } => {
                log::info!("Resumed at t={time_secs:.3}s");
            }
            BridgeEvent::Input(input) => match input {
                InputEvent::TouchBegan { pointer, x, y } => {
                    log::info!("Touch {pointer} down at ({x:.0}, {y:.0})");
                    keyboard.set_visible(true);
                }
                InputEvent::TouchEnded { pointer, .. } => {
                    log::info!("Touch {pointer} up");
                    keyboard.set_visible(false);
                }
                other => log::debug!("Input: {other:?}"),
            },
            BridgeEvent::CloseRequested => {
                log::info!("Close requested");
                close.set(true);
            }
        }
        true
    };

    let mut frame: u64 = 0;
    while !close.get() {
        // Drain everything the host queued, then draw one frame.
        while poller.poll(&mut handler) {}

        if surface.get().is_some() {
            frame += 1;
            if frame % 30 == 0 {
                log::debug!("Rendered frame {frame}");
            }
            thread::sleep(frame_time);
        } else {
            thread::sleep(Duration::from_millis(5));
        }
    }
    log::info!("Render loop exiting after {frame} frames");
}

fn inject(injector: &flume::Sender<InputEvent>, event: InputEvent) -> Result<()> {
    injector
        .send(event)
        .map_err(|_| anyhow!("input queue closed"))
}

fn main() -> Result<()> {
    env_logger::init();
    let config = load_config();
    log::info!("{} starting", config.title);

    let assets = DirAssetSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
    if let Some(greeting) = assets.load("greeting.txt") {
        log::info!("Asset says: {}", String::from_utf8_lossy(&greeting).trim());
    }

    let keyboard = Arc::new(LogKeyboard);
    let frame_time = Duration::from_secs(1) / config.frame_rate.max(1);

    let mut controller = BridgeController::new(BridgeConfig {
        thread_name: "sandbox-render".to_string(),
        stack_size: None,
    });
    let worker_keyboard = Arc::clone(&keyboard);
    controller.start(move |poller| render_loop(poller, worker_keyboard, frame_time))?;

    // From here on, this thread plays the host: each call returns only once
    // the render loop has applied it.
    let window = WindowHandle::from_raw(RawWindowHandle::Web(WebWindowHandle::new(1)));
    controller.set_window(window);

    let queue = Arc::new(ChannelInputQueue::new());
    let injector = queue.injector();
    controller.set_input_queue(Arc::clone(&queue) as InputQueueHandle);

    // A short tap.
    inject(&injector, InputEvent::TouchBegan { pointer: 0, x: 120.0, y: 80.0 })?;
    inject(&injector, InputEvent::TouchEnded { pointer: 0, x: 120.0, y: 80.0 })?;
    thread::sleep(Duration::from_millis(300));

    // The host goes to the background and comes back.
    controller.pause();
    thread::sleep(Duration::from_millis(200));
    controller.resume();
    thread::sleep(Duration::from_millis(300));

    // The surface was recreated in place.
    controller.refresh_window();
    thread::sleep(Duration::from_millis(200));

    // Orderly teardown, in the host's usual callback order.
    controller.reset_input_queue(Arc::clone(&queue) as InputQueueHandle);
    controller.reset_window(window);
    controller.stop();

    log::info!("{} finished", config.title);
    Ok(())
}
