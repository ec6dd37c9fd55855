//! Test helpers for cinemix integration tests.
//!
//! Every bridge here runs against a `CaptureSink`, so no MIDI hardware is
//! needed and the exact wire traffic can be asserted.

#![allow(dead_code)]

use cinemix::core::{CaptureSink, ConsoleSink, ControlChange, LogicalPort};
use cinemix::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One 14-bit step.
pub const FADER_EPSILON: f32 = 1.0 / 16383.0;

/// One 7-bit step, the resolution of a coarse fader decode.
pub const COARSE_EPSILON: f32 = 1.0 / 127.0;

pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Bridge wired to a recording sink, plus the sink to inspect.
pub fn test_bridge() -> (ConsoleBridge, CaptureSink) {
    test_bridge_with(ConsoleBridge::builder())
}

pub fn test_bridge_with(builder: ConsoleBridgeBuilder) -> (ConsoleBridge, CaptureSink) {
    let capture = CaptureSink::new();
    let bridge = builder
        .sink(capture.clone())
        .build()
        .expect("Failed to create test bridge");
    (bridge, capture)
}

/// Active bridge with the activation traffic already drained.
pub fn active_bridge() -> (ConsoleBridge, CaptureSink) {
    let (bridge, capture) = test_bridge();
    bridge.activate();
    capture.take();
    (bridge, capture)
}

pub fn cc(port: LogicalPort, channel: u8, controller: u8, value: u8) -> (LogicalPort, ControlChange) {
    (port, ControlChange::new(channel, controller, value))
}

/// Recording sink whose sends block until [`GatedSink::open`] is called.
/// Lets a test hold the engine lock mid-send while other threads queue up.
#[derive(Clone)]
pub struct GatedSink {
    capture: CaptureSink,
    open: Arc<AtomicBool>,
}

impl GatedSink {
    pub fn new() -> Self {
        Self {
            capture: CaptureSink::new(),
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    pub fn capture(&self) -> &CaptureSink {
        &self.capture
    }

    fn wait(&self) {
        while !self.open.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

impl ConsoleSink for GatedSink {
    fn send_cc(&mut self, port: LogicalPort, cc: ControlChange) -> cinemix::core::Result<()> {
        self.wait();
        self.capture.send_cc(port, cc)
    }

    fn send_raw(&mut self, port: LogicalPort, byte: u8) -> cinemix::core::Result<()> {
        self.wait();
        self.capture.send_raw(port, byte)
    }
}
