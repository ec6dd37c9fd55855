//! Outbound transport seam.
//!
//! The engine never touches hardware; it asks a [`ConsoleSink`] to put a CC
//! or a raw byte on a logical port. Hardware sinks live in `cinemix-midi-io`.

use crate::message::{ConsoleMessage, ControlChange};
use crate::table::LogicalPort;
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;

pub trait ConsoleSink: Send {
    /// Fire-and-forget. A closed port reports
    /// [`Error::TransportUnavailable`]; the message is not queued.
    fn send_cc(&mut self, port: LogicalPort, cc: ControlChange) -> Result<()>;

    fn send_raw(&mut self, port: LogicalPort, byte: u8) -> Result<()>;
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Box<S> {
    fn send_cc(&mut self, port: LogicalPort, cc: ControlChange) -> Result<()> {
        (**self).send_cc(port, cc)
    }

    fn send_raw(&mut self, port: LogicalPort, byte: u8) -> Result<()> {
        (**self).send_raw(port, byte)
    }
}

/// Sink with no ports open. Every send fails with `TransportUnavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedSink;

impl ConsoleSink for DisconnectedSink {
    fn send_cc(&mut self, port: LogicalPort, _cc: ControlChange) -> Result<()> {
        Err(Error::TransportUnavailable(port))
    }

    fn send_raw(&mut self, port: LogicalPort, _byte: u8) -> Result<()> {
        Err(Error::TransportUnavailable(port))
    }
}

/// In-memory sink that records everything it is asked to send.
///
/// Clones share the same log, so a test can hand one clone to the engine
/// and inspect traffic through another.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    inner: Arc<Mutex<CaptureState>>,
}

#[derive(Debug, Default)]
struct CaptureState {
    sent: Vec<(LogicalPort, ConsoleMessage)>,
    closed: [bool; 2],
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a port that is not open.
    pub fn set_port_open(&self, port: LogicalPort, open: bool) {
        self.inner.lock().closed[port.slot()] = !open;
    }

    pub fn sent(&self) -> Vec<(LogicalPort, ConsoleMessage)> {
        self.inner.lock().sent.clone()
    }

    /// Recorded Control Changes, in send order.
    pub fn sent_ccs(&self) -> Vec<(LogicalPort, ControlChange)> {
        self.inner
            .lock()
            .sent
            .iter()
            .filter_map(|(port, msg)| msg.as_cc().map(|cc| (*port, cc)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&self) -> Vec<(LogicalPort, ConsoleMessage)> {
        std::mem::take(&mut self.inner.lock().sent)
    }

    fn record(&self, port: LogicalPort, message: ConsoleMessage) -> Result<()> {
        let mut state = self.inner.lock();
        if state.closed[port.slot()] {
            return Err(Error::TransportUnavailable(port));
        }
        state.sent.push((port, message));
        Ok(())
    }
}

impl ConsoleSink for CaptureSink {
    fn send_cc(&mut self, port: LogicalPort, cc: ControlChange) -> Result<()> {
        self.record(port, cc.into())
    }

    fn send_raw(&mut self, port: LogicalPort, byte: u8) -> Result<()> {
        self.record(port, ConsoleMessage::Raw(byte))
    }
}
