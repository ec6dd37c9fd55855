//! Console input: a dedicated thread per logical port owns the midir
//! connection. The midir callback parses Control Changes and hands them to
//! a bounded channel; everything else the console sends is dropped here.

use crate::device::{find_device, list_input_devices};
use crate::status::ConnectionStatus;
use crate::{Error, Result};
use cinemix_core::{ControlChange, InboundCc, LogicalPort};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use midir::{MidiInput, MidiInputConnection};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

enum InputCommand {
    Connect(usize, Sender<InboundCc>, Sender<Result<String>>),
    Disconnect,
    Shutdown,
}

pub struct ConsoleInput {
    port: LogicalPort,
    command_sender: Sender<InputCommand>,
    status: ConnectionStatus,
}

impl ConsoleInput {
    pub fn new(port: LogicalPort) -> Result<Self> {
        let (command_sender, command_receiver) = bounded(16);
        let status = ConnectionStatus::new();

        let thread_status = status.clone();
        thread::Builder::new()
            .name(format!("console-input-{}", port.number()))
            .spawn(move || Self::input_thread(port, command_receiver, thread_status))?;

        Ok(Self {
            port,
            command_sender,
            status,
        })
    }

    fn input_thread(
        port: LogicalPort,
        command_receiver: Receiver<InputCommand>,
        status: ConnectionStatus,
    ) {
        let mut connection: Option<MidiInputConnection<()>> = None;

        loop {
            match command_receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(InputCommand::Connect(device_index, sink, reply)) => {
                    if let Some(conn) = connection.take() {
                        conn.close();
                        status.set_disconnected();
                    }

                    let result = match Self::connect_to_device(port, device_index, sink) {
                        Ok((conn, name)) => {
                            debug!(%port, device = %name, "Input connected");
                            connection = Some(conn);
                            status.set_connected(name.clone());
                            Ok(name)
                        }
                        Err(e) => {
                            warn!(%port, error = %e, "Input connection failed");
                            Err(e)
                        }
                    };
                    let _ = reply.send(result);
                }
                Ok(InputCommand::Disconnect) => {
                    if let Some(conn) = connection.take() {
                        conn.close();
                        debug!(%port, "Input disconnected");
                        status.set_disconnected();
                    }
                }
                Ok(InputCommand::Shutdown) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Some(conn) = connection.take() {
            conn.close();
            status.set_disconnected();
        }
    }

    fn connect_to_device(
        port: LogicalPort,
        device_index: usize,
        sink: Sender<InboundCc>,
    ) -> Result<(MidiInputConnection<()>, String)> {
        let midi_input = MidiInput::new(&format!("cinemix-input-{}", port.number()))?;

        let ports = midi_input.ports();
        let device = ports.get(device_index).ok_or_else(|| {
            Error::MidiDevice(format!("MIDI input device {} not found", device_index))
        })?;

        let name = midi_input
            .port_name(device)
            .unwrap_or_else(|_| format!("Device {}", device_index));

        let connection = midi_input.connect(
            device,
            "cinemix-input",
            move |_timestamp, bytes, _| forward(port, bytes, &sink),
            (),
        )?;

        Ok((connection, name))
    }

    pub fn port(&self) -> LogicalPort {
        self.port
    }

    /// Connect and wait for the device thread to report back. Parsed CCs
    /// from the device go to `sink`.
    pub fn connect(&self, device_index: usize, sink: Sender<InboundCc>) -> Result<String> {
        let (reply_tx, reply_rx) = bounded(1);
        self.command_sender
            .send(InputCommand::Connect(device_index, sink, reply_tx))
            .map_err(|_| Error::MidiDevice("MIDI input thread not running".to_string()))?;
        reply_rx
            .recv()
            .map_err(|_| Error::MidiDevice("MIDI input thread exited".to_string()))?
    }

    pub fn connect_by_name(&self, pattern: &str, sink: Sender<InboundCc>) -> Result<String> {
        let devices = list_input_devices();
        let device = find_device(&devices, pattern).ok_or_else(|| {
            Error::MidiDevice(format!("No MIDI input device found matching '{}'", pattern))
        })?;
        self.connect(device.index, sink)
    }

    pub fn disconnect(&self) {
        let _ = self.command_sender.send(InputCommand::Disconnect);
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    pub fn connected_device_name(&self) -> Option<String> {
        self.status.device_name()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }
}

impl Drop for ConsoleInput {
    fn drop(&mut self) {
        let _ = self.command_sender.send(InputCommand::Shutdown);
    }
}

/// Callback body: parse, tag with the port, hand off without blocking.
pub(crate) fn forward(port: LogicalPort, bytes: &[u8], sink: &Sender<InboundCc>) {
    let Some(cc) = ControlChange::from_bytes(bytes) else {
        trace!(%port, ?bytes, "Ignoring non-CC message");
        return;
    };
    match sink.try_send(InboundCc { port, cc }) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => debug!(%port, "Inbound channel full, dropping CC"),
        Err(TrySendError::Disconnected(_)) => trace!(%port, "Inbound channel closed"),
    }
}
