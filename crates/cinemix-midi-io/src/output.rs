//! Console output: one dedicated thread per logical port owns the midir
//! connection and drains a command channel.

use crate::device::{find_device, list_output_devices};
use crate::status::ConnectionStatus;
use crate::{Error, Result};
use cinemix_core::{ControlChange, LogicalPort};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use midir::{MidiOutput, MidiOutputConnection};
use smallvec::{smallvec, SmallVec};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Room for two full snapshots plus the activation block.
const COMMAND_CAPACITY: usize = 1024;

type MidiBytes = SmallVec<[u8; 3]>;

enum OutputCommand {
    Connect(usize, Sender<Result<String>>),
    Disconnect,
    Send(MidiBytes),
    Shutdown,
}

pub struct ConsoleOutput {
    port: LogicalPort,
    command_sender: Sender<OutputCommand>,
    status: ConnectionStatus,
}

impl ConsoleOutput {
    pub fn new(port: LogicalPort) -> Result<Self> {
        let (command_sender, command_receiver) = bounded(COMMAND_CAPACITY);
        let status = ConnectionStatus::new();

        let thread_status = status.clone();
        thread::Builder::new()
            .name(format!("console-output-{}", port.number()))
            .spawn(move || Self::output_thread(port, command_receiver, thread_status))?;

        Ok(Self {
            port,
            command_sender,
            status,
        })
    }

    fn output_thread(
        port: LogicalPort,
        command_receiver: Receiver<OutputCommand>,
        status: ConnectionStatus,
    ) {
        let mut connection: Option<MidiOutputConnection> = None;

        loop {
            match command_receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(OutputCommand::Connect(device_index, reply)) => {
                    if connection.take().is_some() {
                        status.set_disconnected();
                    }

                    let result = match Self::connect_to_device(port, device_index) {
                        Ok((conn, name)) => {
                            debug!(%port, device = %name, "Output connected");
                            connection = Some(conn);
                            status.set_connected(name.clone());
                            Ok(name)
                        }
                        Err(e) => {
                            warn!(%port, error = %e, "Output connection failed");
                            Err(e)
                        }
                    };
                    let _ = reply.send(result);
                }
                Ok(OutputCommand::Disconnect) => {
                    if connection.take().is_some() {
                        debug!(%port, "Output disconnected");
                        status.set_disconnected();
                    }
                }
                Ok(OutputCommand::Send(bytes)) => match connection.as_mut() {
                    Some(conn) => {
                        if let Err(e) = conn.send(&bytes) {
                            warn!(%port, error = %e, "MIDI send failed");
                        }
                    }
                    None => debug!(%port, "Cannot send MIDI message: no device connected"),
                },
                Ok(OutputCommand::Shutdown) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            }
        }

        if connection.take().is_some() {
            status.set_disconnected();
        }
    }

    fn connect_to_device(
        port: LogicalPort,
        device_index: usize,
    ) -> Result<(MidiOutputConnection, String)> {
        let midi_output = MidiOutput::new(&format!("cinemix-output-{}", port.number()))?;

        let ports = midi_output.ports();
        let device = ports.get(device_index).ok_or_else(|| {
            Error::MidiDevice(format!("MIDI output device {} not found", device_index))
        })?;

        let name = midi_output
            .port_name(device)
            .unwrap_or_else(|_| format!("Device {}", device_index));

        let connection = midi_output.connect(device, "cinemix-output")?;
        Ok((connection, name))
    }

    pub fn port(&self) -> LogicalPort {
        self.port
    }

    /// Connect and wait for the device thread to report back.
    pub fn connect(&self, device_index: usize) -> Result<String> {
        let (reply_tx, reply_rx) = bounded(1);
        self.command_sender
            .send(OutputCommand::Connect(device_index, reply_tx))
            .map_err(|_| Error::MidiDevice("MIDI output thread not running".to_string()))?;
        reply_rx
            .recv()
            .map_err(|_| Error::MidiDevice("MIDI output thread exited".to_string()))?
    }

    pub fn connect_by_name(&self, pattern: &str) -> Result<String> {
        let devices = list_output_devices();
        let device = find_device(&devices, pattern).ok_or_else(|| {
            Error::MidiDevice(format!("No MIDI output device found matching '{}'", pattern))
        })?;
        self.connect(device.index)
    }

    pub fn disconnect(&self) {
        let _ = self.command_sender.send(OutputCommand::Disconnect);
    }

    /// Queue bytes for the device thread. Fails without queueing when no
    /// device is connected or the queue is full.
    pub fn send_bytes(&self, bytes: MidiBytes) -> Result<()> {
        if !self.status.is_connected() {
            return Err(Error::NotConnected(self.port));
        }
        match self.command_sender.try_send(OutputCommand::Send(bytes)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                debug!(port = %self.port, "MIDI output command channel full");
                Err(Error::MidiPort(format!("output queue full on {}", self.port)))
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::MidiDevice(
                "MIDI output thread not running".to_string(),
            )),
        }
    }

    pub fn send_cc(&self, cc: ControlChange) -> Result<()> {
        trace!(port = %self.port, ?cc, "Queue CC");
        self.send_bytes(SmallVec::from_slice(&cc.to_bytes()))
    }

    pub fn send_raw(&self, byte: u8) -> Result<()> {
        self.send_bytes(smallvec![byte])
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

impl Drop for ConsoleOutput {
    fn drop(&mut self) {
        let _ = self.command_sender.send(OutputCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_device_is_rejected() {
        let output = ConsoleOutput::new(LogicalPort::High).unwrap();
        assert!(!output.is_connected());
        assert!(matches!(
            output.send_cc(ControlChange::new(5, 127, 127)),
            Err(Error::NotConnected(LogicalPort::High))
        ));
        assert!(matches!(
            output.send_raw(0xFF),
            Err(Error::NotConnected(LogicalPort::High))
        ));
    }

    #[test]
    fn test_connect_to_missing_device_index() {
        let output = ConsoleOutput::new(LogicalPort::Low).unwrap();
        assert!(output.connect(usize::MAX).is_err());
        assert!(!output.is_connected());
        assert_eq!(output.connected_device_name(), None);
    }
}
