//! The console's two MIDI in/out pairs, bound to logical ports.

use crate::input::ConsoleInput;
use crate::output::ConsoleOutput;
use crate::status::ConnectionStatus;
use crate::Result;
use cinemix_core::{ConsoleSink, ControlChange, InboundCc, LogicalPort};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which devices to open, by case-insensitive name substring. `None` leaves
/// that direction of the port closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortAssignment {
    pub input_1: Option<String>,
    pub input_2: Option<String>,
    pub output_1: Option<String>,
    pub output_2: Option<String>,
}

impl PortAssignment {
    /// Same device pattern for both directions of each port.
    pub fn pairs(port_1: impl Into<String>, port_2: impl Into<String>) -> Self {
        let (port_1, port_2) = (port_1.into(), port_2.into());
        Self {
            input_1: Some(port_1.clone()),
            input_2: Some(port_2.clone()),
            output_1: Some(port_1),
            output_2: Some(port_2),
        }
    }

    pub fn input(&self, port: LogicalPort) -> Option<&str> {
        match port {
            LogicalPort::Low => self.input_1.as_deref(),
            LogicalPort::High => self.input_2.as_deref(),
        }
    }

    pub fn output(&self, port: LogicalPort) -> Option<&str> {
        match port {
            LogicalPort::Low => self.output_1.as_deref(),
            LogicalPort::High => self.output_2.as_deref(),
        }
    }
}

/// Both output ports, as the engine's transport.
pub struct ConsoleOutputs {
    ports: [ConsoleOutput; 2],
}

impl ConsoleOutputs {
    pub fn new() -> Result<Self> {
        Ok(Self {
            ports: [
                ConsoleOutput::new(LogicalPort::Low)?,
                ConsoleOutput::new(LogicalPort::High)?,
            ],
        })
    }

    pub fn get(&self, port: LogicalPort) -> &ConsoleOutput {
        &self.ports[port.slot()]
    }
}

impl ConsoleSink for ConsoleOutputs {
    fn send_cc(&mut self, port: LogicalPort, cc: ControlChange) -> cinemix_core::Result<()> {
        self.get(port)
            .send_cc(cc)
            .map_err(|_| cinemix_core::Error::TransportUnavailable(port))
    }

    fn send_raw(&mut self, port: LogicalPort, byte: u8) -> cinemix_core::Result<()> {
        self.get(port)
            .send_raw(byte)
            .map_err(|_| cinemix_core::Error::TransportUnavailable(port))
    }
}

/// Both input ports. Parsed CCs from either port land on one channel.
pub struct ConsoleInputs {
    ports: [ConsoleInput; 2],
    sender: Sender<InboundCc>,
}

impl ConsoleInputs {
    pub fn new(capacity: usize) -> Result<(Self, Receiver<InboundCc>)> {
        let (sender, receiver) = bounded(capacity);
        let inputs = Self {
            ports: [
                ConsoleInput::new(LogicalPort::Low)?,
                ConsoleInput::new(LogicalPort::High)?,
            ],
            sender,
        };
        Ok((inputs, receiver))
    }

    pub fn get(&self, port: LogicalPort) -> &ConsoleInput {
        &self.ports[port.slot()]
    }

    pub fn connect_by_name(&self, port: LogicalPort, pattern: &str) -> Result<String> {
        self.get(port).connect_by_name(pattern, self.sender.clone())
    }

    pub fn disconnect_all(&self) {
        for input in &self.ports {
            input.disconnect();
        }
    }
}

/// Status handles for all four device connections.
#[derive(Debug, Clone, Default)]
pub struct PortHandles {
    pub inputs: [ConnectionStatus; 2],
    pub outputs: [ConnectionStatus; 2],
}

impl PortHandles {
    pub fn input_name(&self, port: LogicalPort) -> Option<String> {
        self.inputs[port.slot()].device_name()
    }

    pub fn output_name(&self, port: LogicalPort) -> Option<String> {
        self.outputs[port.slot()].device_name()
    }
}

/// Everything needed to talk to one console.
pub struct ConsolePorts {
    pub outputs: ConsoleOutputs,
    pub inputs: ConsoleInputs,
    pub inbound: Receiver<InboundCc>,
}

impl ConsolePorts {
    /// Spawn the four device threads and connect whatever `assignment`
    /// names. A device that cannot be opened is logged and left closed;
    /// sends to it fail with `TransportUnavailable` until it is reconnected.
    pub fn open(assignment: &PortAssignment, inbound_capacity: usize) -> Result<Self> {
        let outputs = ConsoleOutputs::new()?;
        let (inputs, inbound) = ConsoleInputs::new(inbound_capacity)?;
        let ports = Self {
            outputs,
            inputs,
            inbound,
        };

        for port in LogicalPort::ALL {
            if let Some(pattern) = assignment.output(port) {
                if let Err(e) = ports.outputs.get(port).connect_by_name(pattern) {
                    warn!(%port, pattern, error = %e, "Output left closed");
                }
            }
            if let Some(pattern) = assignment.input(port) {
                if let Err(e) = ports.inputs.connect_by_name(port, pattern) {
                    warn!(%port, pattern, error = %e, "Input left closed");
                }
            }
        }

        debug!(status = ?ports.handles(), "Console ports opened");
        Ok(ports)
    }

    pub fn handles(&self) -> PortHandles {
        PortHandles {
            inputs: [
                self.inputs.get(LogicalPort::Low).status(),
                self.inputs.get(LogicalPort::High).status(),
            ],
            outputs: [
                self.outputs.get(LogicalPort::Low).status(),
                self.outputs.get(LogicalPort::High).status(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_lookup() {
        let assignment = PortAssignment {
            input_2: Some("Cinemix B".into()),
            ..PortAssignment::pairs("Cinemix A", "ignored")
        };
        assert_eq!(assignment.input(LogicalPort::Low), Some("Cinemix A"));
        assert_eq!(assignment.input(LogicalPort::High), Some("Cinemix B"));
        assert_eq!(assignment.output(LogicalPort::High), Some("ignored"));
        assert_eq!(PortAssignment::default().output(LogicalPort::Low), None);
    }

    #[test]
    fn test_unconnected_outputs_report_unavailable() {
        let mut outputs = ConsoleOutputs::new().unwrap();
        assert_eq!(
            outputs.send_cc(LogicalPort::Low, ControlChange::new(1, 0, 0)),
            Err(cinemix_core::Error::TransportUnavailable(LogicalPort::Low))
        );
        assert_eq!(
            outputs.send_raw(LogicalPort::High, 0xFF),
            Err(cinemix_core::Error::TransportUnavailable(LogicalPort::High))
        );
    }

    #[test]
    fn test_open_with_empty_assignment() {
        let ports = ConsolePorts::open(&PortAssignment::default(), 8).unwrap();
        let handles = ports.handles();
        for port in LogicalPort::ALL {
            assert_eq!(handles.input_name(port), None);
            assert_eq!(handles.output_name(port), None);
        }
        assert!(ports.inbound.is_empty());

        // Disconnecting ports that never connected is harmless.
        ports.inputs.disconnect_all();
        assert!(!ports.inputs.get(LogicalPort::Low).is_connected());
    }
}
