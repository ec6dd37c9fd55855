//! Human-readable port status.

use cinemix_core::LogicalPort;
use std::fmt;

/// Device name per direction and logical port; `None` when closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortStatus {
    pub inputs: [Option<String>; 2],
    pub outputs: [Option<String>; 2],
}

impl PortStatus {
    pub fn input(&self, port: LogicalPort) -> Option<&str> {
        self.inputs[port.slot()].as_deref()
    }

    pub fn output(&self, port: LogicalPort) -> Option<&str> {
        self.outputs[port.slot()].as_deref()
    }

    pub fn outputs_open(&self) -> bool {
        self.outputs.iter().all(Option::is_some)
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |n: &Option<String>| n.clone().unwrap_or_else(|| "None".to_string());
        write!(
            f,
            "IN1: {}\nIN2: {}\nOUT1: {}\nOUT2: {}",
            name(&self.inputs[0]),
            name(&self.inputs[1]),
            name(&self.outputs[0]),
            name(&self.outputs[1]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string() {
        let status = PortStatus {
            inputs: [Some("Cinemix A".into()), None],
            outputs: [Some("Cinemix A".into()), Some("Cinemix B".into())],
        };
        assert_eq!(
            status.to_string(),
            "IN1: Cinemix A\nIN2: None\nOUT1: Cinemix A\nOUT2: Cinemix B"
        );
        assert!(status.outputs_open());
        assert_eq!(status.input(LogicalPort::High), None);
        assert!(!PortStatus::default().outputs_open());
    }
}
