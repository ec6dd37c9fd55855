//! Device enumeration.

use midir::{MidiInput, MidiOutput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiDevice {
    /// Index in the backend's port list at enumeration time.
    pub index: usize,
    pub name: String,
}

pub fn list_input_devices() -> Vec<MidiDevice> {
    let mut devices = Vec::new();
    if let Ok(midi_input) = MidiInput::new("cinemix-device-list") {
        for (index, port) in midi_input.ports().iter().enumerate() {
            let name = midi_input
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            devices.push(MidiDevice { index, name });
        }
    }
    devices
}

pub fn list_output_devices() -> Vec<MidiDevice> {
    let mut devices = Vec::new();
    if let Ok(midi_output) = MidiOutput::new("cinemix-device-list") {
        for (index, port) in midi_output.ports().iter().enumerate() {
            let name = midi_output
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            devices.push(MidiDevice { index, name });
        }
    }
    devices
}

/// First device whose name contains `pattern`, ignoring case.
pub fn find_device<'a>(devices: &'a [MidiDevice], pattern: &str) -> Option<&'a MidiDevice> {
    let pattern = pattern.to_lowercase();
    devices
        .iter()
        .find(|d| d.name.to_lowercase().contains(&pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<MidiDevice> {
        ["IAC Driver Bus 1", "Cinemix Port 1", "Cinemix Port 2"]
            .iter()
            .enumerate()
            .map(|(index, name)| MidiDevice {
                index,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_find_device_case_insensitive() {
        let devices = devices();
        assert_eq!(find_device(&devices, "cinemix").map(|d| d.index), Some(1));
        assert_eq!(find_device(&devices, "PORT 2").map(|d| d.index), Some(2));
        assert_eq!(find_device(&devices, "iac").map(|d| d.index), Some(0));
        assert!(find_device(&devices, "missing").is_none());
    }
}
