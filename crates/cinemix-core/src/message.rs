//! Wire messages exchanged with the console: 3-byte Control Change and the
//! single-byte System Reset.

use crate::parameter::ParameterIndex;
use crate::table::LogicalPort;

pub const CONTROL_CHANGE_STATUS: u8 = 0xB0;
pub const SYSTEM_RESET: u8 = 0xFF;

/// A Control Change with a 1-based MIDI channel (1-16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlChange {
    channel: u8,
    controller: u8,
    value: u8,
}

impl ControlChange {
    /// Channel is clamped into 1-16, data bytes are masked to 7 bits.
    pub fn new(channel: u8, controller: u8, value: u8) -> Self {
        Self {
            channel: channel.clamp(1, 16),
            controller: controller & 0x7F,
            value: value & 0x7F,
        }
    }

    #[inline]
    pub fn channel(self) -> u8 {
        self.channel
    }

    #[inline]
    pub fn controller(self) -> u8 {
        self.controller
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.value
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [
            CONTROL_CHANGE_STATUS | (self.channel - 1),
            self.controller,
            self.value,
        ]
    }

    /// Parses a raw message; anything that is not a complete Control Change
    /// returns `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [status, controller, value, ..]
                if status & 0xF0 == CONTROL_CHANGE_STATUS
                    && controller < 0x80
                    && value < 0x80 =>
            {
                Some(Self {
                    channel: (status & 0x0F) + 1,
                    controller,
                    value,
                })
            }
            _ => None,
        }
    }
}

/// A Control Change observed on one of the console's input ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InboundCc {
    pub port: LogicalPort,
    pub cc: ControlChange,
}

impl InboundCc {
    pub fn new(port: LogicalPort, channel: u8, controller: u8, value: u8) -> Self {
        Self {
            port,
            cc: ControlChange::new(channel, controller, value),
        }
    }
}

/// A decoded console change, as delivered to the parameter host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterUpdate {
    pub index: ParameterIndex,
    /// Normalized, 0.0-1.0.
    pub value: f32,
}

/// Anything the engine can put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleMessage {
    ControlChange(ControlChange),
    Raw(u8),
}

impl ConsoleMessage {
    pub fn as_cc(&self) -> Option<ControlChange> {
        match self {
            ConsoleMessage::ControlChange(cc) => Some(*cc),
            ConsoleMessage::Raw(_) => None,
        }
    }
}

impl From<ControlChange> for ConsoleMessage {
    fn from(cc: ControlChange) -> Self {
        ConsoleMessage::ControlChange(cc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cc_bytes() {
        assert_eq!(ControlChange::new(1, 7, 127).to_bytes(), [0xB0, 7, 127]);
        assert_eq!(ControlChange::new(5, 127, 127).to_bytes(), [0xB4, 127, 127]);
        assert_eq!(ControlChange::new(16, 64, 0).to_bytes(), [0xBF, 64, 0]);
        // Out-of-range channels never reach the status byte.
        assert_eq!(ControlChange::new(0, 1, 1).to_bytes(), [0xB0, 1, 1]);
        assert_eq!(ControlChange::new(17, 1, 1).to_bytes(), [0xBF, 1, 1]);
    }

    #[test]
    fn test_channel_clamping_and_masking() {
        let cc = ControlChange::new(0, 0xFF, 0xFF);
        assert_eq!(cc.channel(), 1);
        assert_eq!((cc.controller(), cc.value()), (0x7F, 0x7F));
        assert_eq!(ControlChange::new(200, 1, 1).channel(), 16);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ControlChange::from_bytes(&[0xB2, 24, 3]),
            Some(ControlChange::new(3, 24, 3))
        );
        // Note on, truncated CC, bad data byte, system reset.
        assert_eq!(ControlChange::from_bytes(&[0x90, 60, 100]), None);
        assert_eq!(ControlChange::from_bytes(&[0xB0, 7]), None);
        assert_eq!(ControlChange::from_bytes(&[0xB0, 0x80, 1]), None);
        assert_eq!(ControlChange::from_bytes(&[SYSTEM_RESET]), None);
    }
}
