//! Parameter identity for the 161 automatable console controls.
//!
//! Index ranges are fixed:
//!
//! | Range   | Control                                   |
//! |---------|-------------------------------------------|
//! | 0-35    | Upper-row faders, console channels 1-36   |
//! | 36-71   | Lower-row faders, console channels 1-36   |
//! | 72-107  | Upper-row mutes, console channels 1-36    |
//! | 108-143 | Lower-row mutes, console channels 1-36    |
//! | 144-153 | AUX 1-10 mutes                            |
//! | 154-159 | Joystick 1 X/Y/mute, joystick 2 X/Y/mute  |
//! | 160     | Master fader                              |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of automatable parameters.
pub const PARAMETER_COUNT: usize = 161;

/// Number of physical console channels (two rows each).
pub const CONSOLE_CHANNELS: u8 = 36;

/// Number of AUX send mutes.
pub const AUX_MUTES: u8 = 10;

const UPPER_FADERS: usize = 0;
const LOWER_FADERS: usize = 36;
const UPPER_MUTES: usize = 72;
const LOWER_MUTES: usize = 108;
const AUX_MUTE_START: usize = 144;
const JOYSTICK_START: usize = 154;
const MASTER_FADER: usize = 160;

/// Canonical identity of an automatable value (0-160).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ParameterIndex(u8);

/// Which of the two automatable rows a channel control belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    /// The "channel" row.
    Upper,
    /// The "mix" row.
    Lower,
}

/// Console section a parameter lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Fader(Row),
    Mute(Row),
    AuxMute,
    /// Joystick number 1 or 2.
    JoystickX(u8),
    JoystickY(u8),
    JoystickMute(u8),
    MasterFader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Continuous value in [0, 1].
    Float,
    /// On/off; values above 0.5 are on.
    Toggle,
}

/// Host-facing description of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub index: ParameterIndex,
    /// Stable identifier, e.g. `fader_upper_1` or `master_fader`.
    pub id: String,
    /// Display name using the console strip labels, e.g. `Fader Upper S2`.
    pub name: String,
    pub default: f32,
    pub kind: ParameterKind,
}

impl ParameterIndex {
    pub const MASTER_FADER: Self = Self(MASTER_FADER as u8);

    pub fn new(index: usize) -> Result<Self> {
        if index < PARAMETER_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(Error::InvalidParameterIndex(index))
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// All 161 indices in table order.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..PARAMETER_COUNT as u8).map(Self)
    }

    pub fn section(self) -> Section {
        match self.get() {
            i if i < LOWER_FADERS => Section::Fader(Row::Upper),
            i if i < UPPER_MUTES => Section::Fader(Row::Lower),
            i if i < LOWER_MUTES => Section::Mute(Row::Upper),
            i if i < AUX_MUTE_START => Section::Mute(Row::Lower),
            i if i < JOYSTICK_START => Section::AuxMute,
            154 => Section::JoystickX(1),
            155 => Section::JoystickY(1),
            156 => Section::JoystickMute(1),
            157 => Section::JoystickX(2),
            158 => Section::JoystickY(2),
            159 => Section::JoystickMute(2),
            _ => Section::MasterFader,
        }
    }

    /// Console channel (1-36) for channel-strip faders and mutes.
    pub fn console_channel(self) -> Option<u8> {
        let i = self.get();
        let offset = match self.section() {
            Section::Fader(Row::Upper) => UPPER_FADERS,
            Section::Fader(Row::Lower) => LOWER_FADERS,
            Section::Mute(Row::Upper) => UPPER_MUTES,
            Section::Mute(Row::Lower) => LOWER_MUTES,
            _ => return None,
        };
        Some((i - offset) as u8 + 1)
    }

    /// AUX slot (0-9) for AUX mutes.
    pub fn aux_slot(self) -> Option<u8> {
        match self.section() {
            Section::AuxMute => Some((self.get() - AUX_MUTE_START) as u8),
            _ => None,
        }
    }

    pub fn kind(self) -> ParameterKind {
        match self.section() {
            Section::Mute(_) | Section::AuxMute | Section::JoystickMute(_) => ParameterKind::Toggle,
            _ => ParameterKind::Float,
        }
    }

    /// Host default: faders sit at unity (0.754), joystick axes centred,
    /// master fully up, mutes off.
    pub fn default_value(self) -> f32 {
        match self.section() {
            Section::Fader(_) => 0.754,
            Section::JoystickX(_) | Section::JoystickY(_) => 0.5,
            Section::MasterFader => 1.0,
            Section::Mute(_) | Section::AuxMute | Section::JoystickMute(_) => 0.0,
        }
    }

    pub fn id(self) -> String {
        let row = |row: Row| match row {
            Row::Upper => "upper",
            Row::Lower => "lower",
        };
        let channel = self.console_channel().unwrap_or_default();
        match self.section() {
            Section::Fader(r) => format!("fader_{}_{}", row(r), channel),
            Section::Mute(r) => format!("mute_{}_{}", row(r), channel),
            Section::AuxMute => format!("aux_mute_{}", self.aux_slot().unwrap_or_default() + 1),
            Section::JoystickX(n) => format!("joy{}_x", n),
            Section::JoystickY(n) => format!("joy{}_y", n),
            Section::JoystickMute(n) => format!("joy{}_mute", n),
            Section::MasterFader => "master_fader".to_string(),
        }
    }

    pub fn name(self) -> String {
        let row = |row: Row| match row {
            Row::Upper => "Upper",
            Row::Lower => "Lower",
        };
        let label = self.console_channel().map(strip_label).unwrap_or_default();
        match self.section() {
            Section::Fader(r) => format!("Fader {} {}", row(r), label),
            Section::Mute(r) => format!("Mute {} {}", row(r), label),
            Section::AuxMute => format!("AUX {} Mute", self.aux_slot().unwrap_or_default() + 1),
            Section::JoystickX(n) => format!("Joystick {} X", n),
            Section::JoystickY(n) => format!("Joystick {} Y", n),
            Section::JoystickMute(n) => format!("Joystick {} Mute", n),
            Section::MasterFader => "Master Fader".to_string(),
        }
    }

    pub fn descriptor(self) -> ParameterDescriptor {
        ParameterDescriptor {
            index: self,
            id: self.id(),
            name: self.name(),
            default: self.default_value(),
            kind: self.kind(),
        }
    }

    /// Reverse of [`ParameterIndex::id`].
    pub fn from_id(id: &str) -> Result<Self> {
        Self::all()
            .find(|index| index.id() == id)
            .ok_or_else(|| Error::UnknownParameterId(id.to_string()))
    }

    pub fn is_toggle(self) -> bool {
        self.kind() == ParameterKind::Toggle
    }
}

/// Strip label printed on the console: channels 25-28 are the stereo
/// strips S1-S4, the mono strips continue as M25-M32 after them.
pub fn strip_label(channel: u8) -> String {
    match channel {
        25..=28 => format!("S{}", channel - 24),
        29..=u8::MAX => format!("M{}", channel - 4),
        _ => format!("M{}", channel),
    }
}

impl TryFrom<usize> for ParameterIndex {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::new(index)
    }
}

impl From<ParameterIndex> for usize {
    fn from(index: ParameterIndex) -> usize {
        index.get()
    }
}

impl fmt::Display for ParameterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.0, self.id())
    }
}
