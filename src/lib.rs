//! # Cinemix - D&R Cinemix console bridge
//!
//! Translates 161 host automation parameters to the console's MIDI CC
//! protocol and back.
//!
//! ## Architecture
//!
//! Cinemix is an umbrella crate that coordinates:
//! - **cinemix-core** - Protocol core (parameter table, value codec, dedup cache, lifecycle)
//! - **cinemix-midi-io** - MIDI transport (device enumeration, per-port I/O threads)
//!
//! ## Quick Start
//!
//! ```ignore
//! use cinemix::prelude::*;
//!
//! let bridge = ConsoleBridge::builder()
//!     .connect_ports(PortAssignment::pairs("Cinemix 1", "Cinemix 2"))
//!     .build()?;
//!
//! // Automation mode + full snapshot
//! bridge.activate();
//!
//! // Host automation
//! bridge.set_parameter_by_id("fader_upper_1", 0.754)?;
//!
//! // Console moves
//! for update in bridge.updates().try_iter() {
//!     println!("{} -> {}", update.index, update.value);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `midi-hardware`
//! - `midi-hardware` - Hardware MIDI ports via midir

/// Re-export of cinemix-core for direct access
pub use cinemix_core as core;

pub use cinemix_core::{
    ActivationReport, ControlChange, EngineConfig, FaderDecode, InboundCc, LifecycleState,
    LogicalPort, ParameterDescriptor, ParameterIndex, ParameterKind, ParameterUpdate,
    SnapshotReport, UpdateOutcome, PARAMETER_COUNT,
};

#[cfg(feature = "midi-hardware")]
pub use cinemix_midi_io as midi;

#[cfg(feature = "midi-hardware")]
pub use cinemix_midi_io::{list_input_devices, list_output_devices, MidiDevice, PortAssignment};

mod error;
pub use error::{Error, Result};

mod config;
pub use config::BridgeConfig;

mod store;
pub use store::ParameterStore;

mod status;
pub use status::PortStatus;

mod test_pattern;
pub use test_pattern::TestPattern;

mod bridge;
mod builder;

pub use bridge::ConsoleBridge;
pub use builder::ConsoleBridgeBuilder;

/// Convenience re-exports.
pub mod prelude {
    // Main bridge
    pub use crate::{BridgeConfig, ConsoleBridge, ConsoleBridgeBuilder};

    // Protocol types
    pub use crate::core::{
        EngineConfig, FaderDecode, InboundCc, LifecycleState, LogicalPort, ParameterIndex,
        ParameterUpdate, UpdateOutcome,
    };

    // Hardware
    #[cfg(feature = "midi-hardware")]
    pub use crate::midi::PortAssignment;

    pub use crate::{PortStatus, TestPattern};
}
