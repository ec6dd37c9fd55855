//! MIDI transport for the Cinemix console bridge.
//!
//! Each logical port gets an output thread and an input thread that own
//! their midir connections. [`ConsoleOutputs`] implements the core's
//! `ConsoleSink`; inbound Control Changes from both ports arrive on one
//! bounded channel for the caller to feed into its engine.

pub mod error;
pub use error::{Error, Result};

pub mod device;
pub use device::{find_device, list_input_devices, list_output_devices, MidiDevice};

mod status;
pub use status::ConnectionStatus;

mod input;
mod output;
pub use input::ConsoleInput;
pub use output::ConsoleOutput;

mod ports;
pub use ports::{ConsoleInputs, ConsoleOutputs, ConsolePorts, PortAssignment, PortHandles};
