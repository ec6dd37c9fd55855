//! Protocol core for the D&R Cinemix console bridge.
//!
//! Maps the 161 automatable console parameters to the console's MIDI CC
//! protocol and back: parameter table, value codec, duplicate cache,
//! outbound and inbound translation, and the activation lifecycle.
//! No hardware access; transports plug in through [`ConsoleSink`].

pub mod error;
pub use error::{Error, Result};

pub mod parameter;
pub use parameter::{
    strip_label, ParameterDescriptor, ParameterIndex, ParameterKind, Row, Section, AUX_MUTES,
    CONSOLE_CHANNELS, PARAMETER_COUNT,
};

pub mod table;
pub use table::{LogicalPort, ParameterTable, ValueKind, WireRule, AUX_MUTE_CC, MASTER_CHANNEL};

pub mod codec;

pub mod message;
pub use message::{ConsoleMessage, ControlChange, InboundCc, ParameterUpdate, SYSTEM_RESET};

pub mod cache;
pub use cache::DuplicateCache;

pub mod outbound;
pub use outbound::{OutboundPlan, UpdateOutcome};

pub mod inbound;
pub use inbound::{FaderAssembler, InboundRoute};

pub mod lifecycle;
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecycleState};

pub mod config;
pub use config::{EngineConfig, FaderDecode};

pub mod sink;
pub use sink::{CaptureSink, ConsoleSink, DisconnectedSink};

mod engine;
pub use engine::{
    ActivationReport, ParameterObserver, ParameterSource, SnapshotReport, TranslationEngine,
};
