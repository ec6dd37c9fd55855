//! The translation engine: one owner for the table, the duplicate cache and
//! the lifecycle, serving both directions.
//!
//! The engine takes `&mut self` everywhere, so whoever holds it (a mutex, a
//! dedicated thread) is the single domain in which host changes and console
//! traffic are serialized against the cache.

use crate::cache::DuplicateCache;
use crate::codec;
use crate::config::{EngineConfig, FaderDecode};
use crate::inbound::{self, FaderAssembler, InboundRoute};
use crate::lifecycle::{self, Lifecycle, LifecycleEvent, LifecycleState};
use crate::message::{InboundCc, ParameterUpdate};
use crate::outbound::{self, UpdateOutcome};
use crate::parameter::ParameterIndex;
use crate::sink::ConsoleSink;
use crate::table::{ParameterTable, ValueKind};
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Receives values decoded from console traffic. Called synchronously while
/// the engine is borrowed, so it must not call back into the engine.
pub trait ParameterObserver: Send {
    fn parameter_changed(&mut self, update: ParameterUpdate);
}

impl<F> ParameterObserver for F
where
    F: FnMut(ParameterUpdate) + Send,
{
    fn parameter_changed(&mut self, update: ParameterUpdate) {
        self(update)
    }
}

/// Current host values, pulled during a snapshot.
pub trait ParameterSource {
    fn current_value(&self, index: ParameterIndex) -> f32;
}

/// Indexed by parameter; missing entries read as the parameter default.
impl ParameterSource for [f32] {
    fn current_value(&self, index: ParameterIndex) -> f32 {
        self.get(index.get())
            .copied()
            .unwrap_or_else(|| index.default_value())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    /// Parameters whose value reached the wire.
    pub transmitted: usize,
    /// Individual CCs sent.
    pub messages: usize,
    pub unchanged: usize,
    /// Parameters lost to a closed port.
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub commands_sent: usize,
    pub commands_dropped: usize,
    pub snapshot: SnapshotReport,
}

pub struct TranslationEngine<S: ConsoleSink> {
    table: ParameterTable,
    cache: DuplicateCache,
    assembler: FaderAssembler,
    lifecycle: Lifecycle,
    config: EngineConfig,
    sink: S,
    observer: Option<Box<dyn ParameterObserver>>,
}

impl<S: ConsoleSink> TranslationEngine<S> {
    pub fn new(sink: S) -> Self {
        let config = EngineConfig::default();
        Self {
            table: ParameterTable::new(),
            cache: DuplicateCache::new(),
            assembler: FaderAssembler::new(config.pairing_timeout()),
            lifecycle: Lifecycle::new(),
            config,
            sink,
            observer: None,
        }
    }

    pub fn with_config(sink: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut engine = Self::new(sink);
        engine.assembler = FaderAssembler::new(config.pairing_timeout());
        engine.config = config;
        Ok(engine)
    }

    pub fn set_observer(&mut self, observer: impl ParameterObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn cache(&self) -> &DuplicateCache {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Host -> console for a raw index. Out-of-range indices fail with
    /// [`Error::InvalidParameterIndex`] before anything is sent.
    pub fn update_parameter(&mut self, index: usize, value: f32) -> Result<UpdateOutcome> {
        let index = ParameterIndex::new(index)?;
        self.update(index, value)
    }

    /// Host -> console.
    ///
    /// The cache only records a value once every CC for it went out; a
    /// transport failure is returned and the next update retries.
    pub fn update(&mut self, index: ParameterIndex, value: f32) -> Result<UpdateOutcome> {
        let plan = outbound::plan(self.table.rule(index), value);

        if !self.cache.should_send(index, plan.wire) {
            trace!(parameter = %index, wire = plan.wire, "Unchanged, not sending");
            return Ok(UpdateOutcome::Unchanged);
        }

        for cc in &plan.messages {
            if let Err(e) = self.sink.send_cc(plan.port, *cc) {
                warn!(parameter = %index, error = %e, "Dropping parameter update");
                return Err(e);
            }
            trace!(
                port = plan.port.number(),
                channel = cc.channel(),
                cc = cc.controller(),
                value = cc.value(),
                "CC out"
            );
        }

        self.cache.record(index, plan.wire);
        Ok(UpdateOutcome::Sent {
            messages: plan.messages.len(),
        })
    }

    /// Clear the cache and push every parameter from `source`.
    pub fn snapshot<P: ParameterSource + ?Sized>(&mut self, source: &P) -> SnapshotReport {
        self.cache.clear();

        let mut report = SnapshotReport::default();
        for index in ParameterIndex::all() {
            match self.update(index, source.current_value(index)) {
                Ok(UpdateOutcome::Sent { messages }) => {
                    report.transmitted += 1;
                    report.messages += messages;
                }
                Ok(UpdateOutcome::Unchanged) => report.unchanged += 1,
                Err(_) => report.dropped += 1,
            }
        }

        debug!(
            transmitted = report.transmitted,
            messages = report.messages,
            dropped = report.dropped,
            "Snapshot sent"
        );
        report
    }

    /// Run the activation sequence, then a snapshot of `source`.
    ///
    /// Commands are fire-and-forget: a closed port drops its share of the
    /// sequence and the rest still goes out.
    pub fn activate<P: ParameterSource + ?Sized>(&mut self, source: &P) -> ActivationReport {
        self.lifecycle.transition(LifecycleEvent::Activate);
        self.assembler.clear();

        let mut report = ActivationReport::default();
        let mut first_error: Option<Error> = None;
        for (port, cc) in lifecycle::activation_sequence() {
            match self.sink.send_cc(port, cc) {
                Ok(()) => report.commands_sent += 1,
                Err(e) => {
                    report.commands_dropped += 1;
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            warn!(
                dropped = report.commands_dropped,
                error = %e,
                "Activation commands dropped"
            );
        }

        report.snapshot = self.snapshot(source);
        self.lifecycle.transition(LifecycleEvent::Activated);
        report
    }

    /// Send System Reset to both ports. Both are attempted; the first
    /// failure is returned. The engine ends up inactive either way.
    pub fn deactivate(&mut self) -> Result<()> {
        self.lifecycle.transition(LifecycleEvent::Deactivate);

        let mut first_error = None;
        for (port, byte) in lifecycle::deactivation_sequence() {
            if let Err(e) = self.sink.send_raw(port, byte) {
                warn!(%port, error = %e, "System reset dropped");
                first_error.get_or_insert(e);
            }
        }

        self.assembler.clear();
        self.lifecycle.transition(LifecycleEvent::Deactivated);
        first_error.map_or(Ok(()), Err)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Console -> host. Returns the decoded update, which has also been
    /// handed to the observer. Traffic the table does not cover is dropped.
    pub fn handle_cc(&mut self, msg: InboundCc) -> Option<ParameterUpdate> {
        self.handle_cc_at(msg, Instant::now())
    }

    /// [`Self::handle_cc`] with an explicit arrival time, used for MSB/LSB
    /// pairing.
    pub fn handle_cc_at(&mut self, msg: InboundCc, now: Instant) -> Option<ParameterUpdate> {
        let Some(route) = inbound::route(&self.table, &msg) else {
            trace!(
                port = msg.port.number(),
                channel = msg.cc.channel(),
                cc = msg.cc.controller(),
                "Unroutable CC"
            );
            return None;
        };

        let value_byte = msg.cc.value();
        let (index, value) = match route {
            InboundRoute::AuxMuteGroup => {
                let Some((slot, on)) = codec::decode_aux_group(value_byte) else {
                    trace!(value = value_byte, "AUX mute value outside every slot");
                    return None;
                };
                (inbound::aux_parameter(slot)?, if on { 1.0 } else { 0.0 })
            }
            InboundRoute::Parameter(index) => {
                let kind = self.table.rule(index).kind;
                if kind == ValueKind::Continuous14 && self.config.fader_decode == FaderDecode::Paired
                {
                    self.assembler.on_msb(index, value_byte, now);
                    return None;
                }
                (index, inbound::decode_single(kind, value_byte))
            }
            InboundRoute::FaderLsb(index) => {
                if self.config.fader_decode != FaderDecode::Paired {
                    trace!(parameter = %index, "Ignoring fader LSB");
                    return None;
                }
                let wire = self.assembler.on_lsb(index, value_byte, now)?;
                (index, codec::decode_14bit(wire))
            }
        };

        if self.config.echo_suppression {
            let kind = self.table.rule(index).kind;
            self.cache.record(index, codec::encode(kind, value));
        }

        let update = ParameterUpdate { index, value };
        trace!(parameter = %index, value, "Console change");
        if let Some(observer) = self.observer.as_mut() {
            observer.parameter_changed(update);
        }
        Some(update)
    }
}
