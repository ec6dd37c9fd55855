//! `ConsoleBridge`: host parameter store + translation engine + ports.

use crate::builder::ConsoleBridgeBuilder;
use crate::config::BridgeConfig;
use crate::status::PortStatus;
use crate::store::ParameterStore;
use crate::test_pattern::TestPattern;
use crate::Result;
use cinemix_core::{
    ActivationReport, ConsoleSink, InboundCc, LifecycleState, ParameterDescriptor,
    ParameterIndex, ParameterUpdate, Section, SnapshotReport, TranslationEngine, UpdateOutcome,
};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "midi-hardware")]
use crate::builder::Hardware;

pub(crate) type SharedEngine = Arc<Mutex<TranslationEngine<Box<dyn ConsoleSink>>>>;

/// Two-way bridge between host parameters and the console.
///
/// Host changes go through [`ConsoleBridge::set_parameter`]. Console traffic
/// (from the hardware inbound thread, or fed in with
/// [`ConsoleBridge::handle_console_cc`]) updates the store and is published
/// on [`ConsoleBridge::updates`].
///
/// # Example
///
/// ```ignore
/// use cinemix::prelude::*;
///
/// let bridge = ConsoleBridge::builder()
///     .connect_ports(PortAssignment::pairs("Cinemix 1", "Cinemix 2"))
///     .build()?;
///
/// bridge.activate();
/// bridge.set_parameter(0, 0.754)?;
/// println!("{}", bridge.port_status());
/// ```
pub struct ConsoleBridge {
    engine: SharedEngine,
    store: Arc<ParameterStore>,
    updates: Receiver<ParameterUpdate>,
    config: BridgeConfig,
    all_mutes_on: AtomicBool,
    #[cfg(feature = "midi-hardware")]
    hardware: Option<Hardware>,
}

impl ConsoleBridge {
    pub fn builder() -> ConsoleBridgeBuilder {
        ConsoleBridgeBuilder::default()
    }

    pub(crate) fn from_parts(
        engine: SharedEngine,
        store: Arc<ParameterStore>,
        updates: Receiver<ParameterUpdate>,
        config: BridgeConfig,
        #[cfg(feature = "midi-hardware")] hardware: Option<Hardware>,
    ) -> Self {
        Self {
            engine,
            store,
            updates,
            config,
            all_mutes_on: AtomicBool::new(false),
            #[cfg(feature = "midi-hardware")]
            hardware,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    pub fn descriptors(&self) -> Vec<ParameterDescriptor> {
        ParameterIndex::all().map(ParameterIndex::descriptor).collect()
    }

    pub fn parameter(&self, index: usize) -> Result<f32> {
        Ok(self.store.get(ParameterIndex::new(index)?))
    }

    pub fn parameter_by_id(&self, id: &str) -> Result<f32> {
        Ok(self.store.get(ParameterIndex::from_id(id)?))
    }

    /// Host -> console. The value is always stored; it is forwarded only
    /// while the console is active (unless `send_only_when_active` is off),
    /// in which case `Ok(None)` is returned.
    pub fn set_parameter(&self, index: usize, value: f32) -> Result<Option<UpdateOutcome>> {
        self.set(ParameterIndex::new(index)?, value)
    }

    pub fn set_parameter_by_id(&self, id: &str, value: f32) -> Result<Option<UpdateOutcome>> {
        self.set(ParameterIndex::from_id(id)?, value)
    }

    fn set(&self, index: ParameterIndex, value: f32) -> Result<Option<UpdateOutcome>> {
        let mut engine = self.engine.lock();
        self.set_locked(&mut engine, index, value)
    }

    /// Store and forward under the engine lock, so a console change handled
    /// by the inbound thread cannot land between the two.
    fn set_locked(
        &self,
        engine: &mut TranslationEngine<Box<dyn ConsoleSink>>,
        index: ParameterIndex,
        value: f32,
    ) -> Result<Option<UpdateOutcome>> {
        let value = self.store.set(index, value);
        if self.config.send_only_when_active && !engine.is_active() {
            return Ok(None);
        }
        Ok(Some(engine.update(index, value)?))
    }

    /// Apply every update; all are attempted, the first failure is returned.
    fn set_all(&self, updates: impl IntoIterator<Item = (ParameterIndex, f32)>) -> Result<usize> {
        let mut engine = self.engine.lock();
        let mut sent = 0;
        let mut first_error = None;
        for (index, value) in updates {
            match self.set_locked(&mut engine, index, value) {
                Ok(Some(UpdateOutcome::Sent { .. })) => sent += 1,
                Ok(_) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(sent), Err)
    }

    /// Console activation sequence followed by a snapshot of the store.
    pub fn activate(&self) -> ActivationReport {
        let report = self.engine.lock().activate(self.store.as_ref());
        debug!(
            commands = report.commands_sent,
            parameters = report.snapshot.transmitted,
            "Console activated"
        );
        report
    }

    pub fn deactivate(&self) -> Result<()> {
        Ok(self.engine.lock().deactivate()?)
    }

    /// Resend every parameter, ignoring the duplicate cache.
    pub fn snapshot(&self) -> SnapshotReport {
        self.engine.lock().snapshot(self.store.as_ref())
    }

    pub fn clear_cache(&self) {
        self.engine.lock().clear_cache();
    }

    pub fn state(&self) -> LifecycleState {
        self.engine.lock().state()
    }

    pub fn is_active(&self) -> bool {
        self.engine.lock().is_active()
    }

    /// Channel faders to 0, master fader up, every mute off. Joystick axes
    /// keep their position.
    pub fn reset_all(&self) -> Result<usize> {
        self.all_mutes_on.store(false, Ordering::Relaxed);
        self.set_all(ParameterIndex::all().filter_map(|index| match index.section() {
            Section::Fader(_) => Some((index, 0.0)),
            Section::MasterFader => Some((index, 1.0)),
            Section::Mute(_) | Section::AuxMute | Section::JoystickMute(_) => Some((index, 0.0)),
            Section::JoystickX(_) | Section::JoystickY(_) => None,
        }))
    }

    /// Flip every mute (channel, AUX and joystick) to a shared state. The
    /// first call mutes everything. Returns the new state.
    pub fn toggle_all_mutes(&self) -> Result<bool> {
        let on = !self.all_mutes_on.fetch_xor(true, Ordering::Relaxed);
        let value = if on { 1.0 } else { 0.0 };
        self.set_all(
            ParameterIndex::all()
                .filter(|index| index.is_toggle())
                .map(|index| (index, value)),
        )?;
        Ok(on)
    }

    /// Console -> host, for callers feeding their own transport.
    pub fn handle_console_cc(&self, msg: InboundCc) -> Option<ParameterUpdate> {
        self.engine.lock().handle_cc(msg)
    }

    /// Console-originated changes, in arrival order. Clones share the queue.
    pub fn updates(&self) -> Receiver<ParameterUpdate> {
        self.updates.clone()
    }

    pub fn port_status(&self) -> PortStatus {
        #[cfg(feature = "midi-hardware")]
        if let Some(hardware) = &self.hardware {
            return hardware.status();
        }
        PortStatus::default()
    }

    /// Advance `pattern` by `samples` and forward what it produced.
    pub fn apply_test_pattern_tick(&self, pattern: &mut TestPattern, samples: usize) -> Result<usize> {
        self.set_all(pattern.process(samples))
    }
}

impl std::fmt::Debug for ConsoleBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleBridge")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
