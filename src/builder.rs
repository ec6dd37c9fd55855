//! Builder for configuring and constructing a `ConsoleBridge`.

use crate::bridge::{ConsoleBridge, SharedEngine};
use crate::config::BridgeConfig;
use crate::store::ParameterStore;
use crate::Result;
use cinemix_core::{
    ConsoleSink, DisconnectedSink, EngineConfig, FaderDecode, ParameterUpdate, TranslationEngine,
};
use crossbeam_channel::{bounded, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "midi-hardware")]
use crate::status::PortStatus;
#[cfg(feature = "midi-hardware")]
use cinemix_core::{InboundCc, LogicalPort};
#[cfg(feature = "midi-hardware")]
use cinemix_midi_io::{ConsoleInputs, ConsolePorts, PortAssignment, PortHandles};
#[cfg(feature = "midi-hardware")]
use crossbeam_channel::Receiver;
#[cfg(feature = "midi-hardware")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "midi-hardware")]
use std::thread::{self, JoinHandle};
#[cfg(feature = "midi-hardware")]
use std::time::Duration;

/// Without a sink or ports every send fails with `TransportUnavailable`,
/// which still lets the host side (store, inbound decoding) run.
///
/// # Example
///
/// ```ignore
/// use cinemix::prelude::*;
///
/// let bridge = ConsoleBridge::builder()
///     .fader_decode(FaderDecode::Paired)
///     .connect_ports(PortAssignment::pairs("Cinemix 1", "Cinemix 2"))
///     .build()?;
/// ```
#[derive(Default)]
pub struct ConsoleBridgeBuilder {
    config: BridgeConfig,
    sink: Option<Box<dyn ConsoleSink>>,

    #[cfg(feature = "midi-hardware")]
    connect_ports: bool,
}

impl ConsoleBridgeBuilder {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.config.engine = config;
        self
    }

    /// Default: `FaderDecode::Coarse`
    pub fn fader_decode(mut self, mode: FaderDecode) -> Self {
        self.config.engine.fader_decode = mode;
        self
    }

    /// Default: true
    pub fn send_only_when_active(mut self, enabled: bool) -> Self {
        self.config.send_only_when_active = enabled;
        self
    }

    /// Default: 1024
    pub fn inbound_capacity(mut self, capacity: usize) -> Self {
        self.config.inbound_capacity = capacity;
        self
    }

    /// Custom transport. Takes precedence over `connect_ports`.
    pub fn sink(mut self, sink: impl ConsoleSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Open the named console devices on build.
    #[cfg(feature = "midi-hardware")]
    pub fn connect_ports(mut self, assignment: PortAssignment) -> Self {
        self.config.ports = assignment;
        self.connect_ports = true;
        self
    }

    pub fn build(self) -> Result<ConsoleBridge> {
        self.config.validate()?;

        #[cfg(feature = "midi-hardware")]
        let (sink, opened) = match (self.sink, self.connect_ports) {
            (Some(sink), _) => (sink, None),
            (None, true) => {
                let ports = ConsolePorts::open(&self.config.ports, self.config.inbound_capacity)?;
                let handles = ports.handles();
                let ConsolePorts {
                    outputs,
                    inputs,
                    inbound,
                } = ports;
                let sink: Box<dyn ConsoleSink> = Box::new(outputs);
                (sink, Some((inputs, inbound, handles)))
            }
            (None, false) => (Box::new(DisconnectedSink) as Box<dyn ConsoleSink>, None),
        };
        #[cfg(not(feature = "midi-hardware"))]
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(DisconnectedSink) as Box<dyn ConsoleSink>);

        let store = Arc::new(ParameterStore::new());
        let (update_tx, update_rx) = bounded(self.config.inbound_capacity);

        let mut engine = TranslationEngine::with_config(sink, self.config.engine.clone())?;
        let observer_store = Arc::clone(&store);
        engine.set_observer(move |update: ParameterUpdate| {
            observer_store.set(update.index, update.value);
            if let Err(TrySendError::Full(_)) = update_tx.try_send(update) {
                debug!(parameter = %update.index, "Update queue full, dropping notification");
            }
        });
        let engine: SharedEngine = Arc::new(Mutex::new(engine));

        #[cfg(feature = "midi-hardware")]
        let hardware = match opened {
            Some((inputs, inbound, handles)) => Some(Hardware::start(
                inputs,
                inbound,
                handles,
                Arc::clone(&engine),
            )?),
            None => None,
        };

        Ok(ConsoleBridge::from_parts(
            engine,
            store,
            update_rx,
            self.config,
            #[cfg(feature = "midi-hardware")]
            hardware,
        ))
    }
}

/// Open console devices plus the thread feeding their traffic into the
/// engine.
#[cfg(feature = "midi-hardware")]
pub(crate) struct Hardware {
    inputs: ConsoleInputs,
    handles: PortHandles,
    shutdown: Arc<AtomicBool>,
    inbound_thread: Option<JoinHandle<()>>,
}

#[cfg(feature = "midi-hardware")]
impl Hardware {
    fn start(
        inputs: ConsoleInputs,
        inbound: Receiver<InboundCc>,
        handles: PortHandles,
        engine: SharedEngine,
    ) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_shutdown = Arc::clone(&shutdown);
        let inbound_thread = thread::Builder::new()
            .name("console-inbound".to_string())
            .spawn(move || Self::inbound_loop(inbound, engine, thread_shutdown))?;

        Ok(Self {
            inputs,
            handles,
            shutdown,
            inbound_thread: Some(inbound_thread),
        })
    }

    fn inbound_loop(inbound: Receiver<InboundCc>, engine: SharedEngine, shutdown: Arc<AtomicBool>) {
        while !shutdown.load(Ordering::Acquire) {
            match inbound.recv_timeout(Duration::from_millis(100)) {
                Ok(msg) => {
                    engine.lock().handle_cc(msg);
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    pub(crate) fn status(&self) -> PortStatus {
        PortStatus {
            inputs: LogicalPort::ALL.map(|port| self.handles.input_name(port)),
            outputs: LogicalPort::ALL.map(|port| self.handles.output_name(port)),
        }
    }
}

#[cfg(feature = "midi-hardware")]
impl Drop for Hardware {
    fn drop(&mut self) {
        self.inputs.disconnect_all();
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.inbound_thread.take() {
            let _ = handle.join();
        }
    }
}
