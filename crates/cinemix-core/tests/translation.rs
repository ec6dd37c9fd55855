//! Integration tests for cinemix-core.
//!
//! These drive a `TranslationEngine` end to end against a recording sink.

use approx::assert_relative_eq;
use cinemix_core::{
    CaptureSink, ConsoleMessage, ControlChange, EngineConfig, FaderDecode, InboundCc,
    LifecycleState, LogicalPort, ParameterIndex, ParameterUpdate, TranslationEngine,
    UpdateOutcome, PARAMETER_COUNT,
};
use std::sync::mpsc;
use std::time::{Duration, Instant};

fn engine() -> (TranslationEngine<CaptureSink>, CaptureSink) {
    let capture = CaptureSink::new();
    (TranslationEngine::new(capture.clone()), capture)
}

fn defaults() -> Vec<f32> {
    ParameterIndex::all().map(|i| i.default_value()).collect()
}

fn cc(channel: u8, controller: u8, value: u8) -> ControlChange {
    ControlChange::new(channel, controller, value)
}

// ---------------------------------------------------------------------------
// 1. Outbound: host changes reach the wire once
// ---------------------------------------------------------------------------

#[test]
fn test_unity_fader_on_first_upper_channel() {
    let (mut engine, capture) = engine();

    engine.update_parameter(0, 0.754).unwrap();

    assert_eq!(
        capture.sent_ccs(),
        vec![
            (LogicalPort::Low, cc(1, 0, 96)),
            (LogicalPort::Low, cc(1, 1, 65)),
        ]
    );
}

#[test]
fn test_first_upper_mute_toggle() {
    let (mut engine, capture) = engine();

    engine.update_parameter(72, 1.0).unwrap();
    engine.update_parameter(72, 0.0).unwrap();
    assert_eq!(engine.update_parameter(72, 0.0), Ok(UpdateOutcome::Unchanged));
    // 0.2 is still "off".
    assert_eq!(engine.update_parameter(72, 0.2), Ok(UpdateOutcome::Unchanged));

    assert_eq!(
        capture.sent_ccs(),
        vec![(LogicalPort::Low, cc(3, 0, 3)), (LogicalPort::Low, cc(3, 0, 2))]
    );

    engine.clear_cache();
    engine.update_parameter(72, 0.0).unwrap();
    assert_eq!(capture.len(), 3);
}

#[test]
fn test_repeat_sends_once_until_cache_cleared() {
    let (mut engine, capture) = engine();

    engine.update_parameter(154, 0.25).unwrap();
    engine.update_parameter(154, 0.25).unwrap();
    assert_eq!(capture.len(), 1);

    engine.clear_cache();
    engine.update_parameter(154, 0.25).unwrap();
    assert_eq!(capture.len(), 2);
}

#[test]
fn test_aux_mutes_share_one_controller() {
    let (mut engine, capture) = engine();

    engine.update_parameter(144, 1.0).unwrap();
    engine.update_parameter(153, 1.0).unwrap();
    engine.update_parameter(147, 0.0).unwrap();

    assert_eq!(
        capture.sent_ccs(),
        vec![
            (LogicalPort::High, cc(5, 96, 3)),
            (LogicalPort::High, cc(5, 96, 21)),
            (LogicalPort::High, cc(5, 96, 8)),
        ]
    );
}

#[test]
fn test_closed_port_drops_without_queueing() {
    let (mut engine, capture) = engine();
    capture.set_port_open(LogicalPort::Low, false);

    assert!(engine.update_parameter(0, 0.5).is_err());
    assert!(engine.update_parameter(160, 0.5).is_ok());

    capture.set_port_open(LogicalPort::Low, true);
    assert_eq!(capture.len(), 2, "only the master fader went out");

    engine.update_parameter(0, 0.5).unwrap();
    assert_eq!(capture.len(), 4);
}

// ---------------------------------------------------------------------------
// 2. Lifecycle: activation, snapshot, deactivation
// ---------------------------------------------------------------------------

#[test]
fn test_activation_then_snapshot() {
    let (mut engine, capture) = engine();
    let values = defaults();

    let report = engine.activate(values.as_slice());
    assert_eq!(engine.state(), LifecycleState::Active);
    assert_eq!(report.commands_sent, 104);
    assert_eq!(report.commands_dropped, 0);
    assert_eq!(report.snapshot.transmitted, PARAMETER_COUNT);
    assert_eq!(report.snapshot.messages, 234);

    let sent = capture.sent_ccs();
    assert_eq!(sent.len(), 104 + 234);

    // Command block precedes any parameter traffic.
    assert_eq!(sent[0], (LogicalPort::Low, cc(5, 127, 127)));
    assert_eq!(sent[3], (LogicalPort::High, cc(5, 65, 1)));
    assert_eq!(sent[4], (LogicalPort::Low, cc(3, 64, 0)));
    assert_eq!(sent[99], (LogicalPort::High, cc(4, 111, 0)));
    assert_eq!(sent[103], (LogicalPort::High, cc(5, 65, 15)));
    // First snapshot message is parameter 0's MSB.
    assert_eq!(sent[104], (LogicalPort::Low, cc(1, 0, 96)));
}

#[test]
fn test_snapshot_ignores_prior_cache_state() {
    let (mut engine, capture) = engine();
    let values = defaults();

    for index in 0..PARAMETER_COUNT {
        engine
            .update_parameter(index, values[index])
            .unwrap();
    }
    let before = capture.len();

    let report = engine.snapshot(values.as_slice());
    assert_eq!(report.transmitted, PARAMETER_COUNT);
    assert_eq!(report.unchanged, 0);
    assert_eq!(capture.len() - before, report.messages);
}

#[test]
fn test_snapshot_with_one_port_closed() {
    let (mut engine, capture) = engine();
    capture.set_port_open(LogicalPort::High, false);

    let report = engine.snapshot(defaults().as_slice());
    // Port 1 carries channels 1-24 of the four channel sections.
    assert_eq!(report.transmitted, 96);
    assert_eq!(report.dropped, PARAMETER_COUNT - 96);
}

#[test]
fn test_deactivate_sends_system_reset() {
    let (mut engine, capture) = engine();
    engine.activate(defaults().as_slice());
    capture.take();

    engine.deactivate().unwrap();
    assert_eq!(engine.state(), LifecycleState::Inactive);
    assert_eq!(
        capture.sent(),
        vec![
            (LogicalPort::Low, ConsoleMessage::Raw(0xFF)),
            (LogicalPort::High, ConsoleMessage::Raw(0xFF)),
        ]
    );
}

#[test]
fn test_deactivate_tries_both_ports() {
    let (mut engine, capture) = engine();
    capture.set_port_open(LogicalPort::Low, false);

    assert!(engine.deactivate().is_err());
    assert_eq!(engine.state(), LifecycleState::Inactive);
    assert_eq!(
        capture.sent(),
        vec![(LogicalPort::High, ConsoleMessage::Raw(0xFF))]
    );
}

// ---------------------------------------------------------------------------
// 3. Inbound: console traffic to host updates
// ---------------------------------------------------------------------------

#[test]
fn test_inbound_updates_reach_observer_channel() {
    let (mut engine, _capture) = engine();
    let (tx, rx) = mpsc::channel::<ParameterUpdate>();
    engine.set_observer(move |update: ParameterUpdate| {
        let _ = tx.send(update);
    });

    engine.handle_cc(InboundCc::new(LogicalPort::High, 4, 12, 3));
    engine.handle_cc(InboundCc::new(LogicalPort::High, 2, 48, 127));
    // Unmapped CC on a mapped channel.
    engine.handle_cc(InboundCc::new(LogicalPort::High, 2, 120, 1));

    let updates: Vec<_> = rx.try_iter().collect();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].index.get(), 132);
    assert_eq!(updates[0].value, 1.0);
    assert_eq!(updates[1].index.get(), 154);
    assert_eq!(updates[1].value, 1.0);
}

#[test]
fn test_inbound_aux_mute_resolves_slot_from_value() {
    let (mut engine, _capture) = engine();

    let update = engine
        .handle_cc(InboundCc::new(LogicalPort::High, 5, 96, 9))
        .unwrap();
    assert_eq!(update.index.get(), 147);
    assert_eq!(update.value, 1.0);

    let update = engine
        .handle_cc(InboundCc::new(LogicalPort::High, 5, 96, 20))
        .unwrap();
    assert_eq!(update.index.get(), 153);
    assert_eq!(update.value, 0.0);

    assert_eq!(engine.handle_cc(InboundCc::new(LogicalPort::High, 5, 96, 64)), None);
}

#[test]
fn test_inbound_fader_coarse_decode() {
    let (mut engine, _capture) = engine();

    let update = engine
        .handle_cc(InboundCc::new(LogicalPort::Low, 1, 0, 96))
        .unwrap();
    assert_relative_eq!(update.value, 96.0 / 127.0);
    // LSB is ignored in coarse mode.
    assert_eq!(engine.handle_cc(InboundCc::new(LogicalPort::Low, 1, 1, 65)), None);
}

#[test]
fn test_inbound_fader_paired_decode() {
    let config = EngineConfig {
        fader_decode: FaderDecode::Paired,
        ..Default::default()
    };
    let capture = CaptureSink::new();
    let mut engine = TranslationEngine::with_config(capture.clone(), config).unwrap();
    let t0 = Instant::now();

    assert_eq!(
        engine.handle_cc_at(InboundCc::new(LogicalPort::Low, 1, 0, 96), t0),
        None
    );
    let update = engine
        .handle_cc_at(
            InboundCc::new(LogicalPort::Low, 1, 1, 65),
            t0 + Duration::from_millis(5),
        )
        .unwrap();
    assert_eq!(update.index.get(), 0);
    assert_relative_eq!(update.value, 12353.0 / 16383.0);

    // Host echoes the value back: nothing goes out.
    assert_eq!(
        engine.update_parameter(0, update.value),
        Ok(UpdateOutcome::Unchanged)
    );
    assert!(capture.is_empty());

    // MSB older than the pairing timeout is discarded.
    engine.handle_cc_at(InboundCc::new(LogicalPort::Low, 1, 0, 10), t0);
    assert_eq!(
        engine.handle_cc_at(
            InboundCc::new(LogicalPort::Low, 1, 1, 0),
            t0 + Duration::from_millis(500),
        ),
        None
    );
}

#[test]
fn test_inbound_does_not_touch_the_wire() {
    let (mut engine, capture) = engine();
    for value in 0..=127 {
        engine.handle_cc(InboundCc::new(LogicalPort::Low, 3, 5, value));
    }
    assert!(capture.is_empty());
}
