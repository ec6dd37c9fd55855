//! Hardware tests using a MIDI loopback device.
//!
//! Needs a loopback port whose name contains `CINEMIX_LOOPBACK` (default
//! "Midi Through" on Linux; use "IAC" on macOS). All tests are `#[ignore]`
//! so CI doesn't fail without hardware.
//!
//! Run with:
//!   CINEMIX_LOOPBACK=IAC cargo test -p cinemix-midi-io --test hardware -- --ignored --test-threads=1

use cinemix_core::{ConsoleSink, ControlChange, InboundCc, LogicalPort};
use cinemix_midi_io::{
    find_device, list_input_devices, list_output_devices, ConsolePorts, PortAssignment,
};
use std::thread;
use std::time::Duration;

const SETTLE: Duration = Duration::from_millis(200);
const RECV_TIMEOUT: Duration = Duration::from_millis(500);

fn loopback_name() -> String {
    std::env::var("CINEMIX_LOOPBACK").unwrap_or_else(|_| "Midi Through".to_string())
}

fn open_loopback_on_port_1() -> ConsolePorts {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let name = loopback_name();
    assert!(
        find_device(&list_output_devices(), &name).is_some(),
        "loopback output '{}' not found",
        name
    );
    assert!(
        find_device(&list_input_devices(), &name).is_some(),
        "loopback input '{}' not found",
        name
    );

    let assignment = PortAssignment {
        input_1: Some(name.clone()),
        output_1: Some(name),
        ..Default::default()
    };
    let ports = ConsolePorts::open(&assignment, 256).expect("Failed to open ports");
    thread::sleep(SETTLE);
    ports
}

#[test]
#[ignore]
fn test_cc_loopback() {
    let mut ports = open_loopback_on_port_1();
    assert!(ports.outputs.get(LogicalPort::Low).is_connected());

    ports
        .outputs
        .send_cc(LogicalPort::Low, ControlChange::new(3, 0, 3))
        .unwrap();

    let received = ports.inbound.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(received, InboundCc::new(LogicalPort::Low, 3, 0, 3));
}

#[test]
#[ignore]
fn test_fader_pair_arrives_in_order() {
    let mut ports = open_loopback_on_port_1();

    ports
        .outputs
        .send_cc(LogicalPort::Low, ControlChange::new(1, 0, 96))
        .unwrap();
    ports
        .outputs
        .send_cc(LogicalPort::Low, ControlChange::new(1, 1, 65))
        .unwrap();

    let msb = ports.inbound.recv_timeout(RECV_TIMEOUT).unwrap();
    let lsb = ports.inbound.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!((msb.cc.controller(), msb.cc.value()), (0, 96));
    assert_eq!((lsb.cc.controller(), lsb.cc.value()), (1, 65));
}

#[test]
#[ignore]
fn test_unassigned_port_stays_closed() {
    let mut ports = open_loopback_on_port_1();
    assert!(!ports.outputs.get(LogicalPort::High).is_connected());
    assert!(ports.outputs.send_raw(LogicalPort::High, 0xFF).is_err());
}
