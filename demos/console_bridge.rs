//! Drive a Cinemix console: activate, animate the test pattern for a few
//! seconds, then hand control back.
//!
//! ```text
//! cargo run --example console_bridge -- "Cinemix Port 1" "Cinemix Port 2"
//! ```

use cinemix::prelude::*;
use std::time::{Duration, Instant};

const BLOCK: usize = 480;

fn main() -> cinemix::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let port_1 = args.next().unwrap_or_else(|| "Cinemix 1".to_string());
    let port_2 = args.next().unwrap_or_else(|| "Cinemix 2".to_string());

    let bridge = ConsoleBridge::builder()
        .connect_ports(PortAssignment::pairs(port_1, port_2))
        .build()?;
    println!("{}", bridge.port_status());

    let report = bridge.activate();
    println!(
        "Activated: {} commands, {} parameters",
        report.commands_sent, report.snapshot.transmitted
    );

    let sample_rate = 48000.0;
    let mut pattern = TestPattern::new(sample_rate);
    let block = Duration::from_secs_f64(BLOCK as f64 / sample_rate);
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        if let Err(e) = bridge.apply_test_pattern_tick(&mut pattern, BLOCK) {
            eprintln!("Test pattern: {e}");
        }
        for update in bridge.updates().try_iter() {
            println!("Console: {} = {:.3}", update.index, update.value);
        }
        std::thread::sleep(block);
    }

    if let Err(e) = bridge.reset_all() {
        eprintln!("Reset: {e}");
    }
    bridge.deactivate()?;
    Ok(())
}
