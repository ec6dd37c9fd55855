use cinemix_midi_io::{list_input_devices, list_output_devices};

fn main() {
    println!("=== MIDI Input Devices ===");
    let inputs = list_input_devices();
    if inputs.is_empty() {
        println!("  (none found)");
    }
    for dev in &inputs {
        println!("  [{}] {}", dev.index, dev.name);
    }

    println!("\n=== MIDI Output Devices ===");
    let outputs = list_output_devices();
    if outputs.is_empty() {
        println!("  (none found)");
    }
    for dev in &outputs {
        println!("  [{}] {}", dev.index, dev.name);
    }
}
