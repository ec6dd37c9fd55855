//! Normalized value <-> wire value conversion.
//!
//! All functions are total: out-of-range (and NaN) inputs are clamped,
//! never rejected, since automation curves routinely overshoot.

use crate::table::ValueKind;

pub const MAX_14BIT: u16 = 16383;
pub const MAX_7BIT: u8 = 127;

/// Console firmware mute encoding (not 0/127).
pub const MUTE_OFF: u8 = 2;
pub const MUTE_ON: u8 = 3;

const AUX_LAST_SLOT: u8 = 9;

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Toggle threshold shared by every on/off parameter.
#[inline]
pub fn is_on(value: f32) -> bool {
    value > 0.5
}

#[inline]
pub fn encode_14bit(value: f32) -> u16 {
    (clamp_unit(value) * MAX_14BIT as f32).round() as u16
}

#[inline]
pub fn decode_14bit(value: u16) -> f32 {
    value.min(MAX_14BIT) as f32 / MAX_14BIT as f32
}

/// Returns `(msb, lsb)`.
#[inline]
pub fn split_14bit(value: u16) -> (u8, u8) {
    (((value >> 7) & 0x7F) as u8, (value & 0x7F) as u8)
}

#[inline]
pub fn join_14bit(msb: u8, lsb: u8) -> u16 {
    (((msb & 0x7F) as u16) << 7) | (lsb & 0x7F) as u16
}

#[inline]
pub fn encode_7bit(value: f32) -> u8 {
    (clamp_unit(value) * MAX_7BIT as f32).round() as u8
}

#[inline]
pub fn decode_7bit(value: u8) -> f32 {
    value.min(MAX_7BIT) as f32 / MAX_7BIT as f32
}

#[inline]
pub fn encode_mute(on: bool) -> u8 {
    if on {
        MUTE_ON
    } else {
        MUTE_OFF
    }
}

/// Only 3 is "on"; 2 and any unexpected byte decode as off.
#[inline]
pub fn decode_mute(value: u8) -> bool {
    value == MUTE_ON
}

/// AUX mutes share one CC; the slot is folded into the value.
#[inline]
pub fn encode_aux_mute(slot: u8, on: bool) -> u8 {
    slot.min(AUX_LAST_SLOT) * 2 + encode_mute(on)
}

#[inline]
pub fn decode_aux_mute(slot: u8, observed: u8) -> bool {
    observed == slot.min(AUX_LAST_SLOT) * 2 + MUTE_ON
}

/// Recover `(slot, on)` from a value seen on the shared AUX CC.
/// Values outside 2..=21 belong to no slot.
pub fn decode_aux_group(observed: u8) -> Option<(u8, bool)> {
    let max = encode_aux_mute(AUX_LAST_SLOT, true);
    if (MUTE_OFF..=max).contains(&observed) {
        let slot = (observed - MUTE_OFF) / 2;
        Some((slot, decode_aux_mute(slot, observed)))
    } else {
        None
    }
}

/// Wire integer for a value under a given rule kind. This is what the
/// duplicate cache stores.
pub fn encode(kind: ValueKind, value: f32) -> u16 {
    match kind {
        ValueKind::Continuous14 => encode_14bit(value),
        ValueKind::Discrete7 => encode_7bit(value) as u16,
        ValueKind::MuteBinary => encode_mute(is_on(value)) as u16,
        ValueKind::AuxMuteBinary { slot } => encode_aux_mute(slot, is_on(value)) as u16,
    }
}

/// Inverse of [`encode`].
pub fn decode(kind: ValueKind, wire: u16) -> f32 {
    let byte = wire.min(u8::MAX as u16) as u8;
    let toggle = |on: bool| if on { 1.0 } else { 0.0 };
    match kind {
        ValueKind::Continuous14 => decode_14bit(wire),
        ValueKind::Discrete7 => decode_7bit(byte),
        ValueKind::MuteBinary => toggle(decode_mute(byte)),
        ValueKind::AuxMuteBinary { slot } => toggle(decode_aux_mute(slot, byte)),
    }
}
