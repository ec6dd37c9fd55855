//! Host-side parameter values.

use atomic_float::AtomicF32;
use cinemix_core::{ParameterIndex, ParameterSource, PARAMETER_COUNT};
use std::sync::atomic::Ordering;

/// The 161 current parameter values, readable and writable from any
/// thread without locking.
#[derive(Debug)]
pub struct ParameterStore {
    values: Vec<AtomicF32>,
}

impl ParameterStore {
    /// Every parameter at its default.
    pub fn new() -> Self {
        Self {
            values: ParameterIndex::all()
                .map(|index| AtomicF32::new(index.default_value()))
                .collect(),
        }
    }

    #[inline]
    pub fn get(&self, index: ParameterIndex) -> f32 {
        self.values[index.get()].load(Ordering::Acquire)
    }

    /// Stores `value` clamped to 0.0-1.0 (NaN reads as 0.0) and returns
    /// what was stored.
    #[inline]
    pub fn set(&self, index: ParameterIndex, value: f32) -> f32 {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        self.values[index.get()].store(value, Ordering::Release);
        value
    }

    pub fn reset_to_defaults(&self) {
        for index in ParameterIndex::all() {
            self.set(index, index.default_value());
        }
    }

    /// Copy of all values in index order.
    pub fn values(&self) -> Vec<f32> {
        ParameterIndex::all().map(|index| self.get(index)).collect()
    }

    pub fn len(&self) -> usize {
        PARAMETER_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSource for ParameterStore {
    fn current_value(&self, index: ParameterIndex) -> f32 {
        self.get(index)
    }
}
