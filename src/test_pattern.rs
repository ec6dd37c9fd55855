//! Diagnostic animation: faders sweep in a staggered wave while the
//! channel mutes flicker at random. Handy for checking a console's wiring
//! without a host session.

use cinemix_core::ParameterIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Faders animated: both rows of all 36 channels.
pub const ANIMATED_FADERS: usize = 72;
/// First mute animated; 72 mutes follow.
const FIRST_MUTE: usize = 72;

const FADER_RATE_HZ: f64 = 25.0;
const MUTE_RATE_HZ: f64 = 10.0;
const PHASE_STEP: f32 = 0.05;

pub struct TestPattern {
    phases: [f32; ANIMATED_FADERS],
    fader_interval: u64,
    mute_interval: u64,
    fader_counter: u64,
    mute_counter: u64,
    rng: StdRng,
}

impl TestPattern {
    pub fn new(sample_rate: f64) -> Self {
        Self::with_rng(sample_rate, StdRng::from_entropy())
    }

    /// Deterministic mute sequence.
    pub fn with_seed(sample_rate: f64, seed: u64) -> Self {
        Self::with_rng(sample_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(sample_rate: f64, rng: StdRng) -> Self {
        let interval = |hz: f64| ((sample_rate / hz) as u64).max(1);
        Self {
            phases: std::array::from_fn(|i| -2.0 + i as f32 * 4.0 / ANIMATED_FADERS as f32),
            fader_interval: interval(FADER_RATE_HZ),
            mute_interval: interval(MUTE_RATE_HZ),
            fader_counter: 0,
            mute_counter: 0,
            rng,
        }
    }

    pub fn fader_interval(&self) -> u64 {
        self.fader_interval
    }

    pub fn mute_interval(&self) -> u64 {
        self.mute_interval
    }

    /// Advance by `samples` and return the parameter values that changed.
    /// Several fader steps may fall inside one long block; only the latest
    /// value of each parameter is returned.
    pub fn process(&mut self, samples: usize) -> Vec<(ParameterIndex, f32)> {
        let mut updates = Vec::new();

        self.fader_counter += samples as u64;
        let fader_steps = self.fader_counter / self.fader_interval;
        self.fader_counter %= self.fader_interval;
        if fader_steps > 0 {
            for _ in 0..fader_steps {
                self.step_phases();
            }
            updates.extend(self.fader_values());
        }

        self.mute_counter += samples as u64;
        if self.mute_counter >= self.mute_interval {
            self.mute_counter %= self.mute_interval;
            updates.extend(self.random_mutes());
        }

        updates
    }

    fn step_phases(&mut self) {
        for phase in &mut self.phases {
            *phase += PHASE_STEP;
            if *phase > 1.0 {
                *phase -= 2.0;
            }
        }
    }

    fn fader_values(&self) -> impl Iterator<Item = (ParameterIndex, f32)> + '_ {
        ParameterIndex::all()
            .zip(self.phases.iter())
            .map(|(index, &ramp)| (index, wave(ramp).clamp(0.0, 1.0)))
    }

    fn random_mutes(&mut self) -> Vec<(ParameterIndex, f32)> {
        ParameterIndex::all()
            .skip(FIRST_MUTE)
            .take(ANIMATED_FADERS)
            .map(|index| {
                let on = self.rng.gen::<f32>() > 0.5;
                (index, if on { 1.0 } else { 0.0 })
            })
            .collect()
    }
}

/// Parabolic approximation of a sine; 0.0-1.0 for ramps in -1.0..=1.0.
fn wave(ramp: f32) -> f32 {
    ramp * (1.0 - ramp.abs()) * 2.0 + 0.5
}
