//! Translation engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How an inbound 14-bit fader is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaderDecode {
    /// Treat the MSB as a 7-bit value and ignore the LSB.
    #[default]
    Coarse,
    /// Latch the MSB and decode the full 14-bit value when its LSB arrives.
    Paired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fader_decode: FaderDecode,
    /// How long a latched MSB waits for its LSB in [`FaderDecode::Paired`].
    pub pairing_timeout_ms: u64,
    /// Seed the duplicate cache with values decoded from the console, so a
    /// host echoing them back does not re-send.
    pub echo_suppression: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fader_decode: FaderDecode::Coarse,
            pairing_timeout_ms: 50,
            echo_suppression: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5000).contains(&self.pairing_timeout_ms) {
            return Err(Error::InvalidConfig(format!(
                "pairing_timeout_ms {} out of range (1-5000 ms)",
                self.pairing_timeout_ms
            )));
        }
        Ok(())
    }

    pub fn pairing_timeout(&self) -> Duration {
        Duration::from_millis(self.pairing_timeout_ms)
    }
}
