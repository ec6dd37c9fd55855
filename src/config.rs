//! Bridge configuration.

use crate::{Error, Result};
use cinemix_core::EngineConfig;
use serde::{Deserialize, Serialize};

#[cfg(feature = "midi-hardware")]
use cinemix_midi_io::PortAssignment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub engine: EngineConfig,

    /// Devices opened by `ConsoleBridgeBuilder::connect_ports`.
    #[cfg(feature = "midi-hardware")]
    pub ports: PortAssignment,

    /// Bound on queued inbound CCs and undelivered host updates.
    pub inbound_capacity: usize,

    /// Forward host changes to the console only while it is active.
    pub send_only_when_active: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            #[cfg(feature = "midi-hardware")]
            ports: PortAssignment::default(),
            inbound_capacity: 1024,
            send_only_when_active: true,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.inbound_capacity == 0 {
            return Err(Error::InvalidConfig(
                "inbound_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.inbound_capacity, 1024);
        assert!(config.send_only_when_active);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = BridgeConfig {
            inbound_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_engine_errors_propagate() {
        let mut config = BridgeConfig::default();
        config.engine.pairing_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(Error::Core(_))));
    }
}
