//! Connection state shared between a device thread and its readers.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap, cloneable view of one device connection.
#[derive(Clone)]
pub struct ConnectionStatus {
    device: Arc<ArcSwap<Option<String>>>,
    connected: Arc<AtomicBool>,
}

impl ConnectionStatus {
    pub(crate) fn new() -> Self {
        Self {
            device: Arc::new(ArcSwap::new(Arc::new(None))),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn set_connected(&self, name: String) {
        self.device.store(Arc::new(Some(name)));
        self.connected.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.device.store(Arc::new(None));
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn device_name(&self) -> Option<String> {
        self.device.load().as_ref().clone()
    }
}

impl fmt::Debug for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionStatus")
            .field("device", &self.device_name())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_visible_through_clones() {
        let status = ConnectionStatus::new();
        let view = status.clone();
        assert!(!view.is_connected());
        assert_eq!(view.device_name(), None);

        status.set_connected("Cinemix 1".to_string());
        assert!(view.is_connected());
        assert_eq!(view.device_name().as_deref(), Some("Cinemix 1"));

        status.set_disconnected();
        assert!(!view.is_connected());
        assert_eq!(view.device_name(), None);
    }
}
