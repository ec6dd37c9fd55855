//! Console lifecycle: activation and deactivation command sequences.

use crate::message::{ControlChange, SYSTEM_RESET};
use crate::table::{LogicalPort, MASTER_CHANNEL};
use tracing::debug;

/// Automation-mode switch.
pub const AUTOMATION_MODE_CC: u8 = 127;
pub const MODE_CC: u8 = 65;
/// First and last SEL/touch indicator controllers.
pub const INDICATOR_CC_FIRST: u8 = 64;
pub const INDICATOR_CC_LAST: u8 = 111;

const LOW_INDICATOR_CHANNEL: u8 = 3;
const HIGH_INDICATOR_CHANNEL: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Inactive,
    Activating,
    Active,
    Deactivating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Begin the activation sequence.
    Activate,
    /// Activation commands and snapshot have been sent.
    Activated,
    Deactivate,
    /// System Reset has been sent.
    Deactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    None,
    Changed(LifecycleState),
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }

    /// Re-activating an active console re-runs the sequence; deactivation is
    /// accepted from anywhere except mid-deactivation.
    pub fn transition(&mut self, event: LifecycleEvent) -> TransitionResult {
        use LifecycleEvent::*;
        use LifecycleState::*;

        let next = match (event, self.state) {
            (Activate, Inactive | Active) => Some(Activating),
            (Activated, Activating) => Some(Active),
            (Deactivate, Inactive | Activating | Active) => Some(Deactivating),
            (Deactivated, Deactivating) => Some(Inactive),
            _ => None,
        };

        match next {
            Some(state) => {
                debug!(from = ?self.state, to = ?state, ?event, "Console lifecycle transition");
                self.state = state;
                TransitionResult::Changed(state)
            }
            None => TransitionResult::None,
        }
    }
}

/// The fixed activation command list, in firmware order:
///
/// 1. CC127=127 ch5 on both ports (enter automation mode)
/// 2. CC65=1 ch5 on both ports
/// 3. CC64..=111=0 on ch3/port 1, then ch4/port 2 (clear SEL indicators)
/// 4. CC127=127 ch5 on both ports
/// 5. CC65=15 ch5 on both ports
pub fn activation_sequence() -> Vec<(LogicalPort, ControlChange)> {
    let both = |controller: u8, value: u8| {
        LogicalPort::ALL
            .into_iter()
            .map(move |port| (port, ControlChange::new(MASTER_CHANNEL, controller, value)))
    };
    let indicators = |port: LogicalPort, channel: u8| {
        (INDICATOR_CC_FIRST..=INDICATOR_CC_LAST)
            .map(move |cc| (port, ControlChange::new(channel, cc, 0)))
    };

    both(AUTOMATION_MODE_CC, 127)
        .chain(both(MODE_CC, 1))
        .chain(indicators(LogicalPort::Low, LOW_INDICATOR_CHANNEL))
        .chain(indicators(LogicalPort::High, HIGH_INDICATOR_CHANNEL))
        .chain(both(AUTOMATION_MODE_CC, 127))
        .chain(both(MODE_CC, 15))
        .collect()
}

/// One System Reset byte per port.
pub fn deactivation_sequence() -> [(LogicalPort, u8); 2] {
    [
        (LogicalPort::Low, SYSTEM_RESET),
        (LogicalPort::High, SYSTEM_RESET),
    ]
}
