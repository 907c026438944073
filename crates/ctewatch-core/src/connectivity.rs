// ── Connectivity state machine ──
//
// Binary: a cycle either fully succeeded or the source is considered
// offline. There is no "unknown" or "reconnecting" state.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
pub enum ConnectivityState {
    Online,
    #[default]
    Offline,
}

/// What a cycle outcome did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Transition {
    /// Offline → Online. Fires exactly once per recovery.
    BecameOnline,
    StillOnline,
    /// Online → Offline.
    WentOffline,
    StillOffline,
}

impl Transition {
    pub fn is_online(self) -> bool {
        matches!(self, Self::BecameOnline | Self::StillOnline)
    }

    /// True when the state actually flipped.
    pub fn changed(self) -> bool {
        matches!(self, Self::BecameOnline | Self::WentOffline)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connectivity {
    state: ConnectivityState,
}

impl Connectivity {
    /// Starts offline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn is_online(&self) -> bool {
        self.state == ConnectivityState::Online
    }

    pub fn on_success(&mut self) -> Transition {
        let prev = std::mem::replace(&mut self.state, ConnectivityState::Online);
        match prev {
            ConnectivityState::Offline => Transition::BecameOnline,
            ConnectivityState::Online => Transition::StillOnline,
        }
    }

    pub fn on_failure(&mut self) -> Transition {
        let prev = std::mem::replace(&mut self.state, ConnectivityState::Offline);
        match prev {
            ConnectivityState::Online => Transition::WentOffline,
            ConnectivityState::Offline => Transition::StillOffline,
        }
    }

    /// Status label for the header readout.
    pub fn status_label(&self) -> &'static str {
        match self.state {
            ConnectivityState::Online => "Connected",
            ConnectivityState::Offline => "Offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_offline() {
        let c = Connectivity::new();
        assert_eq!(c.state(), ConnectivityState::Offline);
        assert!(!c.is_online());
        assert_eq!(c.status_label(), "Offline");
    }

    #[test]
    fn full_transition_table() {
        let mut c = Connectivity::new();
        assert_eq!(c.on_failure(), Transition::StillOffline);
        assert_eq!(c.on_success(), Transition::BecameOnline);
        assert_eq!(c.on_success(), Transition::StillOnline);
        assert_eq!(c.status_label(), "Connected");
        assert_eq!(c.on_failure(), Transition::WentOffline);
        assert_eq!(c.on_failure(), Transition::StillOffline);
        assert_eq!(c.on_success(), Transition::BecameOnline);
    }

    #[test]
    fn transition_flags() {
        assert!(Transition::BecameOnline.changed());
        assert!(Transition::BecameOnline.is_online());
        assert!(!Transition::StillOnline.changed());
        assert!(!Transition::StillOffline.is_online());
        assert!(Transition::WentOffline.changed());
    }
}
