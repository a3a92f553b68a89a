//! Network transition detection.
//!
//! [`TransitionDetector`] watches the stream of signal samples and emits
//! at most one [`Trigger`] per new network association. Repeated samples
//! of the same network stay quiet; a disconnect resets the detector so
//! the next association fires again, even for the same network.

use crate::signal::SignalSample;

/// Why a trigger fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Went from disconnected to associated.
    Connected,
    /// Moved from one identified network to another without an
    /// intervening disconnect.
    Roamed,
}

/// A detected network transition worth logging a location for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Identity of the newly associated network.
    pub identity: String,
    /// The kind of transition that produced this trigger.
    pub kind: TriggerKind,
}

/// Stateful detector over consecutive signal samples.
///
/// Samples without a usable network identity (disconnected, query
/// errors, simulated signals) count as disconnects.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    last_identity: Option<String>,
}

impl TransitionDetector {
    /// Create a detector in the disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sample; returns a trigger if it represents a new
    /// association.
    pub fn observe(&mut self, sample: &SignalSample) -> Option<Trigger> {
        let Some(identity) = sample.identity() else {
            if self.last_identity.take().is_some() {
                tracing::debug!("network disconnected, detector reset");
            }
            return None;
        };

        match self.last_identity.as_deref() {
            None => {
                tracing::info!(network = identity, "connected to network");
                self.last_identity = Some(identity.to_string());
                Some(Trigger {
                    identity: identity.to_string(),
                    kind: TriggerKind::Connected,
                })
            }
            Some(last) if last != identity => {
                tracing::info!(from = last, to = identity, "roamed to new network");
                self.last_identity = Some(identity.to_string());
                Some(Trigger {
                    identity: identity.to_string(),
                    kind: TriggerKind::Roamed,
                })
            }
            Some(_) => None,
        }
    }

    /// Identity of the currently tracked network, if associated.
    #[must_use]
    pub fn current_network(&self) -> Option<&str> {
        self.last_identity.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(ssid: &str) -> SignalSample {
        SignalSample::connected(80, ssid)
    }

    #[test]
    fn test_fresh_connect_triggers_once() {
        let mut detector = TransitionDetector::new();

        let first = detector.observe(&connected("HomeNet"));
        assert_eq!(
            first,
            Some(Trigger {
                identity: "HomeNet".to_string(),
                kind: TriggerKind::Connected,
            })
        );

        assert!(detector.observe(&connected("HomeNet")).is_none());
        assert!(detector.observe(&connected("HomeNet")).is_none());
    }

    #[test]
    fn test_roam_triggers() {
        let mut detector = TransitionDetector::new();
        detector.observe(&connected("HomeNet"));

        let roam = detector.observe(&connected("CafeNet"));
        assert_eq!(
            roam,
            Some(Trigger {
                identity: "CafeNet".to_string(),
                kind: TriggerKind::Roamed,
            })
        );
        assert_eq!(detector.current_network(), Some("CafeNet"));
    }

    #[test]
    fn test_disconnect_resets() {
        let mut detector = TransitionDetector::new();
        detector.observe(&connected("HomeNet"));

        assert!(detector.observe(&SignalSample::disconnected()).is_none());
        assert!(detector.current_network().is_none());

        // Reconnecting to the same network fires again.
        let again = detector.observe(&connected("HomeNet"));
        assert_eq!(again.map(|t| t.kind), Some(TriggerKind::Connected));
    }

    #[test]
    fn test_query_error_counts_as_disconnect() {
        let mut detector = TransitionDetector::new();
        detector.observe(&connected("HomeNet"));

        assert!(detector.observe(&SignalSample::query_error()).is_none());
        assert!(detector.current_network().is_none());
    }

    #[test]
    fn test_one_trigger_per_association() {
        let mut detector = TransitionDetector::new();

        let samples = [
            SignalSample::disconnected(),
            connected("A"),
            connected("A"),
            connected("B"),
            SignalSample::disconnected(),
        ];

        let triggers: Vec<Trigger> = samples
            .iter()
            .filter_map(|s| detector.observe(s))
            .collect();

        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].identity, "A");
        assert_eq!(triggers[0].kind, TriggerKind::Connected);
        assert_eq!(triggers[1].identity, "B");
        assert_eq!(triggers[1].kind, TriggerKind::Roamed);
    }

    #[test]
    fn test_hidden_network_counts_as_association() {
        let mut detector = TransitionDetector::new();

        // A hidden SSID is still a real association, unlike the
        // disconnected/error sentinels.
        let hidden = SignalSample::connected(60, crate::signal::HIDDEN_NETWORK);
        let trigger = detector.observe(&hidden);
        assert_eq!(trigger.map(|t| t.kind), Some(TriggerKind::Connected));
        assert_eq!(
            detector.current_network(),
            Some(crate::signal::HIDDEN_NETWORK)
        );
    }

    #[test]
    fn test_simulated_sample_has_no_identity() {
        let mut detector = TransitionDetector::new();
        assert!(detector.observe(&SignalSample::simulated(85)).is_none());
        assert!(detector.current_network().is_none());
    }
}
