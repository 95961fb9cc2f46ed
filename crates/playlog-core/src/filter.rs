//! Event filter
//!
//! Programmatic play/pause (autostart, buffering, API calls) is not viewer
//! activity and is dropped before a payload is ever built.

use crate::events::{NativeEvent, NativeEventType, INTERACTION_REASON};

/// Outcome of filtering one native event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Relay,
    Suppress(SuppressReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// play/pause with a reason other than direct interaction
    NotInteractive { reason: Option<String> },
}

impl FilterDecision {
    pub fn is_relay(&self) -> bool {
        matches!(self, FilterDecision::Relay)
    }
}

pub struct EventFilter;

impl EventFilter {
    pub fn decide(event: &NativeEvent) -> FilterDecision {
        match event.kind {
            NativeEventType::Play | NativeEventType::Pause => {
                match event.interaction_reason() {
                    Some(INTERACTION_REASON) => FilterDecision::Relay,
                    other => FilterDecision::Suppress(SuppressReason::NotInteractive {
                        reason: other.map(str::to_string),
                    }),
                }
            }
            _ => FilterDecision::Relay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_requires_interaction() {
        assert!(EventFilter::decide(&NativeEvent::play("interaction")).is_relay());
        assert_eq!(
            EventFilter::decide(&NativeEvent::play("autostart")),
            FilterDecision::Suppress(SuppressReason::NotInteractive {
                reason: Some("autostart".into())
            })
        );
        assert!(!EventFilter::decide(&NativeEvent::new(NativeEventType::Play)).is_relay());
    }

    #[test]
    fn test_pause_requires_interaction() {
        assert!(EventFilter::decide(&NativeEvent::pause("interaction")).is_relay());
        assert!(!EventFilter::decide(&NativeEvent::pause("external")).is_relay());
    }

    #[test]
    fn test_pause_ignores_play_reason() {
        let mut event = NativeEvent::new(NativeEventType::Pause);
        event.play_reason = Some("interaction".into());
        assert!(!EventFilter::decide(&event).is_relay());
    }

    #[test]
    fn test_other_events_pass() {
        assert!(EventFilter::decide(&NativeEvent::seek(3.0)).is_relay());
        assert!(EventFilter::decide(&NativeEvent::new(NativeEventType::FirstFrame)).is_relay());
        assert!(EventFilter::decide(&NativeEvent::new(NativeEventType::Complete)).is_relay());
        assert!(EventFilter::decide(&NativeEvent::error(100, "boom")).is_relay());
    }
}
