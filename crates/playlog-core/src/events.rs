//! Event vocabulary and the abstract <-> native mapping table
//!
//! Abstract events are the names the relay reports under. Native events are
//! what the embedded player emits. The mapping between them is fixed:
//!
//! | abstract    | native       |
//! |-------------|--------------|
//! | `started`   | `firstFrame` |
//! | `paused`    | `pause`      |
//! | `seeked`    | `seek`       |
//! | `resumed`   | `play`       |
//! | `completed` | `complete`   |
//! | `failed`    | `error`      |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

/// Player-independent playback event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractEvent {
    Started,
    Paused,
    Seeked,
    Resumed,
    Completed,
    Failed,
}

impl AbstractEvent {
    /// Every abstract event, in mapping-table order
    pub const ALL: [AbstractEvent; 6] = [
        AbstractEvent::Started,
        AbstractEvent::Paused,
        AbstractEvent::Seeked,
        AbstractEvent::Resumed,
        AbstractEvent::Completed,
        AbstractEvent::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbstractEvent::Started => "started",
            AbstractEvent::Paused => "paused",
            AbstractEvent::Seeked => "seeked",
            AbstractEvent::Resumed => "resumed",
            AbstractEvent::Completed => "completed",
            AbstractEvent::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AbstractEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbstractEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AbstractEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| Error::UnknownEvent(s.to_string()))
    }
}

/// Event type emitted by the embedded player
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NativeEventType {
    FirstFrame,
    Pause,
    Seek,
    Play,
    Complete,
    Error,
    SetupError,
    /// Anything the relay has no interest in
    #[default]
    #[serde(other)]
    Other,
}

impl NativeEventType {
    /// Name the player uses when registering a listener
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeEventType::FirstFrame => "firstFrame",
            NativeEventType::Pause => "pause",
            NativeEventType::Seek => "seek",
            NativeEventType::Play => "play",
            NativeEventType::Complete => "complete",
            NativeEventType::Error => "error",
            NativeEventType::SetupError => "setupError",
            NativeEventType::Other => "other",
        }
    }
}

impl std::fmt::Display for NativeEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide mapping between abstract and native events
pub struct EventMapping;

impl EventMapping {
    const TABLE: [(AbstractEvent, NativeEventType); 6] = [
        (AbstractEvent::Started, NativeEventType::FirstFrame),
        (AbstractEvent::Paused, NativeEventType::Pause),
        (AbstractEvent::Seeked, NativeEventType::Seek),
        (AbstractEvent::Resumed, NativeEventType::Play),
        (AbstractEvent::Completed, NativeEventType::Complete),
        (AbstractEvent::Failed, NativeEventType::Error),
    ];

    /// Native event backing an abstract event
    pub fn native(event: AbstractEvent) -> NativeEventType {
        Self::TABLE
            .iter()
            .find(|(abstract_event, _)| *abstract_event == event)
            .map(|(_, native)| native.clone())
            .unwrap_or(NativeEventType::Other)
    }

    /// Abstract event reported for a native event, over the full table
    pub fn abstract_for(native: &NativeEventType) -> Option<AbstractEvent> {
        Self::TABLE
            .iter()
            .find(|(_, candidate)| candidate == native)
            .map(|(abstract_event, _)| *abstract_event)
    }

    /// Resolve a requested event name, failing on names outside the table
    pub fn resolve(name: &str) -> Result<(AbstractEvent, NativeEventType)> {
        let event = AbstractEvent::from_str(name).map_err(|_| Error::UnmappedEvent {
            name: name.to_string(),
        })?;
        Ok((event, Self::native(event)))
    }
}

/// Native -> abstract lookup restricted to the events a caller requested
///
/// Built once at adapter setup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseLookup {
    entries: HashMap<NativeEventType, AbstractEvent>,
}

impl ReverseLookup {
    /// Build from requested event names. Any unmapped name fails the whole build.
    pub fn build<S: AsRef<str>>(requested: &[S]) -> Result<Self> {
        let mut entries = HashMap::with_capacity(requested.len());
        for name in requested {
            let (event, native) = EventMapping::resolve(name.as_ref())?;
            entries.insert(native, event);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, native: &NativeEventType) -> Option<AbstractEvent> {
        self.entries.get(native).copied()
    }

    /// Whether the caller asked for this abstract event
    pub fn is_requested(&self, event: AbstractEvent) -> bool {
        self.entries.values().any(|requested| *requested == event)
    }

    /// Requested events in table order
    pub fn requested(&self) -> BTreeSet<AbstractEvent> {
        self.entries.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reason value marking a play/pause as caused by the viewer
pub const INTERACTION_REASON: &str = "interaction";

/// Event object as emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeEvent {
    #[serde(rename = "type", default)]
    pub kind: NativeEventType,
    /// Why playback started (`play` events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_reason: Option<String>,
    /// Why playback paused (`pause` events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    /// Seek target in seconds (`seek` events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NativeEvent {
    pub fn new(kind: NativeEventType) -> Self {
        Self {
            kind,
            play_reason: None,
            pause_reason: None,
            offset: None,
            code: None,
            message: None,
        }
    }

    pub fn play(reason: impl Into<String>) -> Self {
        Self {
            play_reason: Some(reason.into()),
            ..Self::new(NativeEventType::Play)
        }
    }

    pub fn pause(reason: impl Into<String>) -> Self {
        Self {
            pause_reason: Some(reason.into()),
            ..Self::new(NativeEventType::Pause)
        }
    }

    pub fn seek(offset: f64) -> Self {
        Self {
            offset: Some(offset),
            ..Self::new(NativeEventType::Seek)
        }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
            ..Self::new(NativeEventType::Error)
        }
    }

    pub fn setup_error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(NativeEventType::SetupError)
        }
    }

    /// Interaction reason relevant to this event type, if any
    pub fn interaction_reason(&self) -> Option<&str> {
        match self.kind {
            NativeEventType::Play => self.play_reason.as_deref(),
            NativeEventType::Pause => self.pause_reason.as_deref(),
            _ => None,
        }
    }
}
