//! Relay payloads
//!
//! One [`RelayCall`] is built per reported event from the native event and
//! a snapshot of the player. The same types are the endpoint's wire format.

use crate::events::{AbstractEvent, NativeEvent, NativeEventType, ReverseLookup};
use crate::player::{ContextId, Player, PlaylistItem};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the `playback_event` remote operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEventParams {
    pub context: i64,
    /// Abstract event name
    pub event: String,
    pub title: String,
    #[serde(default)]
    pub position: i64,
    /// Seek target, only sent for seek events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// Parameters of the `playback_failed` remote operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackFailedParams {
    pub context: i64,
    pub title: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// A single remote call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "methodname", content = "args", rename_all = "snake_case")]
pub enum RelayCall {
    PlaybackEvent(PlaybackEventParams),
    PlaybackFailed(PlaybackFailedParams),
}

impl RelayCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            RelayCall::PlaybackEvent(_) => "playback_event",
            RelayCall::PlaybackFailed(_) => "playback_failed",
        }
    }

    pub fn context(&self) -> i64 {
        match self {
            RelayCall::PlaybackEvent(params) => params.context,
            RelayCall::PlaybackFailed(params) => params.context,
        }
    }
}

/// Player state captured at the moment an event is handled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub item: Option<PlaylistItem>,
    pub position: f64,
}

impl PlaybackState {
    pub fn capture<P: Player + ?Sized>(player: &P) -> Self {
        Self {
            item: player.playlist_item(),
            position: player.position(),
        }
    }

    /// Title of the current item, falling back to its file
    pub fn title(&self) -> Result<String> {
        let item = self.item.as_ref().ok_or(Error::MissingTitle)?;
        item.title
            .as_ref()
            .or(item.file.as_ref())
            .cloned()
            .ok_or(Error::MissingTitle)
    }
}

/// Truncate seconds toward zero; non-finite values become 0
pub fn whole_seconds(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Build the `playback_event` call for a mapped, non-error event.
    /// Returns `Ok(None)` when the native event was not requested.
    pub fn event(
        context: ContextId,
        lookup: &ReverseLookup,
        event: &NativeEvent,
        state: &PlaybackState,
    ) -> Result<Option<RelayCall>> {
        let Some(abstract_event) = lookup.get(&event.kind) else {
            return Ok(None);
        };
        if abstract_event == AbstractEvent::Failed {
            return Ok(None);
        }

        let offset = match event.kind {
            NativeEventType::Seek => Some(whole_seconds(event.offset.unwrap_or_default())),
            _ => None,
        };

        Ok(Some(RelayCall::PlaybackEvent(PlaybackEventParams {
            context: context.0,
            event: abstract_event.as_str().to_string(),
            title: state.title()?,
            position: whole_seconds(state.position),
            offset,
        })))
    }

    /// Build the `playback_failed` call for a native error event
    pub fn failure(context: ContextId, event: &NativeEvent, state: &PlaybackState) -> Result<RelayCall> {
        Ok(RelayCall::PlaybackFailed(PlaybackFailedParams {
            context: context.0,
            title: state.title()?,
            position: whole_seconds(state.position),
            code: event.code.unwrap_or_default(),
            message: event.message.clone().unwrap_or_default(),
        }))
    }
}
