//! Playback audit records
//!
//! Every abstract event has one record kind. Records are validated on
//! creation and handed to an [`EventLog`] for persistence.

use crate::events::AbstractEvent;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// CRUD class of the logged action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crud {
    Create,
    Read,
    Update,
    Delete,
}

/// Educational level of the logged action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EduLevel {
    Other,
    Participating,
    Teaching,
}

/// Extra data attached to a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    pub title: Option<String>,
    #[serde(default)]
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Inputs for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub kind: AbstractEvent,
    pub context_id: i64,
    pub user_id: i64,
    pub other: RecordData,
}

/// A persisted playback event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    pub id: Uuid,
    pub kind: AbstractEvent,
    pub context_id: i64,
    pub user_id: i64,
    pub other: RecordData,
    pub crud: Crud,
    pub edu_level: EduLevel,
    pub time_created: DateTime<Utc>,
}

impl PlaybackRecord {
    pub fn create(new: NewRecord) -> Result<Self> {
        if new.other.title.is_none() {
            return Err(Error::MissingField {
                record: record_name(new.kind),
                field: "title",
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            kind: new.kind,
            context_id: new.context_id,
            user_id: new.user_id,
            other: new.other,
            crud: Crud::Read,
            edu_level: EduLevel::Participating,
            time_created: Utc::now(),
        })
    }

    /// Human readable event name
    pub fn name(&self) -> &'static str {
        match self.kind {
            AbstractEvent::Started => "Playback started",
            AbstractEvent::Paused => "Playback paused",
            AbstractEvent::Seeked => "Playback seeked",
            AbstractEvent::Resumed => "Playback resumed",
            AbstractEvent::Completed => "Playback completed",
            AbstractEvent::Failed => "Playback failed",
        }
    }

    /// Admin-facing description
    pub fn description(&self) -> String {
        let title = self.other.title.as_deref().unwrap_or_default();
        let user = self.user_id;
        let position = self.other.position;

        match self.kind {
            AbstractEvent::Started => {
                format!("The user with id {user} has started playback of the video '{title}'")
            }
            AbstractEvent::Paused => format!(
                "The user with id {user} has paused playback of the video '{title}' at {position}s"
            ),
            AbstractEvent::Seeked => {
                let mut line = format!(
                    "The user with id {user} has seeked the video '{title}' from {position}s"
                );
                if let Some(offset) = self.other.offset {
                    line.push_str(&format!(" to {offset}s"));
                }
                line
            }
            AbstractEvent::Resumed => format!(
                "The user with id {user} has resumed playback of the video '{title}' from {position}s"
            ),
            AbstractEvent::Completed => {
                format!("The user with id {user} has completed playback of the video '{title}'")
            }
            AbstractEvent::Failed => format!(
                "Playback of the video '{title}' failed for the user with id {user} at {position}s with error {}: {}",
                self.other.code.unwrap_or_default(),
                self.other.message.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Record kind identifier used in logs and validation errors
pub fn record_name(kind: AbstractEvent) -> &'static str {
    match kind {
        AbstractEvent::Started => "playback_started",
        AbstractEvent::Paused => "playback_paused",
        AbstractEvent::Seeked => "playback_seeked",
        AbstractEvent::Resumed => "playback_resumed",
        AbstractEvent::Completed => "playback_completed",
        AbstractEvent::Failed => "playback_failed",
    }
}

/// Sink for playback records
#[async_trait]
pub trait EventLog: Send + Sync {
    async fn trigger(&self, record: PlaybackRecord) -> Result<()>;

    /// Stored records for a context, oldest first
    async fn records(&self, context_id: i64) -> Vec<PlaybackRecord>;
}

/// In-process event log
#[derive(Default)]
pub struct MemoryEventLog {
    records: RwLock<Vec<PlaybackRecord>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn trigger(&self, record: PlaybackRecord) -> Result<()> {
        info!(
            record = record_name(record.kind),
            context = record.context_id,
            user = record.user_id,
            "{}",
            record.description()
        );
        self.records.write().await.push(record);
        Ok(())
    }

    async fn records(&self, context_id: i64) -> Vec<PlaybackRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| record.context_id == context_id)
            .cloned()
            .collect()
    }
}
