//! Remote endpoint - the server half of the relay
//!
//! Exposes `playback_event` and `playback_failed`. Each call resolves the
//! context, authorizes the caller, maps the event name onto a record kind
//! and persists the record.

use crate::config::{ContextConfig, PlaylogConfig};
use crate::events::AbstractEvent;
use crate::payload::{PlaybackEventParams, PlaybackFailedParams, RelayCall};
use crate::records::{EventLog, NewRecord, PlaybackRecord, RecordData};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Resolved context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub id: i64,
    pub name: String,
    members: Vec<i64>,
    open: bool,
}

impl Context {
    pub fn allows(&self, user: UserId) -> bool {
        self.open || self.members.contains(&user.0)
    }
}

impl From<&ContextConfig> for Context {
    fn from(config: &ContextConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            members: config.members.clone(),
            open: config.open,
        }
    }
}

/// Empty result of a remote operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Known contexts and credentials
#[derive(Debug, Clone, Default)]
pub struct ContextDirectory {
    contexts: HashMap<i64, Context>,
    tokens: HashMap<String, UserId>,
}

impl ContextDirectory {
    pub fn from_config(config: &PlaylogConfig) -> Self {
        Self {
            contexts: config.contexts.iter().map(|c| (c.id, Context::from(c))).collect(),
            tokens: config
                .users
                .iter()
                .map(|u| (u.token.clone(), UserId(u.id)))
                .collect(),
        }
    }

    pub fn resolve(&self, id: i64) -> Result<&Context> {
        self.contexts.get(&id).ok_or(Error::ContextNotFound(id))
    }

    /// Resolve a context the user may log events in
    pub fn validate_context(&self, id: i64, user: UserId) -> Result<&Context> {
        let context = self.resolve(id)?;
        if !context.allows(user) {
            return Err(Error::AccessDenied {
                user: user.0,
                context: id,
            });
        }
        Ok(context)
    }

    pub fn authenticate(&self, token: &str) -> Result<UserId> {
        self.tokens.get(token).copied().ok_or(Error::Unauthenticated)
    }
}

/// Playback endpoint service
#[derive(Clone)]
pub struct PlaybackService {
    directory: Arc<ContextDirectory>,
    log: Arc<dyn EventLog>,
}

impl PlaybackService {
    pub fn new(directory: ContextDirectory, log: Arc<dyn EventLog>) -> Self {
        Self {
            directory: Arc::new(directory),
            log,
        }
    }

    pub fn directory(&self) -> &ContextDirectory {
        &self.directory
    }

    pub fn log(&self) -> &Arc<dyn EventLog> {
        &self.log
    }

    /// Route a decoded remote call
    pub async fn call(&self, user: UserId, call: RelayCall) -> Result<Empty> {
        match call {
            RelayCall::PlaybackEvent(params) => self.playback_event(user, params).await,
            RelayCall::PlaybackFailed(params) => self.playback_failed(user, params).await,
        }
    }

    /// Record a playback event
    #[instrument(skip(self, params), fields(context = params.context, event = %params.event))]
    pub async fn playback_event(&self, user: UserId, params: PlaybackEventParams) -> Result<Empty> {
        let context = self.directory.validate_context(params.context, user)?;

        let kind: AbstractEvent = params.event.parse()?;
        if kind == AbstractEvent::Failed {
            return Err(Error::UnknownEvent(params.event));
        }

        let record = PlaybackRecord::create(NewRecord {
            kind,
            context_id: context.id,
            user_id: user.0,
            other: RecordData {
                title: Some(params.title),
                position: params.position,
                offset: Some(params.offset.unwrap_or_default()),
                ..Default::default()
            },
        })?;

        self.log.trigger(record).await?;
        debug!("Playback event recorded");
        Ok(Empty {})
    }

    /// Record a playback failure
    #[instrument(skip(self, params), fields(context = params.context, code = params.code))]
    pub async fn playback_failed(&self, user: UserId, params: PlaybackFailedParams) -> Result<Empty> {
        let context = self.directory.validate_context(params.context, user)?;

        let record = PlaybackRecord::create(NewRecord {
            kind: AbstractEvent::Failed,
            context_id: context.id,
            user_id: user.0,
            other: RecordData {
                title: Some(params.title),
                position: params.position,
                code: Some(params.code),
                message: Some(params.message),
                ..Default::default()
            },
        })?;

        self.log.trigger(record).await?;
        debug!("Playback failure recorded");
        Ok(Empty {})
    }

    /// Records of a context the user may see
    pub async fn records(&self, user: UserId, context: i64) -> Result<Vec<PlaybackRecord>> {
        let context = self.directory.validate_context(context, user)?;
        Ok(self.log.records(context.id).await)
    }
}
