//! Playlog Core - Playback event relay for embedded video players
//!
//! This crate provides the pieces between a player and the audit log:
//! - Abstract <-> native event mapping
//! - Player adapter with explicit listener subscriptions
//! - Event filtering (user interaction vs. programmatic play/pause)
//! - Payload building from player state
//! - Fire-and-forget relay clients
//! - Audit records and the remote endpoint service (`server` feature)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  native   ┌──────────────┐  payload  ┌──────────────┐
//! │    Player    ├──────────►│    Event     ├──────────►│    Relay     │
//! │   (native)   │  events   │    Filter    │           │    Client    │
//! └──────▲───────┘           └──────────────┘           └──────┬───────┘
//!        │ listeners                                           │ RPC
//! ┌──────┴───────┐                                      ┌──────▼───────┐
//! │    Player    │                                      │   Playback   │
//! │   Adapter    │                                      │   Service    │
//! └──────────────┘                                      └──────┬───────┘
//!                                                              │
//!                                                       ┌──────▼───────┐
//!                                                       │  Event Log   │
//!                                                       └──────────────┘
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod payload;
pub mod player;
pub mod relay;

#[cfg(feature = "server")]
pub mod endpoint;
#[cfg(feature = "server")]
pub mod records;

pub use adapter::PlayerAdapter;
pub use config::{PlaylogConfig, RelayConfig};
pub use error::{Error, Result};
pub use events::{AbstractEvent, EventMapping, NativeEvent, NativeEventType, ReverseLookup};
pub use filter::{EventFilter, FilterDecision};
pub use payload::{PayloadBuilder, PlaybackEventParams, PlaybackFailedParams, PlaybackState, RelayCall};
pub use player::{ContextId, DownloadButton, ListenerId, Player, PlayerHost, PlayerSetup, PlaylistItem};
pub use relay::RelayClient;

#[cfg(feature = "http")]
pub use relay::HttpRelayClient;

#[cfg(feature = "server")]
pub use endpoint::{ContextDirectory, PlaybackService, UserId};
#[cfg(feature = "server")]
pub use records::{EventLog, MemoryEventLog, PlaybackRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
