//! Player abstraction
//!
//! The adapter never talks to a concrete player. Browser builds implement
//! these traits on top of the JavaScript player object; tests use an
//! in-memory fake.

use crate::events::{NativeEvent, NativeEventType};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Page/site location the player is embedded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub i64);

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by [`Player::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Native event callback
pub type NativeHandler = Box<dyn Fn(&NativeEvent)>;

/// Button click callback
pub type ClickHandler = Box<dyn Fn()>;

/// Currently loaded playlist entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Download control shown in the player toolbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadButton {
    /// Icon URL
    pub img: String,
    /// Tooltip text
    pub tttext: String,
}

/// Adapter setup input, as rendered into the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Player-native setup object, passed through untouched
    pub setupdata: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloadbtn: Option<DownloadButton>,
    /// Abstract event names to relay
    #[serde(default)]
    pub events: Vec<String>,
}

/// A single player instance
pub trait Player {
    /// Run the player's own setup routine
    fn setup(&self, setup_data: &serde_json::Value) -> Result<()>;

    /// Attach a listener for a native event
    fn on(&self, event: NativeEventType, handler: NativeHandler) -> ListenerId;

    /// Detach a listener previously returned by [`Player::on`]
    fn off(&self, listener: ListenerId);

    /// Add a toolbar button with the given id
    fn add_button(&self, button: &DownloadButton, id: &str, on_click: ClickHandler);

    fn playlist_item(&self) -> Option<PlaylistItem>;

    /// Playback position in seconds
    fn position(&self) -> f64;
}

/// The page hosting players
pub trait PlayerHost {
    type Player: Player + 'static;

    fn element_exists(&self, element_id: &str) -> bool;

    fn create_player(&self, element_id: &str) -> Result<Self::Player>;

    /// Apply the process-wide license key before any player is set up
    fn set_license_key(&self, key: &str);

    /// Open a resource in a new window
    fn open_url(&self, url: &str);
}
