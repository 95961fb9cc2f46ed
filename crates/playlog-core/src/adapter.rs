//! Player Adapter - binds one player instance to the relay
//!
//! Setup order:
//! 1. target element must exist
//! 2. requested events resolve into an immutable [`ReverseLookup`]
//! 3. license key, player setup, optional download button
//! 4. one listener per requested event (`failed` rides on the error listener)
//! 5. error and setup-error listeners, always
//!
//! Steps 1 and 2 have no side effects, so a configuration error never
//! leaves a half-wired player behind.

use crate::events::{AbstractEvent, EventMapping, NativeEvent, NativeEventType, ReverseLookup};
use crate::filter::{EventFilter, FilterDecision};
use crate::payload::{PayloadBuilder, PlaybackState};
use crate::player::{ContextId, ListenerId, NativeHandler, Player, PlayerHost, PlayerSetup};
use crate::relay::RelayClient;
use crate::{Error, Result};
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn};

/// Query parameter that makes the media server send an attachment
pub const FORCE_DOWNLOAD_PARAM: &str = "forcedownload=true";

/// Button id of the download control
pub const DOWNLOAD_BUTTON_ID: &str = "download";

/// Per-instance relay state shared by the listener closures
struct EventRelay {
    context: ContextId,
    lookup: ReverseLookup,
    relay: Rc<dyn RelayClient>,
}

impl EventRelay {
    fn on_event<P: Player + ?Sized>(&self, player: &P, event: &NativeEvent) {
        if let FilterDecision::Suppress(reason) = EventFilter::decide(event) {
            debug!(event = %event.kind, ?reason, "Event suppressed");
            return;
        }

        let state = PlaybackState::capture(player);
        match PayloadBuilder::event(self.context, &self.lookup, event, &state) {
            Ok(Some(call)) => self.relay.dispatch(call),
            Ok(None) => debug!(event = %event.kind, "Event not requested"),
            Err(e) => error!(event = %event.kind, context = %self.context, error = %e, "Cannot build playback payload"),
        }
    }

    fn on_error<P: Player + ?Sized>(&self, player: &P, event: &NativeEvent) {
        error!(
            code = event.code.unwrap_or_default(),
            "Player error: {}",
            event.message.as_deref().unwrap_or("unknown error")
        );

        if !self.lookup.is_requested(AbstractEvent::Failed) {
            return;
        }

        let state = PlaybackState::capture(player);
        match PayloadBuilder::failure(self.context, event, &state) {
            Ok(call) => self.relay.dispatch(call),
            Err(e) => error!(context = %self.context, error = %e, "Cannot build failure payload"),
        }
    }
}

fn on_setup_error(event: &NativeEvent) {
    error!(
        "Player setup error: {}",
        event.message.as_deref().unwrap_or("unknown error")
    );
}

/// Append the forced-download parameter to a media URL
pub fn download_url(file: &str) -> String {
    let separator = if file.contains('?') { '&' } else { '?' };
    format!("{file}{separator}{FORCE_DOWNLOAD_PARAM}")
}

/// A player instance wired to the relay
pub struct PlayerAdapter<P: Player + 'static> {
    player: Rc<P>,
    shared: Rc<EventRelay>,
    subscriptions: Vec<ListenerId>,
}

impl<P: Player + 'static> PlayerAdapter<P> {
    /// Create and wire a player in `element_id`
    pub fn setup<H>(
        host: Rc<H>,
        setup: &PlayerSetup,
        element_id: &str,
        context: ContextId,
        license_key: Option<&str>,
        relay: Rc<dyn RelayClient>,
    ) -> Result<Self>
    where
        H: PlayerHost<Player = P> + 'static,
    {
        if !host.element_exists(element_id) {
            let err = Error::MissingTarget {
                element: element_id.to_string(),
            };
            error!("Player setup error: {err}");
            return Err(err);
        }

        let lookup = ReverseLookup::build(setup.events.as_slice()).inspect_err(|e| {
            error!(element = element_id, "Player setup error: {e}");
        })?;

        if let Some(key) = license_key {
            host.set_license_key(key);
        }

        let player = Rc::new(host.create_player(element_id)?);
        player.setup(&setup.setupdata)?;

        if let Some(ref button) = setup.downloadbtn {
            let weak_player = Rc::downgrade(&player);
            let host = Rc::clone(&host);
            player.add_button(
                button,
                DOWNLOAD_BUTTON_ID,
                Box::new(move || {
                    let file = weak_player
                        .upgrade()
                        .and_then(|player| player.playlist_item())
                        .and_then(|item| item.file);
                    match file {
                        Some(file) => host.open_url(&download_url(&file)),
                        None => warn!("Download requested with no playlist item loaded"),
                    }
                }),
            );
        }

        let mut adapter = Self {
            player,
            shared: Rc::new(EventRelay { context, lookup, relay }),
            subscriptions: Vec::new(),
        };

        for event in adapter.shared.lookup.requested() {
            if event == AbstractEvent::Failed {
                continue;
            }
            let (player, shared) = (adapter.weak_player(), Rc::clone(&adapter.shared));
            adapter.subscribe(
                EventMapping::native(event),
                Box::new(move |native: &NativeEvent| {
                    if let Some(player) = player.upgrade() {
                        shared.on_event(player.as_ref(), native);
                    }
                }),
            );
        }

        let (player, shared) = (adapter.weak_player(), Rc::clone(&adapter.shared));
        adapter.subscribe(
            NativeEventType::Error,
            Box::new(move |native: &NativeEvent| {
                if let Some(player) = player.upgrade() {
                    shared.on_error(player.as_ref(), native);
                }
            }),
        );
        adapter.subscribe(NativeEventType::SetupError, Box::new(on_setup_error));

        info!(
            element = element_id,
            context = %context,
            events = ?adapter.shared.lookup.requested(),
            listeners = adapter.subscriptions.len(),
            "Player adapter ready"
        );

        Ok(adapter)
    }

    fn weak_player(&self) -> Weak<P> {
        Rc::downgrade(&self.player)
    }

    fn subscribe(&mut self, event: NativeEventType, handler: NativeHandler) {
        let id = self.player.on(event, handler);
        self.subscriptions.push(id);
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn context(&self) -> ContextId {
        self.shared.context
    }

    pub fn lookup(&self) -> &ReverseLookup {
        &self.shared.lookup
    }

    /// Listeners currently attached by this adapter
    pub fn subscriptions(&self) -> &[ListenerId] {
        &self.subscriptions
    }

    /// Remove every listener this adapter attached
    pub fn detach(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        for id in self.subscriptions.drain(..) {
            self.player.off(id);
        }
        debug!(context = %self.shared.context, "Player adapter detached");
    }
}

impl<P: Player + 'static> Drop for PlayerAdapter<P> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url() {
        assert_eq!(
            download_url("https://cdn.example.com/v.mp4"),
            "https://cdn.example.com/v.mp4?forcedownload=true"
        );
        assert_eq!(
            download_url("/pluginfile.php/12/v.mp4?token=abc"),
            "/pluginfile.php/12/v.mp4?token=abc&forcedownload=true"
        );
    }
}
