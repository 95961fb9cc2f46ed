//! JW Player bindings
//!
//! Implements the core [`Player`] / [`PlayerHost`] traits on top of the
//! global `jwplayer` function loaded by the page.

use playlog_core::player::{ClickHandler, NativeHandler};
use playlog_core::{
    DownloadButton, Error, ListenerId, NativeEvent, NativeEventType, Player, PlayerHost,
    PlaylistItem, Result,
};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// A JW Player instance as returned by `jwplayer(id)`
    pub type JwPlayerInstance;

    #[wasm_bindgen(js_name = jwplayer)]
    fn jwplayer(id: &str) -> JwPlayerInstance;

    #[wasm_bindgen(method, catch)]
    fn setup(this: &JwPlayerInstance, config: &JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &JwPlayerInstance, event: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn off(this: &JwPlayerInstance, event: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addButton)]
    fn add_button(
        this: &JwPlayerInstance,
        img: &str,
        tooltip: &str,
        callback: &js_sys::Function,
        id: &str,
    );

    #[wasm_bindgen(method, js_name = getPlaylistItem)]
    fn get_playlist_item(this: &JwPlayerInstance) -> JsValue;

    #[wasm_bindgen(method, js_name = getPosition)]
    fn get_position(this: &JwPlayerInstance) -> f64;
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

struct Listener {
    event: NativeEventType,
    closure: Closure<dyn FnMut(JsValue)>,
}

/// One JW Player instance plus the JS closures registered on it
pub struct JwPlayer {
    instance: JwPlayerInstance,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<u64, Listener>>,
    buttons: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl JwPlayer {
    fn new(instance: JwPlayerInstance) -> Self {
        Self {
            instance,
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
            buttons: RefCell::new(Vec::new()),
        }
    }
}

/// Decode a JW event object; the listener's own type wins when `type` is absent
fn decode_event(kind: &NativeEventType, value: JsValue) -> NativeEvent {
    let mut event = match serde_wasm_bindgen::from_value::<NativeEvent>(value) {
        Ok(event) => event,
        Err(e) => {
            warn!(event = %kind, error = %e, "Undecodable player event");
            NativeEvent::new(kind.clone())
        }
    };
    if event.kind == NativeEventType::Other {
        event.kind = kind.clone();
    }
    event
}

impl Player for JwPlayer {
    fn setup(&self, setup_data: &serde_json::Value) -> Result<()> {
        let config = setup_data
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| Error::PlayerSetup(e.to_string()))?;
        self.instance
            .setup(&config)
            .map_err(|e| Error::PlayerSetup(js_message(&e)))?;
        Ok(())
    }

    fn on(&self, event: NativeEventType, handler: NativeHandler) -> ListenerId {
        let kind = event.clone();
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            handler(&decode_event(&kind, value));
        });
        self.instance
            .on(event.as_str(), closure.as_ref().unchecked_ref());

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .insert(id, Listener { event, closure });
        ListenerId(id)
    }

    fn off(&self, listener: ListenerId) {
        if let Some(Listener { event, closure }) = self.listeners.borrow_mut().remove(&listener.0) {
            self.instance
                .off(event.as_str(), closure.as_ref().unchecked_ref());
        }
    }

    fn add_button(&self, button: &DownloadButton, id: &str, on_click: ClickHandler) {
        let closure = Closure::<dyn FnMut()>::new(move || on_click());
        self.instance.add_button(
            &button.img,
            &button.tttext,
            closure.as_ref().unchecked_ref(),
            id,
        );
        self.buttons.borrow_mut().push(closure);
    }

    fn playlist_item(&self) -> Option<PlaylistItem> {
        let item = self.instance.get_playlist_item();
        if item.is_undefined() || item.is_null() {
            return None;
        }
        serde_wasm_bindgen::from_value(item).ok()
    }

    fn position(&self) -> f64 {
        self.instance.get_position()
    }
}

/// The current page
pub struct BrowserHost {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl BrowserHost {
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| Error::PlayerSetup("no window available".into()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::PlayerSetup("no document available".into()))?;
        Ok(Self { window, document })
    }

    fn jwplayer_global(&self) -> Option<JsValue> {
        js_sys::Reflect::get(&self.window, &JsValue::from_str("jwplayer"))
            .ok()
            .filter(|value| value.is_function())
    }
}

impl PlayerHost for BrowserHost {
    type Player = JwPlayer;

    fn element_exists(&self, element_id: &str) -> bool {
        self.document.get_element_by_id(element_id).is_some()
    }

    fn create_player(&self, element_id: &str) -> Result<JwPlayer> {
        if self.jwplayer_global().is_none() {
            return Err(Error::PlayerSetup("jwplayer library is not loaded".into()));
        }
        Ok(JwPlayer::new(jwplayer(element_id)))
    }

    fn set_license_key(&self, key: &str) {
        let Some(global) = self.jwplayer_global() else {
            warn!("jwplayer library is not loaded, license key not applied");
            return;
        };
        if let Err(e) = js_sys::Reflect::set(&global, &JsValue::from_str("key"), &JsValue::from_str(key)) {
            warn!("Cannot apply license key: {}", js_message(&e));
        }
    }

    fn open_url(&self, url: &str) {
        if let Err(e) = self.window.open_with_url(url) {
            warn!(url, "Cannot open window: {}", js_message(&e));
        }
    }
}
