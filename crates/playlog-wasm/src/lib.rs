//! Playlog WASM - playback relay for JW Player pages
//!
//! Wires a JW Player instance to the playlog service route:
//! - Event mapping and interaction filtering from `playlog-core`
//! - Fetch-based relay calls
//! - `tracing` output to the browser console
//!
//! ## Page integration
//!
//! ```javascript
//! import init, { configure, setup_player } from '@playlog/wasm';
//!
//! await init();
//! configure({ license_key: 'KEY', relay: { endpoint: '/service', token: 'TOKEN' } });
//! const player = setup_player(
//!   { setupdata: { file: '/media/intro.mp4' }, events: ['started', 'completed'] },
//!   'player-1',
//!   42,
//! );
//! ```

use playlog_core::{ContextId, Error, PlayerAdapter, PlayerSetup, PlaylogConfig};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::Level;
use wasm_bindgen::prelude::*;

mod console;
mod jwplayer;
mod relay;

pub use jwplayer::{BrowserHost, JwPlayer};
pub use relay::FetchRelayClient;

thread_local! {
    static CONFIG: RefCell<PlaylogConfig> = RefCell::new(PlaylogConfig::default());
}

fn to_js(err: Error) -> JsValue {
    js_sys::Error::new(&format!("{}: {}", err.error_code(), err)).into()
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::install(Level::INFO);
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    playlog_core::VERSION.to_string()
}

/// Set the page-wide configuration (license key, relay endpoint and token)
#[wasm_bindgen]
pub fn configure(config: JsValue) -> Result<(), JsValue> {
    let config: PlaylogConfig = serde_wasm_bindgen::from_value(config)?;
    config.relay.endpoint_url().map_err(to_js)?;
    CONFIG.with(|current| *current.borrow_mut() = config);
    Ok(())
}

/// Create a player in `element_id` and relay its events for `context`
#[wasm_bindgen]
pub fn setup_player(setup: JsValue, element_id: &str, context: i32) -> Result<PlaylogPlayer, JsValue> {
    let setup: PlayerSetup = serde_wasm_bindgen::from_value(setup)?;
    let config = CONFIG.with(|current| current.borrow().clone());

    let host = Rc::new(BrowserHost::new().map_err(to_js)?);
    let relay = Rc::new(FetchRelayClient::new(&config.relay).map_err(to_js)?);
    let adapter = PlayerAdapter::setup(
        host,
        &setup,
        element_id,
        ContextId(i64::from(context)),
        config.license_key(),
        relay,
    )
    .map_err(to_js)?;

    Ok(PlaylogPlayer { adapter })
}

/// A configured player; dropping it (or calling `detach`) removes its listeners
#[wasm_bindgen]
pub struct PlaylogPlayer {
    adapter: PlayerAdapter<JwPlayer>,
}

#[wasm_bindgen]
impl PlaylogPlayer {
    /// Remove every listener this player registered
    pub fn detach(&mut self) {
        self.adapter.detach();
    }

    #[wasm_bindgen(getter)]
    pub fn context(&self) -> f64 {
        self.adapter.context().0 as f64
    }

    /// Abstract events being relayed
    #[wasm_bindgen(getter)]
    pub fn events(&self) -> Vec<String> {
        self.adapter
            .lookup()
            .requested()
            .into_iter()
            .map(|event| event.as_str().to_string())
            .collect()
    }

    /// Number of active listener subscriptions
    #[wasm_bindgen(getter)]
    pub fn listeners(&self) -> usize {
        self.adapter.subscriptions().len()
    }
}
