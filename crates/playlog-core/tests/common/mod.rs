//! Test doubles: an in-memory player host and a recording relay

#![allow(dead_code)]

use playlog_core::player::{ClickHandler, NativeHandler};
use playlog_core::{
    DownloadButton, Error, ListenerId, NativeEvent, NativeEventType, Player, PlayerHost,
    PlaylistItem, RelayCall, RelayClient, Result,
};
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

type Listener = (ListenerId, NativeEventType, Rc<dyn Fn(&NativeEvent)>);

#[derive(Default)]
pub struct FakePlayer {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
    buttons: RefCell<Vec<(DownloadButton, String, Rc<dyn Fn()>)>>,
    item: RefCell<Option<PlaylistItem>>,
    position: Cell<f64>,
    setup_data: RefCell<Option<serde_json::Value>>,
    fail_setup: bool,
}

impl FakePlayer {
    pub fn load(&self, title: Option<&str>, file: Option<&str>) {
        *self.item.borrow_mut() = Some(PlaylistItem {
            title: title.map(str::to_string),
            file: file.map(str::to_string),
        });
    }

    pub fn set_position(&self, position: f64) {
        self.position.set(position);
    }

    /// Deliver a native event to every matching listener
    pub fn fire(&self, event: NativeEvent) {
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(&event);
        }
    }

    pub fn click(&self, id: &str) {
        let handler = self
            .buttons
            .borrow()
            .iter()
            .find(|(_, button_id, _)| button_id == id)
            .map(|(_, _, handler)| Rc::clone(handler));
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listens_to(&self, kind: &NativeEventType) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, listened, _)| listened == kind)
            .count()
    }

    pub fn buttons(&self) -> Vec<(DownloadButton, String)> {
        self.buttons
            .borrow()
            .iter()
            .map(|(button, id, _)| (button.clone(), id.clone()))
            .collect()
    }

    pub fn setup_data(&self) -> Option<serde_json::Value> {
        self.setup_data.borrow().clone()
    }
}

impl Player for FakePlayer {
    fn setup(&self, setup_data: &serde_json::Value) -> Result<()> {
        if self.fail_setup {
            return Err(Error::PlayerSetup("player library not loaded".into()));
        }
        *self.setup_data.borrow_mut() = Some(setup_data.clone());
        Ok(())
    }

    fn on(&self, event: NativeEventType, handler: NativeHandler) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, event, Rc::from(handler)));
        id
    }

    fn off(&self, listener: ListenerId) {
        self.listeners.borrow_mut().retain(|(id, _, _)| *id != listener);
    }

    fn add_button(&self, button: &DownloadButton, id: &str, on_click: ClickHandler) {
        self.buttons
            .borrow_mut()
            .push((button.clone(), id.to_string(), Rc::from(on_click)));
    }

    fn playlist_item(&self) -> Option<PlaylistItem> {
        self.item.borrow().clone()
    }

    fn position(&self) -> f64 {
        self.position.get()
    }
}

pub struct FakeHost {
    elements: Vec<String>,
    pub license_key: RefCell<Option<String>>,
    pub opened: RefCell<Vec<String>>,
    pub players_created: Cell<usize>,
    pub fail_setup: bool,
}

impl FakeHost {
    pub fn with_elements(elements: &[&str]) -> Rc<Self> {
        Self::build(elements, false)
    }

    /// Host whose players reject their setup data
    pub fn failing_setup(elements: &[&str]) -> Rc<Self> {
        Self::build(elements, true)
    }

    fn build(elements: &[&str], fail_setup: bool) -> Rc<Self> {
        Rc::new(Self {
            elements: elements.iter().map(|e| e.to_string()).collect(),
            license_key: RefCell::new(None),
            opened: RefCell::new(Vec::new()),
            players_created: Cell::new(0),
            fail_setup,
        })
    }
}

impl PlayerHost for FakeHost {
    type Player = FakePlayer;

    fn element_exists(&self, element_id: &str) -> bool {
        self.elements.iter().any(|e| e == element_id)
    }

    fn create_player(&self, _element_id: &str) -> Result<FakePlayer> {
        self.players_created.set(self.players_created.get() + 1);
        Ok(FakePlayer {
            fail_setup: self.fail_setup,
            ..Default::default()
        })
    }

    fn set_license_key(&self, key: &str) {
        *self.license_key.borrow_mut() = Some(key.to_string());
    }

    fn open_url(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

#[derive(Default)]
pub struct RecordingRelay {
    calls: RefCell<Vec<RelayCall>>,
}

impl RecordingRelay {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<RelayCall> {
        self.calls.borrow().clone()
    }
}

impl RelayClient for RecordingRelay {
    fn dispatch(&self, call: RelayCall) {
        self.calls.borrow_mut().push(call);
    }
}

/// Captures formatted log output for assertions
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().lines().filter(|line| line.contains(needle)).count()
    }

    /// Run `f` with an ERROR-level subscriber writing into this capture
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::ERROR)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
