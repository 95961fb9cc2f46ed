//! Relay over the browser fetch API

use playlog_core::{RelayCall, RelayClient, RelayConfig, Result};
use tracing::{debug, error};
use url::Url;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// Posts each call to the service route from a local task
pub struct FetchRelayClient {
    endpoint: Url,
    token: Option<String>,
}

impl FetchRelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        Ok(Self {
            endpoint: config.endpoint_url()?,
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, body: &str) -> std::result::Result<Request, JsValue> {
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        if let Some(token) = &self.token {
            headers.set("Authorization", &format!("Bearer {token}"))?;
        }

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
        Request::new_with_str_and_init(self.endpoint.as_str(), &init)
    }
}

async fn send(request: Request) -> std::result::Result<u16, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if response.ok() {
        Ok(response.status())
    } else {
        Err(JsValue::from_str(&format!("status {}", response.status())))
    }
}

impl RelayClient for FetchRelayClient {
    fn dispatch(&self, call: RelayCall) {
        let method = call.method_name();
        let body = match serde_json::to_string(&call) {
            Ok(body) => body,
            Err(e) => {
                error!(method, "Cannot encode relay call: {}", e);
                return;
            }
        };
        let request = match self.request(&body) {
            Ok(request) => request,
            Err(e) => {
                error!(method, "Cannot build relay request: {:?}", e);
                return;
            }
        };

        wasm_bindgen_futures::spawn_local(async move {
            match send(request).await {
                Ok(status) => debug!(method, status, "Relay call delivered"),
                Err(e) => error!(method, "Relay call failed: {:?}", e),
            }
        });
    }
}
