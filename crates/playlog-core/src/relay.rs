//! Relay clients
//!
//! A relay dispatches one remote call per qualifying event and returns
//! immediately. Failures are logged where they happen; nothing is retried
//! or queued, and nothing flows back to the player.

use crate::payload::RelayCall;

/// Fire-and-forget dispatcher for relay calls
pub trait RelayClient {
    fn dispatch(&self, call: RelayCall);
}

impl<R: RelayClient + ?Sized> RelayClient for std::rc::Rc<R> {
    fn dispatch(&self, call: RelayCall) {
        (**self).dispatch(call)
    }
}

impl<R: RelayClient + ?Sized> RelayClient for std::sync::Arc<R> {
    fn dispatch(&self, call: RelayCall) {
        (**self).dispatch(call)
    }
}

#[cfg(feature = "http")]
pub use http::HttpRelayClient;

#[cfg(feature = "http")]
mod http {
    use super::RelayClient;
    use crate::config::RelayConfig;
    use crate::payload::RelayCall;
    use crate::{Error, Result};
    use reqwest::Client;
    use std::time::Duration;
    use tracing::{debug, error};
    use url::Url;

    /// Relay over HTTP, spawned onto the current tokio runtime
    #[derive(Clone)]
    pub struct HttpRelayClient {
        client: Client,
        endpoint: Url,
        token: Option<String>,
    }

    impl HttpRelayClient {
        pub fn new(config: &RelayConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()?;

            Ok(Self {
                client,
                endpoint: config.endpoint_url()?,
                token: config.token.clone(),
            })
        }

        pub fn endpoint(&self) -> &Url {
            &self.endpoint
        }

        /// Perform the call and wait for the response
        pub async fn send(&self, call: &RelayCall) -> Result<()> {
            let mut request = self.client.post(self.endpoint.clone()).json(call);
            if let Some(ref token) = self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Transport(format!("{status}: {body}")));
            }

            Ok(())
        }
    }

    impl RelayClient for HttpRelayClient {
        fn dispatch(&self, call: RelayCall) {
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                error!(method = call.method_name(), "No async runtime, relay call dropped");
                return;
            };

            let relay = self.clone();
            runtime.spawn(async move {
                match relay.send(&call).await {
                    Ok(()) => debug!(method = call.method_name(), context = call.context(), "Relayed"),
                    Err(e) => error!(
                        method = call.method_name(),
                        context = call.context(),
                        error = %e,
                        "Relay call failed"
                    ),
                }
            });
        }
    }
}
