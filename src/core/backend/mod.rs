//! HTTP client for the chat backend: one JSON `POST /chat` per prompt.

mod error;
mod payload;

pub use error::BackendError;
pub use payload::{ChatPayload, ChatReply};

use error::status_error;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::core::config::Config;

/// Client bound to one backend. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    chat_url: Url,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(BackendError::Connect)?;
        Ok(Self {
            http,
            chat_url: chat_endpoint(&config.backend_url),
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Send one prompt and wait for the reply. A cancelled token wins over the request.
    pub async fn send(
        &self,
        payload: &ChatPayload,
        cancel: Option<&CancellationToken>,
    ) -> Result<ChatReply, BackendError> {
        let exchange = self.exchange(payload);
        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::debug!("Request for chat {} cancelled", payload.chat_id);
                        Err(BackendError::Cancelled)
                    }
                    result = exchange => result,
                }
            }
            None => exchange.await,
        }
    }

    async fn exchange(&self, payload: &ChatPayload) -> Result<ChatReply, BackendError> {
        log::debug!(
            "POST {} (user {}, chat {}, provider {})",
            self.chat_url,
            payload.user_id,
            payload.chat_id,
            payload.provider.as_deref().unwrap_or("default")
        );
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(payload)
            .send()
            .await
            .map_err(BackendError::Connect)?;
        let status = response.status();
        let body = response.text().await.map_err(BackendError::Connect)?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// `<base>/chat`, keeping any path prefix on the base URL.
fn chat_endpoint(base: &Url) -> Url {
    let mut url = base.clone();
    let path = format!("{}/chat", base.path().trim_end_matches('/'));
    url.set_path(&path);
    url
}
