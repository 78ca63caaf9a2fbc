//! Ollama-backed relay implementation.
//!
//! Speaks the `/api/chat` request/response exchange of a locally hosted
//! Ollama server. Every failure is mapped to the firewall's opaque
//! relay error; the core never learns about HTTP.

use std::time::Duration;

use leakgate::{BackendRelay, FirewallError, Message, Result};
use serde_json::json;

/// Generous ceiling for slow local models.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A relay that talks to an Ollama chat endpoint.
#[derive(Debug, Clone)]
pub struct OllamaRelay {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaRelay {
    /// Create a relay for the given server and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| FirewallError::Relay(format!("building HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// The model this relay targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl BackendRelay for OllamaRelay {
    async fn complete(&self, system_prompt: &str, history: &[Message]) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(json!({ "role": "system", "content": system_prompt }));
        for message in history {
            messages.push(json!({
                "role": message.role.to_string(),
                "content": message.content,
            }));
        }

        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                FirewallError::Relay(format!(
                    "cannot reach the model server at {} (is it running?): {err}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FirewallError::Relay(format!(
                "model server returned {status}: {detail}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| FirewallError::Relay(format!("malformed model response: {err}")))?;

        Ok(payload["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}
