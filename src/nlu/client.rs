// src/nlu/client.rs

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::NluConfig;
use crate::error::{TellerError, TellerResult};

/// Thin client for an OpenAI-compatible chat-completions API.
///
/// Requests run at temperature 0. Transport and HTTP-level failures surface
/// as retryable errors; response *shape* problems do not - a response whose
/// content cannot be located degrades to an empty string and the caller's
/// salvage parsing takes it from there.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    retry_hint_secs: u64,
}

impl ChatCompletionsClient {
    pub fn new(config: &NluConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            retry_hint_secs: config.retry_hint_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// One system + user exchange, returning the assistant text.
    pub async fn complete(&self, system: &str, user: &str) -> TellerResult<String> {
        let request_body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TellerError::NluUnreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(self.retry_hint_secs);
            return Err(TellerError::NluBusy { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let head: String = body.chars().take(200).collect();
            return Err(TellerError::NluUnreachable(format!(
                "status {status}: {head}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TellerError::NluUnreachable(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        if content.is_empty() {
            debug!("chat completion returned no content; treating as empty");
        }
        Ok(content)
    }
}
