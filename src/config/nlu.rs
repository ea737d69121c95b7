// src/config/nlu.rs
// NLU collaborator configuration (OpenAI-compatible chat-completions API)

use serde::{Deserialize, Serialize};

use super::helpers::{env_or, env_parsed_or};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NluConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Suggested wait when the provider rate-limits without a Retry-After.
    pub retry_hint_secs: u64,
}

impl NluConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env_or("TELLER_NLU_BASE_URL", "https://api.groq.com/openai/v1"),
            api_key: env_or("TELLER_NLU_API_KEY", ""),
            model: env_or("TELLER_NLU_MODEL", "llama-3.3-70b-versatile"),
            timeout_secs: env_parsed_or("TELLER_NLU_TIMEOUT_SECS", 30),
            retry_hint_secs: env_parsed_or("TELLER_NLU_RETRY_HINT_SECS", 300),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
