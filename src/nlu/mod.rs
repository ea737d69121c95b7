//! NLU collaborator
//!
//! The dialogue core treats natural-language understanding as an opaque
//! service: hand it a prompt, get JSON back, possibly malformed. This module
//! owns the provider trait, the HTTP client behind it, and the parse-with-
//! fallback plumbing that keeps malformed output from ever reaching the
//! state machine.

mod client;
mod json;
mod prompts;
mod types;

pub use client::ChatCompletionsClient;
pub use json::salvage_object;
pub use types::{ExtractedFacts, FALLBACK_TYPE_QUESTION, GuideAction, TypeDecision};

use async_trait::async_trait;
use tracing::warn;

use crate::dialogue::ChatTurn;
use crate::error::TellerResult;
use crate::products::ProductType;

/// How many trailing history turns classification gets to look at.
const CLASSIFY_HISTORY_TAIL: usize = 6;

/// The two calls the dialogue core makes into NLU.
///
/// Implementations must only fail for availability reasons; format problems
/// are theirs to swallow (empty extraction, fallback re-ask).
#[async_trait]
pub trait NluService: Send + Sync {
    /// Extract slot values and eligibility answers from one raw message.
    async fn extract_facts(
        &self,
        product_type: ProductType,
        last_question_key: Option<&str>,
        user_message: &str,
    ) -> TellerResult<ExtractedFacts>;

    /// Map the user's stated goal onto a product type, or ask to clarify.
    async fn classify_product_type(
        &self,
        user_message: &str,
        history: &[ChatTurn],
    ) -> TellerResult<TypeDecision>;
}

/// Production implementation backed by the chat-completions client.
pub struct LlmNlu {
    client: ChatCompletionsClient,
}

impl LlmNlu {
    pub fn new(client: ChatCompletionsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NluService for LlmNlu {
    async fn extract_facts(
        &self,
        product_type: ProductType,
        last_question_key: Option<&str>,
        user_message: &str,
    ) -> TellerResult<ExtractedFacts> {
        let payload = serde_json::json!({
            "product_type": product_type.as_str(),
            "last_question_key": last_question_key.unwrap_or(""),
            "user_message": user_message,
        });

        let text = self
            .client
            .complete(prompts::FACT_PARSER_SYSTEM, &payload.to_string())
            .await?;

        match salvage_object(&text) {
            Some(value) => Ok(ExtractedFacts::from_value(&value)),
            None => {
                warn!("fact extraction returned unparsable output; treating as empty");
                Ok(ExtractedFacts::default())
            }
        }
    }

    async fn classify_product_type(
        &self,
        user_message: &str,
        history: &[ChatTurn],
    ) -> TellerResult<TypeDecision> {
        let tail: Vec<&ChatTurn> = history
            .iter()
            .rev()
            .take(CLASSIFY_HISTORY_TAIL)
            .rev()
            .collect();
        let payload = serde_json::json!({
            "user_message": user_message,
            "history": tail,
        });

        let text = self
            .client
            .complete(prompts::TYPE_ROUTER_SYSTEM, &payload.to_string())
            .await?;

        match salvage_object(&text) {
            Some(value) => Ok(TypeDecision::from_value(&value)),
            None => {
                warn!("type classification returned unparsable output; re-asking");
                Ok(TypeDecision::fallback_ask())
            }
        }
    }
}
