// ── Church assistant ──
//
// Single-turn questions to the generative backend under a fixed persona.
// Callers always get displayable text: any failure becomes the apology.

use tracing::{debug, warn};

use awc_api::AssistantClient;

use crate::config::AssistantConfig;
use crate::error::CoreError;

/// System instruction sent with every question.
pub const PERSONA: &str = "You are the AWC-Connect assistant, a warm and welcoming helper \
for our church community. Answer questions about services, events, ministries, giving and \
getting involved clearly and briefly. Speak with kindness and respect for every faith \
journey. If you do not know something specific to this church, say so and suggest \
contacting the church office rather than guessing. Never give medical, legal or financial \
advice.";

/// Reply used whenever no real answer is available.
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble answering right now. \
Please try again in a moment, or contact the church office for help.";

/// Fixed-persona wrapper around [`AssistantClient`].
#[derive(Debug, Clone)]
pub struct Assistant {
    client: Option<AssistantClient>,
}

impl Assistant {
    /// `None` disables the assistant; every question gets the fallback.
    pub fn new(client: Option<AssistantClient>) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.client()?))
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Ask one question. Never fails: blank prompts, a missing key and any
    /// backend error all yield [`FALLBACK_REPLY`].
    pub async fn ask(&self, prompt: &str) -> String {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            debug!("empty prompt; returning fallback");
            return FALLBACK_REPLY.to_owned();
        }
        let Some(client) = &self.client else {
            debug!("assistant not configured; returning fallback");
            return FALLBACK_REPLY.to_owned();
        };
        match client.generate(PERSONA, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, model = client.model(), "assistant request failed");
                FALLBACK_REPLY.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_assistant_apologizes() {
        let assistant = Assistant::new(None);
        assert!(!assistant.is_enabled());
        assert_eq!(assistant.ask("When is the youth group?").await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn blank_prompt_apologizes() {
        assert_eq!(Assistant::new(None).ask("   ").await, FALLBACK_REPLY);
    }
}
