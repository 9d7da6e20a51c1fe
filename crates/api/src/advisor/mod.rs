//! AI supplement advisor collaborator.
//!
//! The chat endpoint forwards user questions, together with a compact
//! profile and regimen context block, to an OpenAI-compatible completion
//! API. Upstream failures degrade to a canned reply rather than a 5xx so
//! the chat surface stays usable when the provider is down.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request timeout for the upstream completion API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply returned when the upstream advisor is unavailable.
pub const FALLBACK_REPLY: &str = "I'm having trouble reaching the advisor service right now. \
     Please try again in a few minutes. For urgent questions about your \
     medications, contact your pharmacist or doctor.";

/// System prompt framing the advisor's role and limits.
const SYSTEM_PROMPT: &str = "You are a helpful supplement and medication assistant. Answer \
     questions about the user's regimen using the provided context. Be \
     concise. You are not a doctor; advise users to consult a healthcare \
     professional for medical decisions.";

/// Produces advisor replies for chat messages. Object-safe so tests can
/// substitute a scripted double.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Answer `question` given a pre-rendered user context block.
    ///
    /// Implementations must not fail: degraded replies are still replies.
    async fn reply(&self, context: &str, question: &str) -> String;
}

/// Configuration for the OpenAI-compatible advisor backend.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl AdvisorConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `ADVISOR_API_KEY` is not set.
    ///
    /// | Variable          | Required | Default                                      |
    /// |-------------------|----------|----------------------------------------------|
    /// | `ADVISOR_API_KEY` | yes      | --                                           |
    /// | `ADVISOR_API_URL` | no       | `https://api.openai.com/v1/chat/completions` |
    /// | `ADVISOR_MODEL`   | no       | `gpt-4o-mini`                                |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ADVISOR_API_KEY").ok()?;
        Some(Self {
            api_url: std::env::var("ADVISOR_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            api_key,
            model: std::env::var("ADVISOR_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionReply,
}

#[derive(Deserialize)]
struct CompletionReply {
    content: String,
}

/// Advisor backed by an OpenAI-compatible chat completion API.
pub struct HttpAdvisor {
    config: AdvisorConfig,
    client: reqwest::Client,
}

impl HttpAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    async fn complete(&self, context: &str, question: &str) -> Result<String, reqwest::Error> {
        let user_content = format!("{context}\n\nQuestion: {question}");
        let request = CompletionRequest {
            model: &self.config.model,
            messages: vec![
                CompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                CompletionMessage {
                    role: "user",
                    content: &user_content,
                },
            ],
        };

        let response: CompletionResponse = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

#[async_trait]
impl Advisor for HttpAdvisor {
    async fn reply(&self, context: &str, question: &str) -> String {
        match self.complete(context, question).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Advisor request failed, returning fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// Stand-in used when no advisor API key is configured.
pub struct DisabledAdvisor;

#[async_trait]
impl Advisor for DisabledAdvisor {
    async fn reply(&self, _context: &str, _question: &str) -> String {
        FALLBACK_REPLY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_advisor_always_replies_with_fallback() {
        let reply = DisabledAdvisor.reply("ctx", "question").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
