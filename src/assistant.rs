//! Bridge to the remote chat-completion endpoint.

use reqwest::blocking::Client;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::job::JobRecord;

/// Reply used when filtering leaves nothing to ask about.
pub const NO_JOBS_REPLY: &str = "Sorry, no jobs found matching your query.";

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Message,
}

/// Builds the single user prompt: the job subset as JSON, the question, and
/// the shape the answer should take.
pub fn build_prompt(question: &str, jobs: &[&JobRecord]) -> String {
    let listing = serde_json::to_string_pretty(jobs).unwrap_or_else(|_| format!("{jobs:?}"));
    format!(
        "You are a job assistant. Answer user questions using the following job data:\n\
         {listing}\n\
         Question: \"{question}\"\n\
         Give clear, concise answers with relevant jobs (title, organization, location, salary, experience, qualification, tags).\n"
    )
}

pub struct Assistant {
    client: Client,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Answers `question` over `jobs`. Never fails: an empty subset gets
    /// [`NO_JOBS_REPLY`] without a request, and endpoint failures come back
    /// as an error message in place of the reply.
    pub fn answer(&self, question: &str, jobs: &[&JobRecord]) -> String {
        if jobs.is_empty() {
            return NO_JOBS_REPLY.to_string();
        }
        match self.complete(&build_prompt(question, jobs)) {
            Ok(text) => text,
            Err(e) => format!("Error communicating with Groq LLM: {e}"),
        }
    }

    /// Sends one prompt and returns the first choice's content unmodified.
    pub fn complete(&self, prompt: &str) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingApiKey)?;

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.config.max_tokens,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&self.config.api_url)
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .inspect_err(|e| warn!(error = %e, "completion request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = %status, error = %body, "completion endpoint returned an error");
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let raw: ChatResponseRaw =
            serde_json::from_str(&body).map_err(|e| AssistantError::Parse(e.to_string()))?;
        let content = raw
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AssistantError::Parse("response has no choices".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "chat completion"
        );
        Ok(content)
    }
}
