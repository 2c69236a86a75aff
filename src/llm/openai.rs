use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{ReviewClient, prompts};
use crate::error::ReviewError;

/// Fixed, low sampling temperature: review output should be as repeatable
/// as the API allows.
const TEMPERATURE: f32 = 0.2;

/// Minimal request/response structs for the OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    n: u8,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI-based implementation of ReviewClient.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        OpenAiClient {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }

    fn call_chat(&self, req: &ChatRequest) -> Result<String, ReviewError> {
        let url = self.chat_url();

        log::info!("Calling OpenAI model {:?}", &req.model);

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ReviewError::ServiceUnavailable(format!(
                        "request to OpenAI timed out: {e}"
                    ))
                } else {
                    ReviewError::ServiceUnavailable(format!(
                        "failed to send request to OpenAI: {e}"
                    ))
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(ReviewError::ServiceUnavailable(format!(
                "OpenAI API error: HTTP {} - {}",
                status.as_u16(),
                text
            )));
        }

        let chat_resp: ChatResponse = resp.json().map_err(|e| {
            ReviewError::ServiceUnavailable(format!("failed to parse OpenAI response: {e}"))
        })?;

        let content = chat_resp
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| {
                ReviewError::ServiceUnavailable("no choices returned from OpenAI".to_string())
            })?;

        if let Some(usage) = &chat_resp.usage {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(content)
    }
}

impl ReviewClient for OpenAiClient {
    fn review_text(&self, prompt: &str, max_tokens: u32) -> Result<String, ReviewError> {
        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompts::REVIEWER_PERSONA.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.into(),
                },
            ],
            max_tokens,
            temperature: TEMPERATURE,
            n: 1,
        };

        self.call_chat(&req)
    }
}
