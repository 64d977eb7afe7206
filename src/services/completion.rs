use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CompletionSettings;
use crate::core::{build_prompt, strip_code_fences, NeighborhoodPriceTable};
use crate::models::PreferenceRequest;
use crate::services::{RecommendationSource, UpstreamError};

/// Client for an OpenAI-compatible chat completion endpoint
///
/// Turns the request into a prompt, asks the model for 8 tiered locations
/// and parses the model's text reply as JSON.
pub struct CompletionClient {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
    prices: Arc<NeighborhoodPriceTable>,
}

impl CompletionClient {
    pub fn new(
        settings: &CompletionSettings,
        timeout: Duration,
        prices: Arc<NeighborhoodPriceTable>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key().map(str::to_string),
            model: settings.model.clone(),
            system_prompt: settings.system_prompt().to_string(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            client,
            prices,
        })
    }
}

#[async_trait]
impl RecommendationSource for CompletionClient {
    fn name(&self) -> &'static str {
        "completion"
    }

    async fn recommend(&self, request: &PreferenceRequest) -> Result<Value, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            UpstreamError::Configuration("HUGGINGFACE_API_KEY is not set".to_string())
        })?;

        let caller_prices = request
            .neighborhood_price_info
            .clone()
            .map(NeighborhoodPriceTable::from);
        let prices = caller_prices.as_ref().unwrap_or_else(|| self.prices.as_ref());
        let prompt = build_prompt(request, prices);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &self.system_prompt },
                ChatMessage { role: "user", content: &prompt },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::info!("Calling completion model {} at {}", self.model, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Completion API error response: {} - {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let text = extract_message_text(&raw)?;
        tracing::debug!("Raw model reply: {}", text);

        parse_model_reply(&text)
    }
}

/// Pull the first choice's message content out of a completion response
fn extract_message_text(raw: &str) -> Result<String, UpstreamError> {
    let parsed: ChatResponse = serde_json::from_str(raw).map_err(|e| UpstreamError::Format {
        reason: format!("unexpected completion response: {}", e),
        raw: raw.to_string(),
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| UpstreamError::Format {
            reason: "completion response has no message content".to_string(),
            raw: raw.to_string(),
        })
}

/// Parse the model's text as JSON, tolerating a markdown code fence around it
fn parse_model_reply(text: &str) -> Result<Value, UpstreamError> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| UpstreamError::Format {
        reason: format!("model reply is not valid JSON: {}", e),
        raw: text.to_string(),
    })
}

// --- API types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}
