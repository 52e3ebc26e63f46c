//! Gemini provider
//!
//! Talks to the Google generative language API over REST. Two request
//! shapes are used: plain `generateContent` for conversational turns, and
//! `generateContent` with a `generationConfig` carrying a response schema
//! for structured extraction.

use super::{GenerativeProvider, LLMError, Message, MessageRole};
use crate::config::GeminiConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use serde_json::json;

pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// POST a generateContent payload and return the parsed response body.
    ///
    /// The API key travels in the `x-goog-api-key` header, never in the
    /// URL, so transport errors that embed the request URL cannot echo it.
    async fn post(&self, payload: &serde_json::Value) -> super::Result<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.api_key.unsecure())
            .json(payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                400 | 404 => LLMError::InvalidRequest(text),
                429 => LLMError::RateLimitExceeded,
                401 | 403 => LLMError::AuthenticationFailed(text),
                _ => LLMError::ProviderUnavailable(format!(
                    "Gemini API error ({}): {}",
                    status, text
                )),
            });
        }

        response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> super::Result<serde_json::Value> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });

        let data = self.post(&payload).await?;
        let text = extract_candidate_text(&data)?;

        serde_json::from_str(text.trim())
            .map_err(|e| LLMError::ParseError(format!("Response is not valid JSON: {}", e)))
    }

    async fn converse(&self, history: &[Message]) -> super::Result<String> {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for msg in history {
            if msg.role == MessageRole::System {
                system_instruction = Some(json!({
                    "parts": [{"text": msg.content}]
                }));
                continue;
            }

            contents.push(json!({
                "role": msg.role.to_string(),
                "parts": [{"text": msg.content}]
            }));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("contents".to_string(), json!(contents));

        if let Some(sys) = system_instruction {
            payload.insert("systemInstruction".to_string(), sys);
        }

        let data = self.post(&serde_json::Value::Object(payload)).await?;
        extract_candidate_text(&data)
    }

    async fn check_health(&self) -> bool {
        !self.api_key.unsecure().is_empty()
    }
}

/// Pull the concatenated text parts out of the first candidate.
fn extract_candidate_text(data: &serde_json::Value) -> super::Result<String> {
    let candidate = data
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| LLMError::ParseError("No candidates in response".to_string()))?;

    let content = candidate
        .get("content")
        .ok_or_else(|| LLMError::ParseError("No content in candidate".to_string()))?;

    let parts = content
        .get("parts")
        .and_then(|p| p.as_array())
        .ok_or_else(|| LLMError::ParseError("No parts in candidate content".to_string()))?;

    let mut full_text = String::new();
    for part in parts {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            full_text.push_str(text);
        }
    }

    Ok(full_text)
}
