//! Gemini generative-text client.

use async_trait::async_trait;
use papermill_core::stages::{GenerationOptions, TextGenerator};
use papermill_core::{Error, Result};
use serde_json::{Value, json};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(prompt: &str, options: &GenerationOptions) -> Value {
        let mut body = json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ],
            "generationConfig": {
                "temperature": options.temperature,
                "topP": 1,
                "topK": 32,
                "maxOutputTokens": options.max_tokens,
            }
        });
        if let Some(system) = &options.system_prompt {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        body
    }

    fn extract_text(body: &Value) -> Result<String> {
        let parts = body["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| Error::Generation("response has no candidates".to_string()))?;
        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
        if text.is_empty() {
            return Err(Error::Generation("response candidate has no text".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let url = format!("{API_BASE}/{}:generateContent?key={}", self.model, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&Self::request_body(prompt, options))
            .send()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Gemini returned {status}: {}",
                crate::text::excerpt(&body, 200)
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;
        Self::extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_generation_config() {
        let options = GenerationOptions {
            system_prompt: Some("be brief".to_string()),
            temperature: 0.2,
            max_tokens: 128,
        };
        let body = GeminiClient::request_body("hello", &options);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 128);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn request_body_omits_missing_system_prompt() {
        let body = GeminiClient::request_body("hello", &GenerationOptions::default());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn extract_text_joins_candidate_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello, " }, { "text": "world." }]
                }
            }]
        });
        assert_eq!(GeminiClient::extract_text(&body).unwrap(), "Hello, world.");
    }

    #[test]
    fn extract_text_rejects_empty_response() {
        assert!(GeminiClient::extract_text(&json!({})).is_err());
        let no_text = json!({ "candidates": [{ "content": { "parts": [] } }] });
        assert!(GeminiClient::extract_text(&no_text).is_err());
    }
}
