//! Gemini `generateContent` client.
//!
//! Uses reqwest with the API key in the `x-goog-api-key` header. Requests ask
//! for `application/json` output constrained by the insight schema; the
//! candidate text is then parsed by [`parse_insight_response`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::InsightError;
use crate::types::InsightResult;

use super::prompts::{parse_insight_response, InsightRequest};
use super::InsightProvider;

/// Google error response format.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, InsightError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt and return the concatenated candidate text.
    pub async fn generate_content(
        &self,
        prompt: &str,
        response_schema: &serde_json::Value,
    ) -> Result<String, InsightError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseJsonSchema": response_schema,
            }
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(err) => match err.error.status {
                    Some(code) => format!("{} ({})", err.error.message, code),
                    None => err.error.message,
                },
                Err(_) => text,
            };
            return Err(InsightError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| InsightError::Parse(format!("Failed to parse Gemini response: {}", e)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(InsightError::EmptyResponse)?;
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                log::debug!("Gemini candidate finished with {}", reason);
            }
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        Ok(text)
    }

    fn transport_error(&self, err: reqwest::Error) -> InsightError {
        if err.is_timeout() {
            InsightError::Timeout(self.timeout.as_secs())
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl InsightProvider for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &InsightRequest) -> Result<InsightResult, InsightError> {
        let text = self
            .generate_content(&request.prompt, &request.response_schema)
            .await?;
        parse_insight_response(&text)
    }
}
