use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::PortalConfig;
use crate::domain::port::TextGenerator;
use crate::error::PortalError;

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            &config.gemini_model,
            &config.gemini_base_url,
        )
    }

    fn endpoint(&self, api_key: &str) -> Result<Url, PortalError> {
        let mut url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        ))
        .map_err(|e| PortalError::AiRequest(e.to_string()))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Concatenated text of the first candidate.
fn first_candidate_text(resp: GenerateResponse) -> Option<String> {
    let content = resp.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    (!text.is_empty()).then_some(text)
}

impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, PortalError> {
        let api_key = self.api_key.as_deref().ok_or(PortalError::AiUnavailable)?;
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint(api_key)?)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortalError::AiRequest(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PortalError::AiRequest(format!(
                "status={} body={text}",
                status.as_u16()
            )));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| PortalError::AiRequest(e.without_url().to_string()))?;
        first_candidate_text(parsed).ok_or(PortalError::AiResponseMalformed)
    }
}
