use crate::error::{CollaboratorError, Result};
use crate::{Collaborator, TextRequest};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const API_KEY_VAR: &str = "DOSSIER_API_KEY";
pub const MODEL_VAR: &str = "DOSSIER_MODEL";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Blocking client for the hosted generative model.
///
/// One request, one fully materialized response. Streaming is drained
/// server-side into a single body; no caller needs partial results.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Build a client from the environment. Fails with `MissingApiKey`
    /// when `DOSSIER_API_KEY` is unset or blank.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(CollaboratorError::MissingApiKey)?;
        let model = env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, model))
    }

    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_content(&self, parts: Vec<Part>, json_response: bool) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content { role: "user", parts }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                response_mime_type: if json_response {
                    "application/json"
                } else {
                    "text/plain"
                },
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        log::debug!("calling model {}", self.model);
        let response = self.http.post(&url).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                body: truncate(&body, 2_000),
            });
        }

        let parsed: GenerateResponse = response.json()?;
        let text: String = parsed
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.map(|c| c.parts).unwrap_or_default())
            .filter_map(|part| part.text)
            .collect();
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(CollaboratorError::EmptyResponse);
        }
        Ok(text)
    }
}

impl Collaborator for GeminiClient {
    fn generate(&self, request: &TextRequest<'_>) -> Result<String> {
        let mut parts = vec![Part::text(request.instructions)];
        if !request.input.is_empty() {
            parts.push(Part::text(request.input));
        }
        self.generate_content(parts, request.json_response)
    }

    fn transcribe(&self, image: &Path, instructions: &str) -> Result<String> {
        let bytes = std::fs::read(image)?;
        let parts = vec![
            Part::inline(mime_type_for(image), BASE64.encode(bytes)),
            Part::text(instructions),
        ];
        self.generate_content(parts, false)
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &'static str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape_matches_the_wire_format() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::text("instructions")],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "instructions");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert!(json["contents"][0]["parts"][0].get("inlineData").is_none());
    }

    #[test]
    fn response_text_is_joined_across_parts() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "a"}, {"text": "b"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .candidates
            .into_iter()
            .flat_map(|c| c.content.map(|c| c.parts).unwrap_or_default())
            .filter_map(|p| p.text)
            .collect();
        assert_eq!(text, "ab");
    }

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(mime_type_for(Path::new("scan.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("scan.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("scan")), "image/jpeg");
    }
}
