use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use super::prompts::TextPrompt;
use crate::config::DexConfig;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid image payload: {0}")]
    Image(#[from] base64::DecodeError),
    #[error("request task did not finish: {0}")]
    Aborted(String),
}

/// One synthesized image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// Inline `data:` URL suitable for an `<img src>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// The generative-AI service behind the image creator, team analysis and Q&A.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Synthesize a single image from a prompt.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, OracleError>;

    /// Free-text completion.
    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, OracleError>;
}

/// Gemini (text) and Imagen (image) over the Generative Language REST API.
///
/// Single attempt per call, no retries, transport-default timeouts.
pub struct GeminiClient {
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    image_model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            text_model: crate::config::DEFAULT_TEXT_MODEL.to_string(),
            image_model: crate::config::DEFAULT_IMAGE_MODEL.to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &DexConfig) -> Self {
        Self::new(config.api_key.clone(), config.api_base_url.clone())
            .with_models(&config.text_model, &config.image_model)
    }

    pub fn with_models(mut self, text_model: &str, image_model: &str) -> Self {
        self.text_model = text_model.to_string();
        self.image_model = image_model.to_string();
        self
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, OracleError> {
        let api_key = self.api_key.as_deref().ok_or(OracleError::MissingApiKey)?;

        tracing::debug!(url, "sending generative request");
        let resp = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, OracleError> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "1:1",
                "outputOptions": { "mimeType": "image/png" }
            }
        });

        let json = self
            .post(&self.endpoint(&self.image_model, "predict"), &body)
            .await?;

        let prediction = json["predictions"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| OracleError::InvalidResponse("no predictions".to_string()))?;

        let encoded = prediction["bytesBase64Encoded"]
            .as_str()
            .ok_or_else(|| OracleError::InvalidResponse("missing image bytes".to_string()))?;

        let mime_type = prediction["mimeType"]
            .as_str()
            .unwrap_or("image/png")
            .to_string();

        Ok(GeneratedImage {
            mime_type,
            bytes: STANDARD.decode(encoded)?,
        })
    }

    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, OracleError> {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt.contents }]
            }]
        });

        if let Some(system) = &prompt.system_instruction {
            body["systemInstruction"] = json!({
                "parts": [{ "text": system }]
            });
        }

        let json = self
            .post(&self.endpoint(&self.text_model, "generateContent"), &body)
            .await?;

        let text: String = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .ok_or_else(|| OracleError::InvalidResponse("missing content".to_string()))?;

        Ok(text)
    }
}
