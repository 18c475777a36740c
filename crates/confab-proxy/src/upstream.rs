// Client for the Replicate-style text-completion API (HTTP direct, no SDK).

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::UpstreamConfig;

/// Client for the remote inference service behind the proxy.
pub struct UpstreamClient {
    http_client: reqwest::Client,
    endpoint: String,
    max_new_tokens: u32,
}

#[derive(Debug, Serialize)]
struct PredictionRequest {
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    prompt: String,
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<String>,
}

/// The inference API returns its output either as one string or as an
/// array of token fragments; both collapse to a single string here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Text(String),
    Fragments(Vec<String>),
}

impl PredictionOutput {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Fragments(parts) => parts.concat(),
        }
    }
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig, api_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_token))
                .context("Invalid API token format")?,
        );
        // Ask the API to hold the connection until the prediction finishes.
        headers.insert("Prefer", HeaderValue::from_static("wait"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/models/{}/predictions",
                config.url.trim_end_matches('/'),
                config.model
            ),
            max_new_tokens: config.max_new_tokens,
        })
    }

    /// Run one prediction and return the normalized output text.
    pub async fn complete(&self, prompt: String) -> Result<String> {
        let request = PredictionRequest {
            input: PredictionInput {
                prompt,
                max_new_tokens: self.max_new_tokens,
            },
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("inference request failed")?;

        let status = response.status();
        let body = response.text().await.context("reading inference response")?;
        if !status.is_success() {
            anyhow::bail!("inference API returned {}: {}", status, body);
        }

        let prediction: PredictionResponse =
            serde_json::from_str(&body).context("decoding inference response")?;

        if let Some(error) = prediction.error {
            anyhow::bail!("inference API reported an error: {}", error);
        }

        prediction
            .output
            .map(PredictionOutput::into_text)
            .context("inference response carried no output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_output_is_joined_without_separator() {
        let raw = r#"{"output": ["Hel", "lo", " there"]}"#;
        let prediction: PredictionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(prediction.output.unwrap().into_text(), "Hello there");
    }

    #[test]
    fn string_output_passes_through() {
        let raw = r#"{"output": "plain"}"#;
        let prediction: PredictionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(prediction.output.unwrap().into_text(), "plain");
    }
}
