use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for a local Ollama server's non-streaming `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaService {
    client: Client,
    endpoint: Url,
    model: String,
    temperature: f32,
    top_p: f32,
    timeout: Option<Duration>,
}

impl OllamaService {
    pub fn new(config: &Config, client: Client) -> Result<Self> {
        let mut base = Url::parse(&config.ollama_url)
            .map_err(|e| Error::Config(format!("Invalid OLLAMA_URL: {}", e)))?;
        // `join` replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("api/generate")
            .map_err(|e| Error::Config(format!("Invalid OLLAMA_URL: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            model: config.ollama_model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            timeout: config.ollama_timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn sampling(&self, num_predict: u32) -> SamplingOptions {
        SamplingOptions {
            temperature: self.temperature,
            top_p: self.top_p,
            num_predict,
        }
    }

    /// Sends one prompt and returns the raw generated text.
    pub async fn generate(&self, prompt: &str, num_predict: u32) -> Result<String> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.sampling(num_predict),
        };

        tracing::info!(model = %self.model, num_predict, "Calling Ollama API");
        let mut request = self.client.post(self.endpoint.clone()).json(&payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let res = request.send().await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %text, "Ollama returned an error status");
            return Err(Error::Upstream(format!("Ollama API error: {}", status)));
        }

        let body: GenerateResponse = res.json().await?;
        match body.response {
            Some(text) if !text.trim().is_empty() => {
                tracing::debug!(len = text.len(), "Ollama response received");
                Ok(text)
            }
            _ => Err(Error::Upstream("No response from Ollama".to_string())),
        }
    }
}
