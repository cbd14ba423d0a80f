//! Video generation provider client.
//!
//! Talks to a fal.ai-style inference endpoint: submit a generation request,
//! receive a provider-assigned request id, then poll the request until the
//! provider reports a terminal state.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::poll::{poll_until, PollConfig, PollError, PollStatus};

const DEFAULT_BASE_URL: &str = "https://fal.run/fal-ai/ltx-video";

// Fixed inference parameters; only duration and aspect ratio are overridable.
const NUM_INFERENCE_STEPS: u32 = 30;
const GUIDANCE_SCALE: u32 = 3;
const FRAME_RATE: u32 = 25;
const DEFAULT_NUM_FRAMES: u32 = 121;
const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Errors from the generation provider.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("video generation failed: {0}")]
    Failed(String),

    #[error("video generation timed out after {0} attempts")]
    Timeout(u32),
}

impl From<PollError<GeneratorError>> for GeneratorError {
    fn from(err: PollError<GeneratorError>) -> Self {
        match err {
            PollError::Timeout(attempts) => GeneratorError::Timeout(attempts),
            PollError::Rejected(reason) => GeneratorError::Failed(reason),
            PollError::Probe(e) => e,
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct VideoGenConfig {
    pub api_key: String,
    pub base_url: String,
    pub poll: PollConfig,
}

impl VideoGenConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: PollConfig::default(),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, GeneratorError> {
        let api_key = std::env::var("FAL_API_KEY")
            .map_err(|_| GeneratorError::Request("FAL_API_KEY not set".into()))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("FAL_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

/// Overridable generation parameters.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Clip length in frames (default 121, ~5s at 25fps)
    pub num_frames: Option<u32>,
    /// Output aspect ratio (default "16:9")
    pub aspect_ratio: Option<String>,
}

/// A completed generation: where the provider hosts the asset, and the
/// request id it was produced under.
#[derive(Debug, Clone)]
pub struct GeneratedAsset {
    pub asset_url: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    prompt: &'a str,
    num_inference_steps: u32,
    guidance_scale: u32,
    num_frames: u32,
    frame_rate: u32,
    aspect_ratio: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct RequestStatus {
    status: String,
    #[serde(default)]
    video: Option<VideoResult>,
}

#[derive(Debug, Deserialize)]
struct VideoResult {
    url: String,
}

/// Video generation client.
pub struct VideoGenClient {
    config: VideoGenConfig,
    client: Client,
}

impl VideoGenClient {
    pub fn new(config: VideoGenConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, GeneratorError> {
        Ok(Self::new(VideoGenConfig::from_env()?))
    }

    /// Generate a video for the prompt and wait for the asset URL.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedAsset, GeneratorError> {
        let request_id = self.submit(prompt, options).await?;
        info!(request_id = %request_id, "generation request submitted");

        let asset_url = poll_until(&self.config.poll, || self.probe(&request_id)).await?;

        info!(request_id = %request_id, "generation completed");
        Ok(GeneratedAsset {
            asset_url,
            request_id,
        })
    }

    async fn submit(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, GeneratorError> {
        let body = SubmitRequest {
            prompt,
            num_inference_steps: NUM_INFERENCE_STEPS,
            guidance_scale: GUIDANCE_SCALE,
            num_frames: options.num_frames.unwrap_or(DEFAULT_NUM_FRAMES),
            frame_rate: FRAME_RATE,
            aspect_ratio: options.aspect_ratio.as_deref().unwrap_or(DEFAULT_ASPECT_RATIO),
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Request(format!(
                "provider returned {status}: {text}"
            )));
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Request(format!("invalid submit response: {e}")))?;

        Ok(submitted.request_id)
    }

    async fn probe(&self, request_id: &str) -> Result<PollStatus<String>, GeneratorError> {
        let url = format!("{}/requests/{}", self.config.base_url, request_id);

        let status: RequestStatus = self
            .client
            .get(&url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| GeneratorError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| GeneratorError::Request(format!("invalid status response: {e}")))?;

        debug!(request_id, status = %status.status, "generation status");

        match status.status.as_str() {
            "COMPLETED" => match status.video {
                Some(video) => Ok(PollStatus::Ready(video.url)),
                None => Ok(PollStatus::Rejected(
                    "provider reported COMPLETED without a video URL".into(),
                )),
            },
            "FAILED" => Ok(PollStatus::Rejected("provider reported FAILED".into())),
            _ => Ok(PollStatus::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, max_attempts: u32) -> VideoGenClient {
        VideoGenClient::new(
            VideoGenConfig::new("test-key")
                .with_base_url(server.uri())
                .with_poll(PollConfig::new(Duration::from_millis(1), max_attempts)),
        )
    }

    #[tokio::test]
    async fn test_generate_submits_then_polls_to_completion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("Authorization", "Key test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "request_id": "req-1"
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/requests/req-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "status": "COMPLETED",
                    "video": { "url": "https://cdn.provider/clip.mp4" }
                })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server, 5)
            .generate("sunset over mountains", &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(result.asset_url, "https://cdn.provider/clip.mp4");
        assert_eq!(result.request_id, "req-1");
    }

    #[tokio::test]
    async fn test_provider_failure_is_failed_not_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "request_id": "req-2" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/requests/req-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "FAILED" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .generate("p", &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Failed(_)));
    }

    #[tokio::test]
    async fn test_exhausted_polling_is_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "request_id": "req-3" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "IN_PROGRESS" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 3)
            .generate("p", &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Timeout(3)));
    }

    #[tokio::test]
    async fn test_submit_rejection_surfaces_request_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client_for(&server, 3)
            .generate("p", &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Request(_)));
    }
}
