//! Social publishing provider client.
//!
//! Implements the Graph-style three-step publish protocol: create a media
//! container referencing the durable asset URL, poll the container until the
//! platform finishes its asynchronous processing, then finalize the container
//! into a live post.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::poll::{poll_until, PollConfig, PollError, PollStatus};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Errors from the publishing provider.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish request failed: {0}")]
    Request(String),

    #[error("publish processing failed: {0}")]
    Processing(String),

    #[error("publish processing timed out after {0} attempts")]
    Timeout(u32),
}

impl From<PollError<PublishError>> for PublishError {
    fn from(err: PollError<PublishError>) -> Self {
        match err {
            PollError::Timeout(attempts) => PublishError::Timeout(attempts),
            PollError::Rejected(reason) => PublishError::Processing(reason),
            PollError::Probe(e) => e,
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub access_token: String,
    pub account_id: String,
    pub base_url: String,
    pub poll: PollConfig,
}

impl PublisherConfig {
    pub fn new(access_token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            account_id: account_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: PollConfig::default(),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, PublishError> {
        let access_token = std::env::var("IG_ACCESS_TOKEN")
            .map_err(|_| PublishError::Request("IG_ACCESS_TOKEN not set".into()))?;
        let account_id = std::env::var("IG_ACCOUNT_ID")
            .map_err(|_| PublishError::Request("IG_ACCOUNT_ID not set".into()))?;
        let mut config = Self::new(access_token, account_id);
        if let Ok(base_url) = std::env::var("GRAPH_BASE_URL") {
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

#[derive(Debug, Serialize)]
struct CreateContainerRequest<'a> {
    media_type: &'static str,
    video_url: &'a str,
    caption: &'a str,
    share_to_feed: bool,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ContainerStatus {
    #[serde(default)]
    status_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct FinalizeRequest<'a> {
    creation_id: &'a str,
}

/// Publishing client.
pub struct GraphPublisher {
    config: PublisherConfig,
    client: Client,
}

impl GraphPublisher {
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, PublishError> {
        Ok(Self::new(PublisherConfig::from_env()?))
    }

    /// Publish the durable asset with a caption. Returns the publish
    /// confirmation id once the post is live.
    pub async fn publish(&self, asset_url: &str, caption: &str) -> Result<String, PublishError> {
        let container_id = self.create_container(asset_url, caption).await?;
        info!(container_id = %container_id, "publish container created");

        poll_until(&self.config.poll, || self.probe(&container_id)).await?;

        let publish_id = self.finalize(&container_id).await?;
        info!(publish_id = %publish_id, "video published");
        Ok(publish_id)
    }

    async fn create_container(
        &self,
        asset_url: &str,
        caption: &str,
    ) -> Result<String, PublishError> {
        let url = format!("{}/{}/media", self.config.base_url, self.config.account_id);
        let body = CreateContainerRequest {
            media_type: "REELS",
            video_url: asset_url,
            caption,
            share_to_feed: true,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", self.config.access_token.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PublishError::Request(format!(
                "container creation returned {status}: {text}"
            )));
        }

        let created: IdResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Request(format!("invalid container response: {e}")))?;

        Ok(created.id)
    }

    async fn probe(&self, container_id: &str) -> Result<PollStatus<()>, PublishError> {
        let url = format!("{}/{}", self.config.base_url, container_id);

        let status: ContainerStatus = self
            .client
            .get(&url)
            .query(&[
                ("fields", "status_code"),
                ("access_token", self.config.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| PublishError::Request(format!("invalid status response: {e}")))?;

        debug!(container_id, status = ?status.status_code, "container status");

        match status.status_code.as_deref() {
            Some("FINISHED") => Ok(PollStatus::Ready(())),
            Some("ERROR") => Ok(PollStatus::Rejected(
                "platform media processing failed".into(),
            )),
            _ => Ok(PollStatus::Pending),
        }
    }

    async fn finalize(&self, container_id: &str) -> Result<String, PublishError> {
        let url = format!(
            "{}/{}/media_publish",
            self.config.base_url, self.config.account_id
        );

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", self.config.access_token.as_str())])
            .json(&FinalizeRequest {
                creation_id: container_id,
            })
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PublishError::Request(format!(
                "media publish returned {status}: {text}"
            )));
        }

        let published: IdResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Request(format!("invalid publish response: {e}")))?;

        Ok(published.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publisher_for(server: &MockServer, max_attempts: u32) -> GraphPublisher {
        GraphPublisher::new(
            PublisherConfig::new("token", "acct-1")
                .with_base_url(server.uri())
                .with_poll(PollConfig::new(Duration::from_millis(1), max_attempts)),
        )
    }

    #[tokio::test]
    async fn test_publish_creates_polls_and_finalizes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/acct-1/media"))
            .and(query_param("access_token", "token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "c-1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/c-1"))
            .and(query_param("fields", "status_code"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status_code": "FINISHED" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/acct-1/media_publish"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "pub-99" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let publish_id = publisher_for(&server, 5)
            .publish("https://media.example.com/v.mp4", "a caption")
            .await
            .unwrap();
        assert_eq!(publish_id, "pub-99");
    }

    #[tokio::test]
    async fn test_processing_error_is_not_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/acct-1/media"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "c-2" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/c-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status_code": "ERROR" })),
            )
            .mount(&server)
            .await;

        let err = publisher_for(&server, 5)
            .publish("https://media.example.com/v.mp4", "c")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Processing(_)));
    }

    #[tokio::test]
    async fn test_stuck_container_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/acct-1/media"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "c-3" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/c-3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status_code": "IN_PROGRESS" })),
            )
            .mount(&server)
            .await;

        let err = publisher_for(&server, 2)
            .publish("https://media.example.com/v.mp4", "c")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Timeout(2)));
    }
}
