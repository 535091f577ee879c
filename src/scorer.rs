//! The scoring seam.
//!
//! [`Scorer`] is what the batch submitter and the client call; [`HttpScorer`] is the
//! production implementation talking to the remote service.

use crate::config::ClientConfig;
use crate::transport::{HttpReply, HttpTransport};
use crate::types::{ErrorBody, HealthStatus, PredictRequest, ScoreResult};
use crate::{Error, Result};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait Scorer: Send + Sync {
    /// Classify one message.
    async fn score(&self, message: &str) -> Result<ScoreResult>;

    /// Ask the service whether it is able to score.
    async fn health(&self) -> Result<HealthStatus>;

    /// Service metrics in the Prometheus text exposition format.
    async fn metrics(&self) -> Result<String>;
}

pub struct HttpScorer {
    transport: HttpTransport,
    predict_path: String,
    health_path: String,
    metrics_path: String,
}

impl HttpScorer {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport: HttpTransport::new(config)?,
            predict_path: config.predict_path.clone(),
            health_path: config.health_path.clone(),
            metrics_path: config.metrics_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

/// Turn a non-2xx reply into [`Error::Remote`], using the service's `{"error": ...}` text if any.
fn remote_error(reply: &HttpReply) -> Error {
    let message = serde_json::from_slice::<ErrorBody>(&reply.body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            let text = String::from_utf8_lossy(&reply.body).trim().to_string();
            if text.is_empty() {
                "request failed".to_string()
            } else {
                text
            }
        });
    Error::Remote {
        status: reply.status,
        message,
    }
}

#[async_trait]
impl Scorer for HttpScorer {
    async fn score(&self, message: &str) -> Result<ScoreResult> {
        let reply = self
            .transport
            .post_json(&self.predict_path, &PredictRequest::new(message))
            .await?;
        if !reply.is_success() {
            debug!(status = reply.status, "prediction request rejected");
            return Err(remote_error(&reply));
        }
        Ok(ScoreResult::from_response_body(&reply.body)?.with_text_fallback(message))
    }

    async fn health(&self) -> Result<HealthStatus> {
        let reply = self.transport.get(&self.health_path).await?;
        if !reply.is_success() {
            return Err(remote_error(&reply));
        }
        serde_json::from_slice(&reply.body)
            .map_err(|e| Error::malformed(format!("invalid health payload: {e}")))
    }

    async fn metrics(&self) -> Result<String> {
        let reply = self.transport.get(&self.metrics_path).await?;
        if !reply.is_success() {
            return Err(remote_error(&reply));
        }
        Ok(String::from_utf8_lossy(&reply.body).into_owned())
    }
}
