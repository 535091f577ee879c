use crate::batch::BatchSubmitter;
use crate::client::core::SpamClient;
use crate::config::ClientConfig;
use crate::feedback::{noop_sink, FeedbackSink};
use crate::input::InputPolicy;
use crate::scorer::{HttpScorer, Scorer};
use crate::Result;
use std::sync::Arc;

/// Builder for [`SpamClient`].
///
/// Without an explicit [`ClientConfig`] the builder starts from
/// [`ClientConfig::from_env`]. Individual setters win over both.
pub struct SpamClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    chunk_size: Option<usize>,
    input: Option<InputPolicy>,
    scorer: Option<Arc<dyn Scorer>>,
    feedback: Arc<dyn FeedbackSink>,
}

impl SpamClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            base_url: None,
            chunk_size: None,
            input: None,
            scorer: None,
            feedback: noop_sink(),
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Items per chunk, i.e. the maximum number of concurrent scoring calls in a batch.
    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = Some(n);
        self
    }

    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.input = Some(policy);
        self
    }

    /// Replace the HTTP scorer, e.g. with an in-process fake.
    pub fn scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Inject a feedback sink. Default is a no-op sink.
    pub fn feedback_sink(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = sink;
        self
    }

    pub fn build(self) -> Result<SpamClient> {
        let mut config = match self.config {
            Some(config) => config,
            None => ClientConfig::from_env()?,
        };
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(n) = self.chunk_size {
            config.batch.chunk_size = n;
        }
        if let Some(policy) = self.input {
            config.input = policy;
        }
        config.validate()?;

        let scorer: Arc<dyn Scorer> = match self.scorer {
            Some(scorer) => scorer,
            None => Arc::new(HttpScorer::new(&config)?),
        };
        let submitter = BatchSubmitter::new(config.batch.clone())?;

        Ok(SpamClient::new(scorer, submitter, config.input, self.feedback))
    }
}

impl Default for SpamClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
