use crate::batch::{BatchSubmitter, BatchSummary, Progress};
use crate::client::builder::SpamClientBuilder;
use crate::feedback::{FeedbackEvent, FeedbackSink, Verdict};
use crate::input::{parse_batch_text, InputPolicy};
use crate::scorer::Scorer;
use crate::types::{HealthStatus, ScoreResult};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Result of scoring a single message.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub result: ScoreResult,
    pub elapsed: Duration,
}

/// Result of a whole batch run, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<ScoreResult>,
    pub summary: BatchSummary,
    pub elapsed: Duration,
}

/// Entry point for applications: input checks, scoring, batching and feedback.
///
/// Holds only immutable wiring, so it can be shared behind an `Arc` and used from
/// many tasks at once.
pub struct SpamClient {
    scorer: Arc<dyn Scorer>,
    submitter: BatchSubmitter,
    input: InputPolicy,
    feedback: Arc<dyn FeedbackSink>,
}

impl SpamClient {
    pub(crate) fn new(
        scorer: Arc<dyn Scorer>,
        submitter: BatchSubmitter,
        input: InputPolicy,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            scorer,
            submitter,
            input,
            feedback,
        }
    }

    pub fn builder() -> SpamClientBuilder {
        SpamClientBuilder::new()
    }

    pub fn input_policy(&self) -> &InputPolicy {
        &self.input
    }

    pub fn submitter(&self) -> &BatchSubmitter {
        &self.submitter
    }

    /// Score one message after checking it against the input policy.
    pub async fn analyze(&self, message: &str) -> Result<Analysis> {
        let message = self.input.check_message(message)?;
        let started = Instant::now();
        let result = self.scorer.score(message).await?;
        let elapsed = started.elapsed();
        info!(
            is_spam = result.is_spam,
            spam_probability = result.spam_probability,
            elapsed_ms = elapsed.as_millis() as u64,
            "message analyzed"
        );
        Ok(Analysis { result, elapsed })
    }

    /// Score a list of messages in chunks. `on_progress` fires once per chunk.
    pub async fn analyze_batch<P>(&self, messages: Vec<String>, on_progress: P) -> Result<BatchReport>
    where
        P: FnMut(Progress),
    {
        let messages = self.input.check_batch(messages)?;
        let started = Instant::now();
        let scorer = self.scorer.as_ref();
        let results = self
            .submitter
            .run_with_progress(
                messages,
                move |message: String| async move { scorer.score(&message).await },
                on_progress,
            )
            .await?;
        let summary = BatchSummary::from_results(&results);
        info!(
            total = summary.total,
            spam = summary.spam,
            ham = summary.ham,
            "batch analyzed"
        );
        Ok(BatchReport {
            results,
            summary,
            elapsed: started.elapsed(),
        })
    }

    /// Like [`analyze_batch`](Self::analyze_batch), taking pasted text with one message per line.
    pub async fn analyze_batch_text<P>(&self, text: &str, on_progress: P) -> Result<BatchReport>
    where
        P: FnMut(Progress),
    {
        self.analyze_batch(parse_batch_text(text), on_progress).await
    }

    pub async fn submit_feedback(
        &self,
        result: &ScoreResult,
        verdict: Verdict,
    ) -> Result<FeedbackEvent> {
        let event = FeedbackEvent::new(result, verdict);
        self.feedback.report(event.clone()).await?;
        Ok(event)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.scorer.health().await
    }

    pub async fn metrics(&self) -> Result<String> {
        self.scorer.metrics().await
    }
}
