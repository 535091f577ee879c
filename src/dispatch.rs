//! Command dispatch.
//!
//! Front-ends (a CLI, a web handler, a TUI) translate their user actions into a
//! [`Command`] and hand it to a [`Dispatcher`]; each command maps to exactly one
//! [`SpamClient`] call. Front-ends never talk to the scorer or the batch submitter
//! directly, and the dispatcher keeps no state of its own.

use crate::batch::Progress;
use crate::client::{Analysis, BatchReport, SpamClient};
use crate::feedback::{FeedbackEvent, Verdict};
use crate::types::{HealthStatus, ScoreResult};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;

/// Action names understood by [`Command::parse`].
pub const ACTIONS: &[&str] = &[
    "analyze",
    "batch-analyze",
    "feedback-correct",
    "feedback-incorrect",
    "health",
    "metrics",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AnalyzeMessage(String),
    /// Pasted text, one message per line.
    AnalyzeBatch(String),
    SubmitFeedback {
        result: ScoreResult,
        verdict: Verdict,
    },
    CheckHealth,
    FetchMetrics,
}

impl Command {
    /// Build a command from a UI action name and its raw payload.
    ///
    /// Feedback actions expect the prediction being judged as JSON.
    pub fn parse(action: &str, payload: &str) -> Result<Self> {
        match action {
            "analyze" => Ok(Command::AnalyzeMessage(payload.to_string())),
            "batch-analyze" => Ok(Command::AnalyzeBatch(payload.to_string())),
            "feedback-correct" | "feedback-incorrect" => {
                let result: ScoreResult = serde_json::from_str(payload).map_err(|e| {
                    Error::input_with_context(
                        "feedback needs the prediction it refers to",
                        ErrorContext::new()
                            .with_details(e.to_string())
                            .with_source("dispatch"),
                    )
                })?;
                Ok(Command::SubmitFeedback {
                    result,
                    verdict: Verdict::from_correct(action == "feedback-correct"),
                })
            }
            "health" => Ok(Command::CheckHealth),
            "metrics" => Ok(Command::FetchMetrics),
            other => Err(Error::input_with_context(
                format!("unknown action '{other}'"),
                ErrorContext::new()
                    .with_details(format!("expected one of: {}", ACTIONS.join(", ")))
                    .with_source("dispatch"),
            )),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Command::AnalyzeMessage(_) => "analyze",
            Command::AnalyzeBatch(_) => "batch-analyze",
            Command::SubmitFeedback {
                verdict: Verdict::Correct,
                ..
            } => "feedback-correct",
            Command::SubmitFeedback {
                verdict: Verdict::Incorrect,
                ..
            } => "feedback-incorrect",
            Command::CheckHealth => "health",
            Command::FetchMetrics => "metrics",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Analysis(Analysis),
    Batch(BatchReport),
    FeedbackRecorded(FeedbackEvent),
    Health(HealthStatus),
    /// Raw Prometheus text.
    Metrics(String),
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<SpamClient>,
}

impl Dispatcher {
    pub fn new(client: Arc<SpamClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SpamClient {
        &self.client
    }

    /// Run one command. `on_progress` is only used by batch commands.
    pub async fn dispatch<P>(&self, command: Command, on_progress: P) -> Result<Outcome>
    where
        P: FnMut(Progress),
    {
        tracing::debug!(action = command.action(), "dispatching command");
        match command {
            Command::AnalyzeMessage(message) => {
                self.client.analyze(&message).await.map(Outcome::Analysis)
            }
            Command::AnalyzeBatch(text) => self
                .client
                .analyze_batch_text(&text, on_progress)
                .await
                .map(Outcome::Batch),
            Command::SubmitFeedback { result, verdict } => self
                .client
                .submit_feedback(&result, verdict)
                .await
                .map(Outcome::FeedbackRecorded),
            Command::CheckHealth => self.client.health().await.map(Outcome::Health),
            Command::FetchMetrics => self.client.metrics().await.map(Outcome::Metrics),
        }
    }

    pub async fn dispatch_action<P>(&self, action: &str, payload: &str, on_progress: P) -> Result<Outcome>
    where
        P: FnMut(Progress),
    {
        let command = Command::parse(action, payload)?;
        self.dispatch(command, on_progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::feedback::InMemoryFeedbackSink;
    use crate::scorer::Scorer;
    use async_trait::async_trait;

    struct AlwaysHam;

    #[async_trait]
    impl Scorer for AlwaysHam {
        async fn score(&self, message: &str) -> Result<ScoreResult> {
            Ok(ScoreResult {
                is_spam: false,
                spam_probability: 0.1,
                prediction: "Not Spam".into(),
                text: message.to_string(),
                ham_probability: Some(0.9),
            })
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus {
                status: "healthy".into(),
                timestamp: None,
            })
        }

        async fn metrics(&self) -> Result<String> {
            Ok("# TYPE spam_detector_predictions_total counter\nspam_detector_predictions_total 0\n".into())
        }
    }

    fn dispatcher(sink: Arc<InMemoryFeedbackSink>) -> Dispatcher {
        let client = SpamClient::builder()
            .config(ClientConfig::default())
            .chunk_size(2)
            .scorer(Arc::new(AlwaysHam))
            .feedback_sink(sink)
            .build()
            .unwrap();
        Dispatcher::new(Arc::new(client))
    }

    #[test]
    fn every_listed_action_parses() {
        let payload = r#"{"is_spam": true, "spam_probability": 0.9, "prediction": "Spam"}"#;
        for action in ACTIONS {
            let command = Command::parse(action, payload).unwrap();
            assert_eq!(command.action(), *action);
        }
    }

    #[test]
    fn unknown_action_is_input_error() {
        let err = Command::parse("switch-theme", "").unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("switch-theme"));
    }

    #[test]
    fn feedback_without_prediction_is_input_error() {
        assert!(Command::parse("feedback-correct", "not json")
            .unwrap_err()
            .is_input());
    }

    #[tokio::test]
    async fn batch_command_routes_to_client() {
        let dispatcher = dispatcher(Arc::new(InMemoryFeedbackSink::new(4)));
        let mut events = 0;
        let outcome = dispatcher
            .dispatch_action("batch-analyze", "one\ntwo\nthree", |_| events += 1)
            .await
            .unwrap();
        match outcome {
            Outcome::Batch(report) => {
                assert_eq!(report.summary.total, 3);
                assert_eq!(report.summary.ham, 3);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(events, 2);
    }

    #[tokio::test]
    async fn feedback_command_routes_to_sink() {
        let sink = Arc::new(InMemoryFeedbackSink::new(4));
        let dispatcher = dispatcher(sink.clone());
        let analysis = match dispatcher
            .dispatch(Command::AnalyzeMessage("hello".into()), |_| {})
            .await
            .unwrap()
        {
            Outcome::Analysis(analysis) => analysis,
            other => panic!("unexpected outcome: {other:?}"),
        };
        let payload = serde_json::to_string(&analysis.result).unwrap();
        let outcome = dispatcher
            .dispatch_action("feedback-incorrect", &payload, |_| {})
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::FeedbackRecorded(_)));
        let events = sink.get_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].verdict, Verdict::Incorrect);
        assert!(events[0].actual_spam());
    }

    #[tokio::test]
    async fn health_command() {
        let dispatcher = dispatcher(Arc::new(InMemoryFeedbackSink::new(1)));
        match dispatcher.dispatch(Command::CheckHealth, |_| {}).await.unwrap() {
            Outcome::Health(status) => assert!(status.is_healthy()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn metrics_command_returns_exposition_text() {
        let dispatcher = dispatcher(Arc::new(InMemoryFeedbackSink::new(1)));
        match dispatcher.dispatch_action("metrics", "", |_| {}).await.unwrap() {
            Outcome::Metrics(text) => assert!(text.contains("spam_detector_")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
