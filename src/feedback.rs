//! User feedback on predictions.
//!
//! A user can mark a prediction as correct or incorrect. The client turns that into
//! a [`FeedbackEvent`] and hands it to a [`FeedbackSink`]; where it goes from there
//! (a log, a queue, a labelling tool) is the application's choice. The default sink
//! drops everything.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`FeedbackEvent`] | One verdict on one prediction |
//! | [`FeedbackSink`] | Trait for feedback destinations |
//! | [`NoopFeedbackSink`] | Default no-op sink (no collection) |
//! | [`InMemoryFeedbackSink`] | Bounded in-memory sink, handy in tests |
//! | [`LogFeedbackSink`] | Emits each event through `tracing` |

use crate::types::ScoreResult;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub event_id: String,
    pub message: String,
    pub predicted_spam: bool,
    pub spam_probability: f64,
    pub verdict: Verdict,
    pub timestamp: f64,
}

impl FeedbackEvent {
    pub fn new(result: &ScoreResult, verdict: Verdict) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            message: result.text.clone(),
            predicted_spam: result.is_spam,
            spam_probability: result.spam_probability,
            verdict,
            timestamp: timestamp(),
        }
    }

    /// The label the user says is right.
    pub fn actual_spam(&self) -> bool {
        match self.verdict {
            Verdict::Correct => self.predicted_spam,
            Verdict::Incorrect => !self.predicted_spam,
        }
    }
}

/// Feedback sink trait.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn report(&self, event: FeedbackEvent) -> Result<()>;
    async fn report_batch(&self, events: Vec<FeedbackEvent>) -> Result<()> {
        for e in events {
            self.report(e).await?;
        }
        Ok(())
    }
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// No-op sink (always available).
pub struct NoopFeedbackSink;

#[async_trait]
impl FeedbackSink for NoopFeedbackSink {
    async fn report(&self, _: FeedbackEvent) -> Result<()> {
        Ok(())
    }
}

/// Returns a no-op feedback sink.
pub fn noop_sink() -> Arc<dyn FeedbackSink> {
    Arc::new(NoopFeedbackSink)
}

/// In-memory sink keeping the most recent `max_events`.
pub struct InMemoryFeedbackSink {
    events: RwLock<Vec<FeedbackEvent>>,
    max_events: usize,
}

impl InMemoryFeedbackSink {
    pub fn new(max: usize) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            max_events: max.max(1),
        }
    }
    pub fn get_events(&self) -> Vec<FeedbackEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

#[async_trait]
impl FeedbackSink for InMemoryFeedbackSink {
    async fn report(&self, event: FeedbackEvent) -> Result<()> {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
            if events.len() > self.max_events {
                events.remove(0);
            }
        }
        Ok(())
    }
}

/// Logs every event at `info` level.
#[derive(Default)]
pub struct LogFeedbackSink;

#[async_trait]
impl FeedbackSink for LogFeedbackSink {
    async fn report(&self, event: FeedbackEvent) -> Result<()> {
        tracing::info!(
            event_id = %event.event_id,
            verdict = ?event.verdict,
            predicted_spam = event.predicted_spam,
            spam_probability = event.spam_probability,
            "prediction feedback"
        );
        Ok(())
    }
}
