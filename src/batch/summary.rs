use crate::types::ScoreResult;
use serde::Serialize;

/// Aggregate view over a finished batch, as shown next to the per-message table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub spam: usize,
    pub ham: usize,
    /// Mean spam probability over all results, `0.0` for an empty batch.
    pub mean_spam_probability: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[ScoreResult]) -> Self {
        let total = results.len();
        let spam = results.iter().filter(|r| r.is_spam).count();
        let mean_spam_probability = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.spam_probability).sum::<f64>() / total as f64
        };
        Self {
            total,
            spam,
            ham: total - spam,
            mean_spam_probability,
        }
    }

    pub fn spam_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.spam as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(is_spam: bool, p: f64) -> ScoreResult {
        ScoreResult {
            is_spam,
            spam_probability: p,
            prediction: if is_spam { "Spam" } else { "Not Spam" }.to_string(),
            text: String::new(),
            ham_probability: None,
        }
    }

    #[test]
    fn counts_spam_and_ham() {
        let summary = BatchSummary::from_results(&[
            result(true, 0.9),
            result(false, 0.1),
            result(true, 0.8),
            result(false, 0.2),
        ]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.spam, 2);
        assert_eq!(summary.ham, 2);
        assert!((summary.spam_rate() - 0.5).abs() < f64::EPSILON);
        assert!((summary.mean_spam_probability - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_batch() {
        let summary = BatchSummary::from_results(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.spam_rate(), 0.0);
        assert_eq!(summary.mean_spam_probability, 0.0);
    }
}
