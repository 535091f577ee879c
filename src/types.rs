//! Wire types for the scoring service.
//!
//! The service speaks plain JSON: `POST /predict` with [`PredictRequest`] answers with
//! a [`ScoreResult`] (or an [`ErrorBody`] on non-2xx), and `GET /health` answers with
//! a [`HealthStatus`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Body of a single scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub message: String,
}

impl PredictRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Classification of one message as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub is_spam: bool,
    /// Probability of the spam class, in `[0, 1]`.
    pub spam_probability: f64,
    /// Human-readable label, e.g. "Spam" / "Not Spam".
    pub prediction: String,
    /// Echo of the scored message. Filled in locally when the service omits it or sends null.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ham_probability: Option<f64>,
}

impl ScoreResult {
    /// Decode and check a response body.
    ///
    /// Missing required fields and probabilities outside `[0, 1]` are reported as
    /// [`Error::MalformedResponse`].
    pub fn from_response_body(body: &[u8]) -> Result<Self> {
        let result: ScoreResult = serde_json::from_slice(body)
            .map_err(|e| Error::malformed(format!("invalid prediction payload: {e}")))?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("spam_probability", self.spam_probability)?;
        if let Some(p) = self.ham_probability {
            check_probability("ham_probability", p)?;
        }
        Ok(())
    }

    /// Confidence as a whole percentage, the way results are usually displayed.
    pub fn confidence_percent(&self) -> u8 {
        (self.spam_probability * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub(crate) fn with_text_fallback(mut self, message: &str) -> Self {
        if self.text.is_empty() {
            self.text = message.to_string();
        }
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn check_probability(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}

/// Error payload the service sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_payload() {
        let body = br#"{"is_spam": true, "spam_probability": 0.95, "prediction": "Spam"}"#;
        let result = ScoreResult::from_response_body(body).unwrap();
        assert!(result.is_spam);
        assert_eq!(result.prediction, "Spam");
        assert!(result.text.is_empty());
        assert_eq!(result.confidence_percent(), 95);

        let result = result.with_text_fallback("free money now");
        assert_eq!(result.text, "free money now");
    }

    #[test]
    fn server_echo_is_kept() {
        let body = br#"{"is_spam": false, "spam_probability": 0.02, "prediction": "Not Spam",
                        "text": "meeting at 3pm", "ham_probability": 0.98}"#;
        let result = ScoreResult::from_response_body(body)
            .unwrap()
            .with_text_fallback("something else");
        assert_eq!(result.text, "meeting at 3pm");
        assert_eq!(result.ham_probability, Some(0.98));
    }

    #[test]
    fn null_text_echo_is_filled_in() {
        let body = br#"{"is_spam": true, "spam_probability": 0.9, "prediction": "Spam", "text": null}"#;
        let result = ScoreResult::from_response_body(body)
            .unwrap()
            .with_text_fallback("win a prize");
        assert!(result.is_spam);
        assert_eq!(result.text, "win a prize");
    }

    #[test]
    fn missing_field_is_malformed() {
        let body = br#"{"spam_probability": 0.5, "prediction": "Spam"}"#;
        let err = ScoreResult::from_response_body(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(err.to_string().contains("is_spam"));
    }

    #[test]
    fn percentage_scale_probability_is_malformed() {
        let body = br#"{"is_spam": true, "spam_probability": 95.0, "prediction": "Spam"}"#;
        let err = ScoreResult::from_response_body(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn health_status_is_case_insensitive() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "Healthy", "timestamp": "2024-01-01T00:00:00"}"#)
                .unwrap();
        assert!(health.is_healthy());
        let health: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!health.is_healthy());
    }

    #[test]
    fn request_serializes_as_message_object() {
        let json = serde_json::to_value(PredictRequest::new("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "hi"}));
    }
}
