//! HTTP scorer and client tests against a mockito server.

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use spamcheck::scorer::{HttpScorer, Scorer};
use spamcheck::{ClientConfig, Error, SpamClient};
use tokio_test::{assert_err, assert_ok};

const SPAM: &str = r#"{"is_spam": true, "spam_probability": 0.95, "prediction": "Spam"}"#;
const HAM: &str = r#"{"is_spam": false, "spam_probability": 0.02, "prediction": "Not Spam"}"#;

fn config(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new().with_base_url(server.url())
}

async fn mock_predict(server: &mut ServerGuard, message: &str, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("POST", "/predict")
        .match_body(Matcher::Json(json!({ "message": message })))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn score_posts_message_and_echoes_text() {
    let mut server = Server::new_async().await;
    let mock = mock_predict(&mut server, "free money now", 200, SPAM).await;

    let scorer = HttpScorer::new(&config(&server)).unwrap();
    let result = scorer.score("free money now").await.unwrap();

    assert!(result.is_spam);
    assert_eq!(result.spam_probability, 0.95);
    assert_eq!(result.text, "free money now");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_remote_error() {
    let mut server = Server::new_async().await;
    let _mock = mock_predict(&mut server, "hello", 500, r#"{"error": "Model not trained yet"}"#).await;

    let scorer = HttpScorer::new(&config(&server)).unwrap();
    match scorer.score("hello").await {
        Err(Error::Remote { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Model not trained yet");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn payload_without_required_fields_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = mock_predict(&mut server, "hello", 200, r#"{"prediction": "Spam"}"#).await;

    let scorer = HttpScorer::new(&config(&server)).unwrap();
    let err = assert_err!(scorer.score("hello").await);
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let scorer = HttpScorer::new(&ClientConfig::new().with_base_url("http://127.0.0.1:1")).unwrap();
    let err = assert_err!(scorer.score("hello").await);
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_request_failure());
}

#[tokio::test]
async fn health_endpoint() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "healthy", "timestamp": "2024-05-01T12:00:00"}"#)
        .create_async()
        .await;

    let scorer = HttpScorer::new(&config(&server)).unwrap();
    let health = assert_ok!(scorer.health().await);
    assert!(health.is_healthy());
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_text() {
    let mut server = Server::new_async().await;
    let body = "# HELP spam_detector_predictions_total Predictions served\n\
                # TYPE spam_detector_predictions_total counter\n\
                spam_detector_predictions_total 42\n";
    let ok = server
        .mock("GET", "/metrics")
        .with_status(200)
        .with_header("content-type", "text/plain; version=0.0.4")
        .with_body(body)
        .create_async()
        .await;

    let client = SpamClient::builder().config(config(&server)).build().unwrap();
    let text = assert_ok!(client.metrics().await);
    assert!(text.contains("spam_detector_"));
    assert!(text.ends_with("spam_detector_predictions_total 42\n"));
    ok.assert_async().await;

    ok.remove_async().await;
    let _missing = server
        .mock("GET", "/metrics")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;
    let err = assert_err!(client.metrics().await);
    assert!(matches!(err, Error::Remote { status: 404, .. }));
}

#[tokio::test]
async fn batch_over_http_keeps_input_order() {
    let mut server = Server::new_async().await;
    let m1 = mock_predict(&mut server, "free money now", 200, SPAM).await;
    let m2 = mock_predict(&mut server, "meeting at 3pm", 200, HAM).await;
    let m3 = mock_predict(&mut server, "win a prize", 200, SPAM).await;

    let client = SpamClient::builder()
        .config(config(&server))
        .chunk_size(2)
        .build()
        .unwrap();

    let mut progress = Vec::new();
    let report = client
        .analyze_batch_text("free money now\nmeeting at 3pm\nwin a prize", |p| {
            progress.push(p.processed)
        })
        .await
        .unwrap();

    let flags: Vec<bool> = report.results.iter().map(|r| r.is_spam).collect();
    assert_eq!(flags, vec![true, false, true]);
    assert_eq!(report.results[1].text, "meeting at 3pm");
    assert_eq!(progress, vec![2, 3]);
    assert_eq!(report.summary.spam, 2);
    m1.assert_async().await;
    m2.assert_async().await;
    m3.assert_async().await;
}

#[tokio::test]
async fn one_failing_message_fails_the_batch() {
    let mut server = Server::new_async().await;
    let _ok = mock_predict(&mut server, "meeting at 3pm", 200, HAM).await;
    let _bad = mock_predict(&mut server, "free money now", 500, r#"{"error": "boom"}"#).await;
    let later = server
        .mock("POST", "/predict")
        .match_body(Matcher::Json(json!({ "message": "win a prize" })))
        .with_status(200)
        .with_body(SPAM)
        .expect(0)
        .create_async()
        .await;

    let client = SpamClient::builder()
        .config(config(&server))
        .chunk_size(2)
        .build()
        .unwrap();

    let err = client
        .analyze_batch(
            vec![
                "meeting at 3pm".into(),
                "free money now".into(),
                "win a prize".into(),
            ],
            |_| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Scorer { index: 1, .. }));
    assert!(matches!(err.root_cause(), Error::Remote { status: 500, .. }));
    later.assert_async().await;
}
