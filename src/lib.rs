//! # spamcheck
//!
//! Client runtime for a remote spam-scoring service.
//!
//! ## Overview
//!
//! The service classifies one message per call (`POST /predict`). This crate wraps
//! that call and adds what a front-end needs around it: input limits, chunked
//! batch submission with bounded concurrency and progress reporting, aggregate
//! summaries, and a channel for user feedback on predictions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spamcheck::SpamClient;
//!
//! #[tokio::main]
//! async fn main() -> spamcheck::Result<()> {
//!     let client = SpamClient::builder()
//!         .base_url("http://localhost:5000")
//!         .chunk_size(10)
//!         .build()?;
//!
//!     let report = client
//!         .analyze_batch_text("free money now\nmeeting at 3pm", |p| println!("{p}"))
//!         .await?;
//!     println!("{} of {} flagged", report.summary.spam, report.summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Chunked, order-preserving batch submission |
//! | [`client`] | [`SpamClient`] façade and its builder |
//! | [`config`] | Defaults, environment and YAML configuration |
//! | [`dispatch`] | Command table mapping front-end actions to client calls |
//! | [`feedback`] | Feedback events and sinks |
//! | [`input`] | Caller-side input checks |
//! | [`scorer`] | The [`Scorer`] seam and its HTTP implementation |
//! | [`transport`] | reqwest-based HTTP transport |
//! | [`types`] | Wire types |

pub mod batch;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod feedback;
pub mod input;
pub mod scorer;
pub mod transport;
pub mod types;

pub use batch::{BatchConfig, BatchSubmitter, BatchSummary, Progress};
pub use client::{Analysis, BatchReport, SpamClient, SpamClientBuilder};
pub use config::ClientConfig;
pub use dispatch::{Command, Dispatcher, Outcome};
pub use feedback::{FeedbackEvent, FeedbackSink, Verdict};
pub use scorer::{HttpScorer, Scorer};
pub use types::{HealthStatus, ScoreResult};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
