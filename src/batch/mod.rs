//! Chunked batch submission.
//!
//! # Batch Submission Module
//!
//! Scores a list of messages against the remote service without flooding it: the
//! input is cut into fixed-size chunks, every item of a chunk is scored
//! concurrently, and the next chunk starts only once the current one has settled.
//! At most `chunk_size` calls are ever outstanding.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchSubmitter`] | Drives a run: chunking, fail-fast joins, ordered accumulation |
//! | [`BatchConfig`] | Chunk size (also the concurrency cap) |
//! | [`Progress`] | Cumulative progress, emitted once per completed chunk |
//! | [`BatchSummary`] | Spam/ham counts over a finished run |
//!
//! ## Example
//!
//! ```rust
//! use spamcheck::batch::{BatchConfig, BatchSubmitter};
//!
//! # tokio_test::block_on(async {
//! let submitter = BatchSubmitter::new(BatchConfig::new().with_chunk_size(2))?;
//! let mut seen = Vec::new();
//! let lengths = submitter
//!     .run_with_progress(
//!         vec!["a", "bb", "ccc"],
//!         |s| async move { Ok::<_, spamcheck::Error>(s.len()) },
//!         |p| seen.push(p.processed),
//!     )
//!     .await?;
//! assert_eq!(lengths, vec![1, 2, 3]);
//! assert_eq!(seen, vec![2, 3]);
//! # Ok::<(), spamcheck::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Failure policy
//!
//! A run is all-or-nothing. The first failing item aborts the run with
//! [`crate::Error::Scorer`]; calls still pending in the same chunk are dropped
//! (cancelling them) and later chunks are never started.

mod progress;
mod submitter;
mod summary;

pub use progress::Progress;
pub use submitter::{BatchConfig, BatchSubmitter, DEFAULT_CHUNK_SIZE};
pub use summary::BatchSummary;
