//! Batch submitter.

use super::progress::Progress;
use crate::{Error, ErrorContext, Result};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_CHUNK_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Items per chunk, which is also the cap on concurrent scorer calls.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::configuration_with_context(
                "chunk size must be at least 1",
                ErrorContext::new()
                    .with_field_path("batch.chunk_size")
                    .with_details("got 0")
                    .with_source("batch_config"),
            ));
        }
        Ok(())
    }

    /// Number of chunks needed for `total` items.
    pub fn chunk_count(&self, total: usize) -> usize {
        total.div_ceil(self.chunk_size.max(1))
    }
}

/// State of one run, owned by the driving task and touched only between chunks.
struct BatchRun<R> {
    id: Uuid,
    total: usize,
    chunks: usize,
    completed_chunks: usize,
    results: Vec<R>,
}

impl<R> BatchRun<R> {
    fn new(total: usize, chunks: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            total,
            chunks,
            completed_chunks: 0,
            results: Vec::with_capacity(total),
        }
    }

    fn processed(&self) -> usize {
        self.results.len()
    }

    fn complete_chunk(&mut self, chunk_results: Vec<R>) -> Progress {
        self.results.extend(chunk_results);
        self.completed_chunks += 1;
        Progress::new(self.processed(), self.total, self.completed_chunks, self.chunks)
    }
}

/// Scores items chunk by chunk.
///
/// Holds no state between runs; one submitter can serve any number of
/// independent (even concurrent) runs.
#[derive(Debug, Clone)]
pub struct BatchSubmitter {
    config: BatchConfig,
}

impl BatchSubmitter {
    /// Fails with [`Error::Configuration`] if the chunk size is zero.
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_chunk_size(chunk_size: usize) -> Result<Self> {
        Self::new(BatchConfig::new().with_chunk_size(chunk_size))
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub async fn run<I, R, F, Fut>(&self, items: Vec<I>, scorer: F) -> Result<Vec<R>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        self.run_with_progress(items, scorer, |_| {}).await
    }

    /// Score every item, returning results in input order.
    ///
    /// `on_progress` is called once per completed chunk. An empty input returns
    /// immediately without calling either `scorer` or `on_progress`.
    pub async fn run_with_progress<I, R, F, Fut, P>(
        &self,
        items: Vec<I>,
        scorer: F,
        mut on_progress: P,
    ) -> Result<Vec<R>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<R>>,
        P: FnMut(Progress),
    {
        let chunk_size = self.config.chunk_size;
        let total = items.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let mut run = BatchRun::new(total, self.config.chunk_count(total));
        debug!(run_id = %run.id, total, chunk_size, chunks = run.chunks, "batch run started");

        let scorer = &scorer;
        let mut pending = items.into_iter();
        loop {
            let chunk: Vec<I> = pending.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let offset = run.processed();
            let calls = chunk.into_iter().enumerate().map(|(i, item)| {
                let call = scorer(item);
                async move { call.await.map_err(|e| Error::scorer(offset + i, e)) }
            });

            // try_join_all keeps input order and drops the remaining calls on the first error.
            let chunk_results = match try_join_all(calls).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(
                        run_id = %run.id,
                        chunk = run.completed_chunks + 1,
                        error = %e,
                        "batch run aborted"
                    );
                    return Err(e);
                }
            };

            let progress = run.complete_chunk(chunk_results);
            debug!(
                run_id = %run.id,
                chunk = progress.chunk,
                processed = progress.processed,
                total,
                "chunk completed"
            );
            on_progress(progress);
        }

        info!(
            run_id = %run.id,
            total,
            chunks = run.completed_chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch run finished"
        );
        Ok(run.results)
    }
}
