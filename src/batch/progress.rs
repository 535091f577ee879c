/// Cumulative progress of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Items scored so far, across all completed chunks.
    pub processed: usize,
    pub total: usize,
    /// 1-based number of the chunk that just completed.
    pub chunk: usize,
    pub chunks: usize,
}

impl Progress {
    pub fn new(processed: usize, total: usize, chunk: usize, chunks: usize) -> Self {
        Self {
            processed,
            total,
            chunk,
            chunks,
        }
    }

    /// Whole percentage, never above 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.processed.min(self.total) * 100 + self.total / 2) / self.total;
        pct as u8
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({}%)",
            self.processed,
            self.total,
            self.percent()
        )
    }
}
