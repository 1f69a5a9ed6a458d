//! Analyzing many series at once.
//!
//! A batch is typically one series per ticker. With the `parallel` feature
//! the series are spread over the rayon pool once the batch is large
//! enough; otherwise they are analyzed in order.
//!
//! ```toml
//! [dependencies]
//! stockta = { version = "0.1", features = ["parallel"] }
//! ```

use tracing::debug;

use crate::engine::{AnalysisReport, Engine};
use crate::error::Result;
use crate::series::Series;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies a per-series computation across a batch.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Batches smaller than this are processed sequentially.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    min_parallel_threshold: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Creates a processor that parallelizes batches of four or more series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_threshold: 4,
        }
    }

    /// Sets the minimum batch size for parallel processing.
    #[must_use]
    pub const fn min_parallel_threshold(mut self, threshold: usize) -> Self {
        self.min_parallel_threshold = threshold;
        self
    }

    /// Applies `f` to every series, keeping the input order.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    #[cfg(feature = "parallel")]
    pub fn process<F, R>(&self, series: &[Series], f: F) -> Result<Vec<R>>
    where
        F: Fn(&Series) -> Result<R> + Send + Sync,
        R: Send,
    {
        if series.len() < self.min_parallel_threshold {
            series.iter().map(f).collect()
        } else {
            debug!(series = series.len(), "processing batch in parallel");
            series.par_iter().map(f).collect()
        }
    }

    /// Applies `f` to every series, keeping the input order.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    #[cfg(not(feature = "parallel"))]
    pub fn process<F, R>(&self, series: &[Series], f: F) -> Result<Vec<R>>
    where
        F: Fn(&Series) -> Result<R>,
    {
        series.iter().map(f).collect()
    }
}

/// Analyzes every series with `engine`.
///
/// # Errors
///
/// Returns the first error reported by [`Engine::analyze`].
pub fn analyze_batch(engine: &Engine, series: &[Series]) -> Result<Vec<AnalysisReport>> {
    debug!(series = series.len(), "analyzing batch");
    BatchProcessor::new().process(series, |s| engine.analyze(s))
}
