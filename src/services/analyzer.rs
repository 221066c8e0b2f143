//! The rotating batch-analysis engine.
//!
//! Partitions the symbol universe into bounded batches, fetches and scores
//! every symbol of a batch concurrently under a per-symbol timeout, merges
//! the results into the shared cache, persists the cache, publishes the
//! full ordered snapshot, then sleeps before the next batch. One symbol's
//! failure never touches its siblings; only process shutdown stops the loop.

use crate::config::Config;
use crate::services::result_cache::ResultCache;
use crate::services::scoring::Scorer;
use crate::services::snapshot_file::SnapshotFile;
use crate::services::universe::Universe;
use crate::sources::MarketData;
use crate::types::{Signal, Verdict};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub struct BatchAnalyzer {
    provider: Arc<dyn MarketData>,
    scorer: Arc<dyn Scorer>,
    cache: Arc<ResultCache>,
    snapshot_file: SnapshotFile,
    universe: Universe,
    batch_size: usize,
    symbol_timeout: Duration,
    cycle_delay: Duration,
}

impl BatchAnalyzer {
    pub fn new(
        provider: Arc<dyn MarketData>,
        scorer: Arc<dyn Scorer>,
        cache: Arc<ResultCache>,
        snapshot_file: SnapshotFile,
        universe: Universe,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            scorer,
            cache,
            snapshot_file,
            universe,
            batch_size: config.batch_size.max(1),
            symbol_timeout: config.symbol_timeout,
            cycle_delay: config.cycle_delay,
        }
    }

    /// Loop forever, one pass over the whole universe after another.
    pub async fn run(self) {
        if self.universe.is_empty() {
            warn!("Universe is empty; analyzer has nothing to do");
            return;
        }

        info!(
            "Starting analysis loop: {} symbols, batches of {}, {:?} between batches, scorer '{}'",
            self.universe.len(),
            self.batch_size,
            self.cycle_delay,
            self.scorer.name()
        );

        loop {
            self.run_pass().await;
        }
    }

    /// One full sweep over the universe. Batches run strictly one after
    /// another; the inter-batch delay applies after every batch, including
    /// the last one of a pass.
    pub async fn run_pass(&self) {
        for batch in self.universe.symbols.chunks(self.batch_size) {
            self.run_batch(batch).await;
            tokio::time::sleep(self.cycle_delay).await;
        }
    }

    async fn run_batch(&self, batch: &[String]) {
        debug!("Analyzing batch of {} symbols", batch.len());

        let results = join_all(batch.iter().map(|symbol| self.analyze_symbol(symbol))).await;

        let failures = results
            .iter()
            .filter(|(_, signal)| signal.verdict.is_failure())
            .count();

        self.cache.merge(results);

        if let Err(e) = self.snapshot_file.store(&self.cache.to_map()) {
            warn!("Failed to persist snapshot: {}", e);
        }

        let receivers = self.cache.publish();
        debug!(
            "Batch done: {} symbols ({} failed), snapshot sent to {} subscribers",
            batch.len(),
            failures,
            receivers
        );
    }

    /// Fetch and score one symbol, converting every failure mode into a
    /// verdict. The timeout bounds the fetch; a symbol that exceeds it is
    /// cancelled without affecting the rest of the batch.
    async fn analyze_symbol(&self, symbol: &str) -> (String, Signal) {
        let signal = match timeout(self.symbol_timeout, self.provider.klines(symbol)).await {
            Err(_) => {
                debug!("{}: fetch timed out after {:?}", symbol, self.symbol_timeout);
                Signal::failure(Verdict::RequestFailed)
            }
            Ok(Err(e)) => {
                debug!("{}: {}", symbol, e);
                Signal::failure(e.verdict())
            }
            Ok(Ok(bars)) => self.scorer.score(&bars, self.universe.meta(symbol)),
        };

        (symbol.to_string(), signal)
    }
}
