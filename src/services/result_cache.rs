//! Shared symbol -> signal cache.
//!
//! The analyzer is the only writer; the serving layer and any number of
//! WebSocket pumps read concurrently. Every universe symbol has exactly one
//! live entry at all times, seeded with the pending placeholder.

use crate::types::{Signal, SymbolSignal};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// A full ordered result set, published after every batch.
pub type Snapshot = Arc<Vec<SymbolSignal>>;

const BROADCAST_CAPACITY: usize = 64;

pub struct ResultCache {
    /// Universe symbols in provider order; fixed after construction.
    symbols: Vec<String>,
    entries: DashMap<String, Signal>,
    tx: broadcast::Sender<Snapshot>,
}

impl ResultCache {
    /// Create a cache covering exactly `symbols`, each seeded pending.
    pub fn new(symbols: Vec<String>) -> (Arc<Self>, broadcast::Receiver<Snapshot>) {
        let (tx, rx) = broadcast::channel(BROADCAST_CAPACITY);

        let entries = DashMap::new();
        for symbol in &symbols {
            entries.insert(symbol.clone(), Signal::pending());
        }

        let cache = Arc::new(Self {
            symbols,
            entries,
            tx,
        });
        (cache, rx)
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// The ordered universe.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Current signal for one symbol, if it is part of the universe.
    pub fn get(&self, symbol: &str) -> Option<Signal> {
        self.entries.get(symbol).map(|entry| *entry.value())
    }

    /// Merge a batch of results. Symbols outside the universe are dropped:
    /// the cache covers the universe exactly, nothing more.
    pub fn merge(&self, results: impl IntoIterator<Item = (String, Signal)>) {
        for (symbol, signal) in results {
            if let Some(mut entry) = self.entries.get_mut(&symbol) {
                *entry = signal;
            }
        }
    }

    /// Adopt persisted signals from a previous run. Only symbols in the
    /// current universe are restored; stale entries are ignored.
    pub fn preload(&self, saved: BTreeMap<String, Signal>) -> usize {
        let mut restored = 0;
        for (symbol, signal) in saved {
            if let Some(mut entry) = self.entries.get_mut(&symbol) {
                *entry = signal;
                restored += 1;
            }
        }
        restored
    }

    /// The full result set in universe order, regardless of which symbols
    /// completed most recently.
    pub fn snapshot(&self) -> Vec<SymbolSignal> {
        self.symbols
            .iter()
            .map(|symbol| SymbolSignal {
                symbol: symbol.clone(),
                signal: self.get(symbol).unwrap_or_else(Signal::pending),
            })
            .collect()
    }

    /// Flat map view for persistence.
    pub fn to_map(&self) -> BTreeMap<String, Signal> {
        self.symbols
            .iter()
            .filter_map(|symbol| self.get(symbol).map(|signal| (symbol.clone(), signal)))
            .collect()
    }

    /// Publish the current snapshot to all subscribers. Returns the number
    /// of receivers the snapshot reached.
    pub fn publish(&self) -> usize {
        self.tx.send(Arc::new(self.snapshot())).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    fn universe() -> Vec<String> {
        vec![
            "BTC_USDT".to_string(),
            "ETH_USDT".to_string(),
            "SOL_USDT".to_string(),
        ]
    }

    #[test]
    fn test_new_seeds_pending() {
        let (cache, _rx) = ResultCache::new(universe());
        for row in cache.snapshot() {
            assert_eq!(row.signal.verdict, Verdict::Pending);
        }
    }

    #[test]
    fn test_merge_updates_known_symbols() {
        let (cache, _rx) = ResultCache::new(universe());
        cache.merge(vec![("ETH_USDT".to_string(), Signal::long(90.0))]);

        assert_eq!(cache.get("ETH_USDT").unwrap().verdict, Verdict::Long);
        assert_eq!(cache.get("BTC_USDT").unwrap().verdict, Verdict::Pending);
    }

    #[test]
    fn test_merge_ignores_unknown_symbols() {
        let (cache, _rx) = ResultCache::new(universe());
        cache.merge(vec![("XRP_USDT".to_string(), Signal::long(90.0))]);

        assert!(cache.get("XRP_USDT").is_none());
        assert_eq!(cache.snapshot().len(), 3);
    }

    #[test]
    fn test_snapshot_preserves_universe_order() {
        let (cache, _rx) = ResultCache::new(universe());
        // Merge in reverse completion order.
        cache.merge(vec![
            ("SOL_USDT".to_string(), Signal::short(70.0)),
            ("BTC_USDT".to_string(), Signal::long(88.0)),
        ]);

        let snapshot = cache.snapshot();
        let order: Vec<&str> = snapshot.iter().map(|row| row.symbol.as_str()).collect();
        assert_eq!(order, vec!["BTC_USDT", "ETH_USDT", "SOL_USDT"]);
    }

    #[test]
    fn test_preload_restores_only_universe_symbols() {
        let (cache, _rx) = ResultCache::new(universe());

        let mut saved = BTreeMap::new();
        saved.insert("BTC_USDT".to_string(), Signal::long(75.0));
        saved.insert("DELISTED_USDT".to_string(), Signal::short(60.0));

        let restored = cache.preload(saved);
        assert_eq!(restored, 1);
        assert_eq!(cache.get("BTC_USDT").unwrap().verdict, Verdict::Long);
        assert!(cache.get("DELISTED_USDT").is_none());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let (cache, mut rx) = ResultCache::new(universe());
        cache.merge(vec![("BTC_USDT".to_string(), Signal::long(95.0))]);

        let receivers = cache.publish();
        assert_eq!(receivers, 1);

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].symbol, "BTC_USDT");
        assert_eq!(snapshot[0].signal.verdict, Verdict::Long);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let (cache, rx) = ResultCache::new(universe());
        drop(rx);
        assert_eq!(cache.publish(), 0);
    }

    #[test]
    fn test_to_map_round_trips_through_snapshot() {
        let (cache, _rx) = ResultCache::new(universe());
        cache.merge(vec![("ETH_USDT".to_string(), Signal::failure(Verdict::NoResponse))]);

        let map = cache.to_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map["ETH_USDT"].verdict, Verdict::NoResponse);
    }
}
