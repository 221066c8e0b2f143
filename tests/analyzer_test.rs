//! Integration tests for the rotating batch analyzer, driven by a scripted
//! in-memory provider.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use vigil::config::Config;
use vigil::services::{
    build_scorer, BatchAnalyzer, ResultCache, SnapshotFile, ThresholdScorer, Universe,
};
use vigil::sources::{FetchError, MarketData};
use vigil::types::{Bar, ContractDetail, Verdict};

/// Per-symbol behavior of the scripted provider.
#[derive(Clone)]
enum Script {
    /// Return these bars after an optional delay.
    Bars(Vec<Bar>, Duration),
    /// Provider answered with an empty payload.
    Empty,
    /// Fewer bars than the indicator floor.
    TooFewBars,
    /// Never completes within any reasonable test budget.
    Hang,
}

struct ScriptedProvider {
    scripts: HashMap<String, Script>,
}

impl ScriptedProvider {
    fn new(scripts: Vec<(&str, Script)>) -> Arc<Self> {
        Arc::new(Self {
            scripts: scripts
                .into_iter()
                .map(|(symbol, script)| (symbol.to_string(), script))
                .collect(),
        })
    }
}

#[async_trait]
impl MarketData for ScriptedProvider {
    async fn contract_detail(&self) -> Result<Vec<ContractDetail>, FetchError> {
        Err(FetchError::NoData)
    }

    async fn klines(&self, symbol: &str) -> Result<Vec<Bar>, FetchError> {
        match self.scripts.get(symbol) {
            Some(Script::Bars(bars, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(bars.clone())
            }
            Some(Script::Empty) => Err(FetchError::NoData),
            Some(Script::TooFewBars) => Err(FetchError::Insufficient { got: 10, need: 25 }),
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(120)).await;
                Err(FetchError::NoData)
            }
            None => Err(FetchError::NoData),
        }
    }
}

fn rising_bars(count: usize) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            Bar {
                time: 1_700_000_000 + i as i64 * 60,
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0 + (i % 5) as f64 * 40.0,
            }
        })
        .collect()
}

fn universe_of(symbols: &[&str]) -> Universe {
    let details: Vec<ContractDetail> = symbols
        .iter()
        .map(|symbol| {
            serde_json::from_value(serde_json::json!({
                "symbol": symbol,
                "quoteCoin": "USDT"
            }))
            .unwrap()
        })
        .collect();
    Universe::from_details(&details, "USDT")
}

fn fast_config(batch_size: usize) -> Config {
    Config {
        batch_size,
        cycle_delay: Duration::from_millis(5),
        symbol_timeout: Duration::from_millis(200),
        ..Config::default()
    }
}

fn temp_snapshot(name: &str) -> SnapshotFile {
    let path = std::env::temp_dir().join(format!("vigil_analyzer_{}.json", name));
    let _ = std::fs::remove_file(&path);
    SnapshotFile::new(path)
}

#[tokio::test]
async fn published_order_matches_universe_order() {
    // Completion order is adversarial: later symbols finish first.
    let symbols = ["AAA_USDT", "BBB_USDT", "CCC_USDT", "DDD_USDT", "EEE_USDT"];
    let scripts = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let delay = Duration::from_millis(((symbols.len() - i) * 20) as u64);
            (*s, Script::Bars(rising_bars(40), delay))
        })
        .collect();

    let universe = universe_of(&symbols);
    let (cache, mut rx) = ResultCache::new(universe.symbols.clone());
    let analyzer = BatchAnalyzer::new(
        ScriptedProvider::new(scripts),
        Arc::new(ThresholdScorer),
        cache,
        temp_snapshot("order"),
        universe,
        &fast_config(10),
    );

    analyzer.run_pass().await;

    let snapshot = rx.recv().await.unwrap();
    let order: Vec<&str> = snapshot.iter().map(|row| row.symbol.as_str()).collect();
    assert_eq!(order, symbols);
    for row in snapshot.iter() {
        assert_eq!(row.signal.verdict, Verdict::Long, "{} not scored", row.symbol);
    }
}

#[tokio::test]
async fn hung_symbol_fails_alone_within_its_timeout() {
    let scripts = vec![
        ("HUNG_USDT", Script::Hang),
        ("FAST_USDT", Script::Bars(rising_bars(40), Duration::from_millis(10))),
        ("EMPTY_USDT", Script::Empty),
    ];
    let universe = universe_of(&["HUNG_USDT", "FAST_USDT", "EMPTY_USDT"]);
    let (cache, _rx) = ResultCache::new(universe.symbols.clone());

    let analyzer = BatchAnalyzer::new(
        ScriptedProvider::new(scripts),
        Arc::new(ThresholdScorer),
        cache.clone(),
        temp_snapshot("hang"),
        universe,
        &fast_config(10),
    );

    let started = Instant::now();
    analyzer.run_pass().await;
    let elapsed = started.elapsed();

    // The batch is bounded by the 200ms per-symbol timeout plus scheduling
    // slack, not by the hung symbol's 120s sleep.
    assert!(elapsed < Duration::from_secs(2), "pass took {:?}", elapsed);

    assert_eq!(cache.get("HUNG_USDT").unwrap().verdict, Verdict::RequestFailed);
    assert_eq!(cache.get("FAST_USDT").unwrap().verdict, Verdict::Long);
    assert_eq!(cache.get("EMPTY_USDT").unwrap().verdict, Verdict::NoResponse);
}

#[tokio::test]
async fn forty_five_symbols_publish_exactly_twice_per_pass() {
    let names: Vec<String> = (0..45).map(|i| format!("SYM{:02}_USDT", i)).collect();
    let symbol_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let scripts = symbol_refs
        .iter()
        .map(|s| (*s, Script::Bars(rising_bars(40), Duration::ZERO)))
        .collect();

    let universe = universe_of(&symbol_refs);
    let (cache, mut rx) = ResultCache::new(universe.symbols.clone());

    let analyzer = BatchAnalyzer::new(
        ScriptedProvider::new(scripts),
        Arc::new(ThresholdScorer),
        cache.clone(),
        temp_snapshot("two_batches"),
        universe,
        &fast_config(30),
    );

    analyzer.run_pass().await;

    // Exactly two snapshots: one per batch (30 + 15).
    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(rx.try_recv().is_err(), "expected exactly two publishes");

    // After the first batch the tail of the universe is still pending;
    // after the second, every symbol has been merged exactly once.
    let pending_in_first = first
        .iter()
        .filter(|row| row.signal.verdict == Verdict::Pending)
        .count();
    assert_eq!(pending_in_first, 15);
    assert!(second.iter().all(|row| row.signal.verdict == Verdict::Long));
    assert_eq!(second.len(), 45);
}

#[tokio::test]
async fn end_to_end_rising_btc_and_silent_eth() {
    let scripts = vec![
        ("BTC_USDT", Script::Bars(rising_bars(30), Duration::ZERO)),
        ("ETH_USDT", Script::Empty),
    ];
    let universe = universe_of(&["BTC_USDT", "ETH_USDT"]);
    let (cache, mut rx) = ResultCache::new(universe.symbols.clone());

    // Default policy: the per-cycle classifier.
    let config = fast_config(30);
    let analyzer = BatchAnalyzer::new(
        ScriptedProvider::new(scripts),
        build_scorer(&config),
        cache,
        temp_snapshot("end_to_end"),
        universe,
        &config,
    );

    analyzer.run_pass().await;

    let snapshot = rx.recv().await.unwrap();
    assert_eq!(snapshot.len(), 2);

    let btc = &snapshot[0];
    assert_eq!(btc.symbol, "BTC_USDT");
    match btc.signal.verdict {
        Verdict::Long => {}
        Verdict::NoRecommendation => {
            assert!(
                btc.signal.confidence.unwrap() > 50.0,
                "expected an up-leaning signal, got {:?}",
                btc.signal
            );
        }
        other => panic!("expected a Long-leaning signal, got {:?}", other),
    }

    let eth = &snapshot[1];
    assert_eq!(eth.symbol, "ETH_USDT");
    assert_eq!(eth.signal.verdict, Verdict::NoResponse);
}

#[tokio::test]
async fn per_symbol_failures_do_not_block_scoring() {
    let scripts = vec![
        ("OK_USDT", Script::Bars(rising_bars(40), Duration::ZERO)),
        ("SHORT_HISTORY_USDT", Script::TooFewBars),
        ("GONE_USDT", Script::Empty),
    ];
    let universe = universe_of(&["OK_USDT", "SHORT_HISTORY_USDT", "GONE_USDT"]);
    let (cache, _rx) = ResultCache::new(universe.symbols.clone());

    let analyzer = BatchAnalyzer::new(
        ScriptedProvider::new(scripts),
        Arc::new(ThresholdScorer),
        cache.clone(),
        temp_snapshot("failures"),
        universe,
        &fast_config(10),
    );

    analyzer.run_pass().await;

    assert_eq!(cache.get("OK_USDT").unwrap().verdict, Verdict::Long);
    assert_eq!(
        cache.get("SHORT_HISTORY_USDT").unwrap().verdict,
        Verdict::InsufficientData
    );
    assert_eq!(cache.get("GONE_USDT").unwrap().verdict, Verdict::NoResponse);
}

#[tokio::test]
async fn pass_persists_snapshot_to_disk() {
    let scripts = vec![("BTC_USDT", Script::Bars(rising_bars(40), Duration::ZERO))];
    let universe = universe_of(&["BTC_USDT"]);
    let (cache, _rx) = ResultCache::new(universe.symbols.clone());

    let snapshot_file = temp_snapshot("persists");
    let reader = temp_snapshot_reader("persists");

    let analyzer = BatchAnalyzer::new(
        ScriptedProvider::new(scripts),
        Arc::new(ThresholdScorer),
        cache,
        snapshot_file,
        universe,
        &fast_config(10),
    );

    analyzer.run_pass().await;

    let saved = reader.load().expect("snapshot file written");
    assert_eq!(saved["BTC_USDT"].verdict, Verdict::Long);
}

/// A second handle onto the same path as `temp_snapshot(name)`, without
/// deleting the file.
fn temp_snapshot_reader(name: &str) -> SnapshotFile {
    SnapshotFile::new(std::env::temp_dir().join(format!("vigil_analyzer_{}.json", name)))
}
