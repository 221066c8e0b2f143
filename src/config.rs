use crate::types::KlineInterval;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which scoring strategy the analyzer runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerPolicy {
    /// Per-cycle logistic probability model over the indicator features.
    #[default]
    Classifier,
    /// MACD direction with RSI-distance confidence, no model fit.
    Threshold,
}

impl ScorerPolicy {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classifier" | "model" => Some(Self::Classifier),
            "threshold" | "indicator" => Some(Self::Threshold),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Base URL of the contract market-data API.
    pub mexc_base_url: String,
    /// Settlement currency the universe is filtered to.
    pub quote_currency: String,
    /// Symbols analyzed concurrently per batch.
    pub batch_size: usize,
    /// Delay after each batch before the next one starts.
    pub cycle_delay: Duration,
    /// Per-symbol fetch budget; a slower symbol yields a request failure.
    pub symbol_timeout: Duration,
    /// Bar interval requested from the provider.
    pub kline_interval: KlineInterval,
    /// Bars requested per symbol per cycle.
    pub lookback_limit: u32,
    /// Minimum bars required before indicators are attempted.
    pub min_bars: usize,
    /// Scoring strategy.
    pub scorer_policy: ScorerPolicy,
    /// Discount model probabilities by the contract's margin rates.
    pub risk_adjust: bool,
    /// Path of the persisted snapshot file.
    pub snapshot_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            mexc_base_url: "https://contract.mexc.com".to_string(),
            quote_currency: "USDT".to_string(),
            batch_size: 30,
            cycle_delay: Duration::from_secs(60),
            symbol_timeout: Duration::from_secs(5),
            kline_interval: KlineInterval::OneMinute,
            lookback_limit: 100,
            min_bars: 25,
            scorer_policy: ScorerPolicy::Classifier,
            risk_adjust: true,
            snapshot_path: PathBuf::from("signals.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// documented defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            mexc_base_url: env::var("MEXC_BASE_URL").unwrap_or(defaults.mexc_base_url),
            quote_currency: env::var("QUOTE_CURRENCY").unwrap_or(defaults.quote_currency),
            batch_size: env::var("BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.batch_size),
            cycle_delay: env::var("CYCLE_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cycle_delay),
            symbol_timeout: env::var("SYMBOL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u64| n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.symbol_timeout),
            kline_interval: env::var("KLINE_INTERVAL")
                .ok()
                .and_then(|v| KlineInterval::from_str(&v))
                .unwrap_or(defaults.kline_interval),
            lookback_limit: env::var("LOOKBACK_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lookback_limit),
            min_bars: env::var("MIN_BARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_bars),
            scorer_policy: env::var("SCORER_POLICY")
                .ok()
                .and_then(|v| ScorerPolicy::from_str(&v))
                .unwrap_or(defaults.scorer_policy),
            risk_adjust: env::var("RISK_ADJUST")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.risk_adjust),
            snapshot_path: env::var("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
        }
    }
}
