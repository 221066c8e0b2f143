//! Signal scoring.
//!
//! A `Scorer` turns a fetched bar series (plus optional contract metadata)
//! into a published signal. The strategy is chosen once at startup so the
//! heavier model-fitting path can be swapped out without touching the
//! analyzer.

pub mod indicators;
pub mod logistic;

mod classifier;
mod threshold;

pub use classifier::ClassifierScorer;
pub use threshold::ThresholdScorer;

use crate::config::{Config, ScorerPolicy};
use crate::types::{Bar, ContractMeta, Signal};
use std::sync::Arc;

/// Scoring strategy. Implementations must be infallible at the interface:
/// internal numerical failures become failure-tagged signals, never panics
/// or errors.
pub trait Scorer: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Score one symbol's series. `meta` is the contract's margin metadata
    /// when the universe loader found any.
    fn score(&self, bars: &[Bar], meta: Option<&ContractMeta>) -> Signal;
}

/// Build the configured scoring strategy.
pub fn build_scorer(config: &Config) -> Arc<dyn Scorer> {
    match config.scorer_policy {
        ScorerPolicy::Classifier => Arc::new(ClassifierScorer::new(config.risk_adjust)),
        ScorerPolicy::Threshold => Arc::new(ThresholdScorer),
    }
}
