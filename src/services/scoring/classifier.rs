use super::indicators::{percent_change, rsi, sma};
use super::logistic::{LogisticRegression, LogisticModel};
use super::Scorer;
use crate::types::{Bar, ContractMeta, Signal, Verdict};
use ndarray::{Array1, Array2};

const RSI_PERIOD: usize = 14;
const FAST_MA: usize = 5;
const SLOW_MA: usize = 20;
const FEATURES: usize = 5;

const LONG_THRESHOLD: f64 = 0.85;
const SHORT_THRESHOLD: f64 = 0.15;

/// Scores a symbol by fitting a fresh logistic probability model on its own
/// recent history each cycle.
///
/// Per bar the features are {RSI, SMA5, SMA20, %volume-change,
/// %price-change}; the label is whether the next close is higher. The model
/// is fitted on all labeled rows and then scores the final, unlabeled bar.
/// With risk adjustment on, the probability is discounted by the contract's
/// combined margin rates before thresholding.
pub struct ClassifierScorer {
    risk_adjust: bool,
    trainer: LogisticRegression,
}

impl ClassifierScorer {
    pub fn new(risk_adjust: bool) -> Self {
        Self {
            risk_adjust,
            trainer: LogisticRegression::default(),
        }
    }

    fn probability_up(&self, bars: &[Bar]) -> Option<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let rsi_series = rsi(&closes, RSI_PERIOD);
        let ma_fast = sma(&closes, FAST_MA);
        let ma_slow = sma(&closes, SLOW_MA);
        let vol_chg = percent_change(&volumes);
        let prc_chg = percent_change(&closes);

        let mut rows: Vec<[f64; FEATURES]> = Vec::new();
        let mut labels: Vec<f64> = Vec::new();
        let mut latest: Option<[f64; FEATURES]> = None;

        // Rows inside the indicator warm-up window carry NaN and are
        // dropped; the final bar has no label and becomes the query row.
        for i in 0..bars.len() {
            let features = [rsi_series[i], ma_fast[i], ma_slow[i], vol_chg[i], prc_chg[i]];
            if features.iter().any(|v| !v.is_finite()) {
                continue;
            }
            if i + 1 < bars.len() {
                rows.push(features);
                labels.push(if closes[i + 1] > closes[i] { 1.0 } else { 0.0 });
            } else {
                latest = Some(features);
            }
        }

        let latest = latest?;
        if rows.is_empty() {
            return None;
        }

        let stats = column_stats(&rows);
        let x = Array2::from_shape_fn((rows.len(), FEATURES), |(r, c)| {
            (rows[r][c] - stats[c].0) / stats[c].1
        });
        let y = Array1::from_vec(labels);
        let query = Array1::from_shape_fn(FEATURES, |c| (latest[c] - stats[c].0) / stats[c].1);

        let model: LogisticModel = self.trainer.fit(&x, &y).ok()?;
        let p = model.predict_proba(&query);
        p.is_finite().then_some(p)
    }
}

impl Scorer for ClassifierScorer {
    fn name(&self) -> &'static str {
        "classifier"
    }

    fn score(&self, bars: &[Bar], meta: Option<&ContractMeta>) -> Signal {
        let Some(p_up) = self.probability_up(bars) else {
            return Signal::failure(Verdict::AnalysisFailed);
        };

        let risk = if self.risk_adjust {
            meta.map(ContractMeta::total_risk).unwrap_or(0.0)
        } else {
            0.0
        };
        let adjusted = p_up * (1.0 - risk);
        if !adjusted.is_finite() {
            return Signal::failure(Verdict::AnalysisFailed);
        }

        if adjusted > LONG_THRESHOLD {
            Signal::long(adjusted * 100.0)
        } else if adjusted < SHORT_THRESHOLD {
            Signal::short((1.0 - adjusted) * 100.0)
        } else {
            Signal::no_recommendation(adjusted * 100.0)
        }
    }
}

/// Per-column mean and standard deviation. Degenerate columns keep a unit
/// divisor so constant features contribute nothing instead of NaN.
fn column_stats(rows: &[[f64; FEATURES]]) -> [(f64, f64); FEATURES] {
    let n = rows.len() as f64;
    let mut stats = [(0.0, 1.0); FEATURES];

    for c in 0..FEATURES {
        let mean = rows.iter().map(|r| r[c]).sum::<f64>() / n;
        let var = rows.iter().map(|r| (r[c] - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        stats[c] = (mean, if std > 1e-12 { std } else { 1.0 });
    }
    stats
}
