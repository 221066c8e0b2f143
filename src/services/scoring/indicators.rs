//! Technical indicator primitives.
//!
//! All functions are pure and deterministic: they take an ordered value
//! series and return a series of the same length, with the undefined
//! leading window filled with NaN. Callers drop NaN rows before use.

/// Trailing simple moving average. The first `window - 1` outputs are NaN.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = sum / window as f64;
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = sum / window as f64;
    }
    out
}

/// Exponential moving average with alpha = 2 / (span + 1), seeded with the
/// first observation (the recursive convention, no warm-up correction).
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if values.is_empty() || span == 0 {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut acc = values[0];
    out[0] = acc;
    for i in 1..values.len() {
        acc += alpha * (values[i] - acc);
        out[i] = acc;
    }
    out
}

/// Wilder RSI: gains and losses smoothed recursively with weight
/// 1 / period, RSI = 100 - 100 / (1 + avg_gain / avg_loss). The first
/// `period` outputs are NaN.
///
/// A series with no losses drives avg_loss to 0 and the ratio to infinity,
/// so RSI converges to 100 without a special case. A flat series yields
/// 0/0 = NaN, which downstream scoring treats as an analysis failure.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < 2 {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..values.len() {
        let delta = values[i] - values[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if i == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain += alpha * (gain - avg_gain);
            avg_loss += alpha * (loss - avg_loss);
        }

        if i >= period {
            let rs = avg_gain / avg_loss;
            out[i] = 100.0 - 100.0 / (1.0 + rs);
        }
    }
    out
}

/// MACD histogram: (EMA12 - EMA26) minus its own EMA9 signal line.
/// Defined from the first index but noisy until the slow EMA settles.
pub fn macd_diff(values: &[f64]) -> Vec<f64> {
    let fast = ema(values, 12);
    let slow = ema(values, 26);

    let macd: Vec<f64> = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, 9);

    macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect()
}

/// Step-over-step relative change; index 0 is defined as 0 by convention.
pub fn percent_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for i in 1..values.len() {
        out[i] = (values[i] - values[i - 1]) / values[i - 1];
    }
    out
}
