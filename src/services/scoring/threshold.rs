use super::indicators::{macd_diff, rsi};
use super::Scorer;
use crate::types::{Bar, ContractMeta, Signal};

const RSI_PERIOD: usize = 14;

/// Model-free scoring: direction from the MACD histogram sign, confidence
/// from how far RSI sits from its midpoint.
///
/// On degenerate input (too few bars, flat series) it falls back to a
/// neutral Long with zero confidence rather than failing the symbol, so a
/// briefly stale market still renders a row.
pub struct ThresholdScorer;

impl Scorer for ThresholdScorer {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn score(&self, bars: &[Bar], _meta: Option<&ContractMeta>) -> Signal {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let last_rsi = rsi(&closes, RSI_PERIOD).last().copied();
        let last_macd = macd_diff(&closes).last().copied();

        match (last_rsi, last_macd) {
            (Some(r), Some(m)) if r.is_finite() && m.is_finite() => {
                let strength = ((r - 50.0).abs() / 50.0 * 100.0).clamp(0.0, 100.0);
                if m > 0.0 {
                    Signal::long(strength)
                } else {
                    Signal::short(strength)
                }
            }
            _ => Signal::long(0.0),
        }
    }
}
