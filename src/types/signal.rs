use serde::{Deserialize, Serialize};

/// The outcome tag carried by every published signal.
///
/// The first three are real trade calls; the rest record why a symbol could
/// not be scored this cycle. Failed symbols keep their tag until the next
/// cycle retries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Long,
    Short,
    NoRecommendation,
    /// Placeholder before the first cycle reaches a symbol.
    Pending,
    /// Provider answered with no data rows.
    NoResponse,
    /// Fewer bars than the indicator window needs.
    InsufficientData,
    /// Transport error or per-symbol timeout.
    RequestFailed,
    /// Indicator or model computation failed.
    AnalysisFailed,
}

impl Verdict {
    /// True for tags that describe a failure rather than a trade call.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            Verdict::Long | Verdict::Short | Verdict::NoRecommendation
        )
    }

    /// Display label used by the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Long => "Long",
            Verdict::Short => "Short",
            Verdict::NoRecommendation => "No recommendation",
            Verdict::Pending => "Analyzing",
            Verdict::NoResponse => "No response",
            Verdict::InsufficientData => "Insufficient data",
            Verdict::RequestFailed => "Request failed",
            Verdict::AnalysisFailed => "Analysis failed",
        }
    }
}

/// The published result for one symbol: a verdict plus a confidence
/// percentage in [0,100] for trade calls. Superseded whole on the next
/// cycle, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Epoch milliseconds when the signal was produced.
    pub time: i64,
}

impl Signal {
    fn now(verdict: Verdict, confidence: Option<f64>) -> Self {
        Self {
            verdict,
            confidence,
            time: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Placeholder seeded for every universe symbol at startup.
    pub fn pending() -> Self {
        Self::now(Verdict::Pending, None)
    }

    pub fn long(confidence: f64) -> Self {
        Self::now(Verdict::Long, Some(confidence.clamp(0.0, 100.0)))
    }

    pub fn short(confidence: f64) -> Self {
        Self::now(Verdict::Short, Some(confidence.clamp(0.0, 100.0)))
    }

    pub fn no_recommendation(confidence: f64) -> Self {
        Self::now(Verdict::NoRecommendation, Some(confidence.clamp(0.0, 100.0)))
    }

    /// A failure outcome; `verdict` must be one of the failure tags.
    pub fn failure(verdict: Verdict) -> Self {
        debug_assert!(verdict.is_failure());
        Self::now(verdict, None)
    }
}

/// One row of a published snapshot: a symbol with its current signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSignal {
    pub symbol: String,
    #[serde(flatten)]
    pub signal: Signal,
}
