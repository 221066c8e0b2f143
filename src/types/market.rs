use serde::{Deserialize, Serialize};

/// One OHLCV sample. `time` is epoch seconds; bars in a series are strictly
/// increasing by `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// K-line interval accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KlineInterval {
    #[default]
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "8h")]
    EightHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl KlineInterval {
    /// Parse from the friendly form used in configuration.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1m" => Some(Self::OneMinute),
            "5m" => Some(Self::FiveMinutes),
            "15m" => Some(Self::FifteenMinutes),
            "30m" => Some(Self::ThirtyMinutes),
            "60m" | "1h" => Some(Self::OneHour),
            "4h" => Some(Self::FourHours),
            "8h" => Some(Self::EightHours),
            "1d" => Some(Self::OneDay),
            _ => None,
        }
    }

    /// The interval code the contract API expects in the query string.
    pub fn provider_code(&self) -> &'static str {
        match self {
            Self::OneMinute => "Min1",
            Self::FiveMinutes => "Min5",
            Self::FifteenMinutes => "Min15",
            Self::ThirtyMinutes => "Min30",
            Self::OneHour => "Min60",
            Self::FourHours => "Hour4",
            Self::EightHours => "Hour8",
            Self::OneDay => "Day1",
        }
    }
}

/// One margin tier from a contract's custom risk-limit list.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
pub struct RiskTier {
    #[serde(default)]
    pub mmr: f64,
    #[serde(default)]
    pub imr: f64,
}

/// One entry of the provider's contract-detail response.
///
/// Unknown fields are ignored; margin fields default to zero so contracts
/// without risk metadata still load.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub symbol: String,
    #[serde(default)]
    pub quote_coin: String,
    #[serde(default)]
    pub risk_limit_custom: Vec<RiskTier>,
    #[serde(default)]
    pub maintenance_margin_rate: f64,
    #[serde(default)]
    pub initial_margin_rate: f64,
}

/// Per-symbol margin metadata kept after bootstrap, used by the classifier
/// scorer for risk adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContractMeta {
    pub maintenance_margin_rate: f64,
    pub initial_margin_rate: f64,
}

impl ContractMeta {
    /// Combined margin weight used to discount the model probability.
    pub fn total_risk(&self) -> f64 {
        self.maintenance_margin_rate + self.initial_margin_rate
    }
}

impl From<&ContractDetail> for ContractMeta {
    /// The first custom risk tier wins; the top-level rates are the fallback.
    fn from(detail: &ContractDetail) -> Self {
        match detail.risk_limit_custom.first() {
            Some(tier) => Self {
                maintenance_margin_rate: tier.mmr,
                initial_margin_rate: tier.imr,
            },
            None => Self {
                maintenance_margin_rate: detail.maintenance_margin_rate,
                initial_margin_rate: detail.initial_margin_rate,
            },
        }
    }
}
