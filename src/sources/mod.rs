//! Market-data provider clients.

pub mod mexc;

pub use mexc::MexcClient;

use crate::types::{Bar, ContractDetail, Verdict};
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// How a per-symbol fetch can fail. Each variant maps onto a distinct
/// signal verdict at the scheduler boundary; none of them propagate past it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(StatusCode),

    #[error("provider returned no data rows")]
    NoData,

    #[error("only {got} bars returned, {need} required")]
    Insufficient { got: usize, need: usize },

    #[error("malformed kline payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// The verdict published for a symbol that failed with this error.
    pub fn verdict(&self) -> Verdict {
        match self {
            FetchError::NoData => Verdict::NoResponse,
            FetchError::Insufficient { .. } => Verdict::InsufficientData,
            FetchError::Transport(_) | FetchError::Status(_) | FetchError::Decode(_) => {
                Verdict::RequestFailed
            }
        }
    }

    /// Whether a retry could plausibly succeed. Only transient transport
    /// failures and the gateway-style status set qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_timeout() || e.is_connect(),
            FetchError::Status(status) => matches!(status.as_u16(), 500 | 502 | 504),
            _ => false,
        }
    }
}

/// The provider seam the analyzer drives. `MexcClient` is the production
/// implementation; tests substitute scripted providers.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch contract metadata for the whole exchange, in response order.
    async fn contract_detail(&self) -> Result<Vec<ContractDetail>, FetchError>;

    /// Fetch the most recent bars for one symbol, oldest first.
    async fn klines(&self, symbol: &str) -> Result<Vec<Bar>, FetchError>;
}
