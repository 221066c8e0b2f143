use super::{FetchError, MarketData};
use crate::config::Config;
use crate::types::{Bar, ContractDetail, KlineInterval};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Retries after the first attempt. Retry only covers transient failures;
/// the caller's per-symbol timeout is the hard budget either way.
const MAX_RETRIES: usize = 2;
const RETRY_MIN_DELAY: Duration = Duration::from_millis(300);

/// K-line envelope: `data` is an array of positional rows
/// `[timestamp_ms, open, high, low, close, volume]`.
#[derive(Debug, Deserialize)]
struct KlineResponse {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Contract-detail envelope.
#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    data: Vec<ContractDetail>,
}

/// REST client for the MEXC contract API.
#[derive(Clone)]
pub struct MexcClient {
    client: Client,
    base_url: String,
    interval: KlineInterval,
    limit: u32,
    min_bars: usize,
}

impl MexcClient {
    /// Create a client from configuration. The HTTP timeout doubles as the
    /// per-attempt bound for symbol fetches.
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .user_agent("Vigil/1.0")
            .timeout(config.symbol_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.mexc_base_url.trim_end_matches('/').to_string(),
            interval: config.kline_interval,
            limit: config.lookback_limit,
            min_bars: config.min_bars,
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(RETRY_MIN_DELAY)
            .with_max_times(MAX_RETRIES)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    async fn kline_request(&self, symbol: &str) -> Result<KlineResponse, FetchError> {
        let url = format!(
            "{}/api/v1/contract/kline/{}?interval={}&limit={}",
            self.base_url,
            symbol,
            self.interval.provider_code(),
            self.limit
        );
        self.get_json(&url).await
    }

    async fn detail_request(&self) -> Result<DetailResponse, FetchError> {
        let url = format!("{}/api/v1/contract/detail", self.base_url);
        self.get_json(&url).await
    }
}

#[async_trait]
impl MarketData for MexcClient {
    async fn contract_detail(&self) -> Result<Vec<ContractDetail>, FetchError> {
        let response = (|| self.detail_request())
            .retry(self.backoff())
            .when(FetchError::is_retryable)
            .notify(|err, wait| debug!("contract detail retry in {:?}: {}", wait, err))
            .await?;

        if response.data.is_empty() {
            return Err(FetchError::NoData);
        }
        Ok(response.data)
    }

    async fn klines(&self, symbol: &str) -> Result<Vec<Bar>, FetchError> {
        let response = (|| self.kline_request(symbol))
            .retry(self.backoff())
            .when(FetchError::is_retryable)
            .notify(|err, wait| debug!("kline retry in {:?}: {}", wait, err))
            .await?;

        if response.data.is_empty() {
            return Err(FetchError::NoData);
        }

        let bars = response
            .data
            .iter()
            .map(|row| decode_bar(row))
            .collect::<Result<Vec<_>, _>>()?;

        if bars.len() < self.min_bars {
            return Err(FetchError::Insufficient {
                got: bars.len(),
                need: self.min_bars,
            });
        }

        Ok(bars)
    }
}

/// Decode one positional k-line row. Index positions are fixed by the
/// provider contract: timestamp, open, high, low, close, volume.
fn decode_bar(row: &[Value]) -> Result<Bar, FetchError> {
    if row.len() < 6 {
        return Err(FetchError::Decode(format!(
            "row has {} fields, expected 6",
            row.len()
        )));
    }

    let time_ms = row[0]
        .as_i64()
        .or_else(|| field_f64(&row[0]).map(|f| f as i64))
        .ok_or_else(|| FetchError::Decode(format!("bad timestamp: {}", row[0])))?;

    let mut fields = [0.0f64; 5];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = field_f64(&row[i + 1])
            .ok_or_else(|| FetchError::Decode(format!("bad field {}: {}", i + 1, row[i + 1])))?;
    }

    Ok(Bar {
        // Provider timestamps are milliseconds.
        time: time_ms / 1000,
        open: fields[0],
        high: fields[1],
        low: fields[2],
        close: fields[3],
        volume: fields[4],
    })
}

/// Accept a number or a numeric string; the provider has shipped both.
fn field_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
