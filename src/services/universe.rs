//! One-time symbol-universe bootstrap.

use crate::config::Config;
use crate::sources::MarketData;
use crate::types::{ContractDetail, ContractMeta};
use std::collections::HashMap;
use tracing::{info, warn};

/// The fixed symbol universe plus per-symbol margin metadata. Built once at
/// startup and read-only afterwards; symbol order is the provider's
/// response order and is preserved in every published snapshot.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    pub symbols: Vec<String>,
    meta: HashMap<String, ContractMeta>,
}

impl Universe {
    /// Filter contract details to the configured settlement currency,
    /// preserving response order.
    pub fn from_details(details: &[ContractDetail], quote_currency: &str) -> Self {
        let mut symbols = Vec::new();
        let mut meta = HashMap::new();

        for detail in details {
            if detail.quote_coin != quote_currency {
                continue;
            }
            if meta.contains_key(&detail.symbol) {
                continue;
            }
            symbols.push(detail.symbol.clone());
            meta.insert(detail.symbol.clone(), ContractMeta::from(detail));
        }

        Self { symbols, meta }
    }

    pub fn meta(&self, symbol: &str) -> Option<&ContractMeta> {
        self.meta.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Resolve the universe from the provider's contract-detail endpoint.
///
/// Bootstrap failure is non-fatal: the service starts with an empty
/// universe and simply has nothing to analyze until restarted.
pub async fn load_universe(provider: &dyn MarketData, config: &Config) -> Universe {
    match provider.contract_detail().await {
        Ok(details) => {
            let universe = Universe::from_details(&details, &config.quote_currency);
            info!(
                "Loaded {} {} contracts out of {} listed",
                universe.len(),
                config.quote_currency,
                details.len()
            );
            universe
        }
        Err(e) => {
            warn!("Contract detail fetch failed: {}; starting with an empty universe", e);
            Universe::default()
        }
    }
}
