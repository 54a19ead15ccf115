//! Product queries against the exchange.
//!
//! [`NseClient`] composes the endpoint catalog, the fetch gateway, the
//! reference caches and the normalizer. Each public method is one data
//! product: resolve the URL, fetch, decode, normalize.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::{ReferenceCache, ReferenceKind};
use crate::config::NseConfig;
use crate::endpoints::{normalize_code, render, EndpointCatalog};
use crate::errors::{CodeKind, NseError};
use crate::gateway::FetchGateway;
use crate::models::{LotSizes, Movers, Record, SymbolDirectory};
use crate::normalize::NormalizePolicy;
use crate::parse::{into_record, into_records, parse_lot_sizes, parse_symbol_directory, take_field};
use crate::session::SessionManager;
use crate::transport::{ReqwestTransport, Transport};

/// Index used by [`NseClient::advances_declines`] when the caller has no preference.
pub const DEFAULT_INDEX: &str = "NIFTY 50";

/// Field holding an index's name in the all-indices payload.
const INDEX_SYMBOL_FIELD: &str = "indexSymbol";

/// Client for National Stock Exchange of India market data.
///
/// One instance owns one session, one fetch gateway and its own reference
/// caches; nothing is shared between instances.
pub struct NseClient {
    gateway: FetchGateway,
    endpoints: EndpointCatalog,
    policy: NormalizePolicy,
    symbols: ReferenceCache<SymbolDirectory>,
    lot_sizes: ReferenceCache<LotSizes>,
}

impl NseClient {
    /// Connect with default settings.
    pub async fn new() -> Result<Self, NseError> {
        Self::from_config(NseConfig::default()).await
    }

    /// Connect over HTTP using `config`.
    pub async fn from_config(config: NseConfig) -> Result<Self, NseError> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(config, transport).await
    }

    /// Connect through a caller-supplied transport.
    ///
    /// The first session is bootstrapped before this returns.
    pub async fn with_transport(
        config: NseConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, NseError> {
        let sessions = SessionManager::new(
            transport,
            config.endpoints.home.clone(),
            config.session_refresh_interval,
        )
        .await?;

        Ok(Self {
            gateway: FetchGateway::new(sessions),
            endpoints: config.endpoints,
            policy: config.normalize,
            symbols: ReferenceCache::new(ReferenceKind::SymbolDirectory),
            lot_sizes: ReferenceCache::new(ReferenceKind::LotSizes),
        })
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// Every listed equity: symbol code to company name.
    ///
    /// With `cached` the stored directory is returned if there is one;
    /// otherwise the CSV is downloaded and replaces it.
    pub async fn symbol_directory(&self, cached: bool) -> Result<Arc<SymbolDirectory>, NseError> {
        let url = &self.endpoints.stocks_csv;
        self.symbols
            .get_or_fetch(!cached, || async move {
                let body = self.gateway.fetch(url).await?.into_body()?;
                parse_symbol_directory(&body, url)
            })
            .await
    }

    /// Whether the upper-cased `code` is a listed equity symbol.
    pub async fn is_valid_symbol(&self, code: &str) -> Result<bool, NseError> {
        if code.is_empty() {
            return Ok(false);
        }
        let directory = self.symbol_directory(true).await?;
        Ok(directory.contains_key(&code.to_uppercase()))
    }

    /// Company name for an equity symbol, from the cached directory.
    ///
    /// # Errors
    ///
    /// [`NseError::UnknownCode`] if the upper-cased code is not listed.
    pub async fn company_name(&self, code: &str) -> Result<String, NseError> {
        let code = code.trim().to_uppercase();
        let directory = self.symbol_directory(true).await?;
        directory
            .get(&code)
            .cloned()
            .ok_or(NseError::UnknownCode {
                kind: CodeKind::Symbol,
                code,
            })
    }

    /// Derivatives symbol to current-month lot size, cached like
    /// [`symbol_directory`](Self::symbol_directory).
    pub async fn fno_lot_sizes(&self, cached: bool) -> Result<Arc<LotSizes>, NseError> {
        let url = &self.endpoints.fno_lot_sizes;
        self.lot_sizes
            .get_or_fetch(!cached, || async move {
                let body = self.gateway.fetch(url).await?.into_body()?;
                parse_lot_sizes(&body, url)
            })
            .await
    }

    // ========================================================================
    // Equities
    // ========================================================================

    /// Latest quote for an equity.
    ///
    /// Returns the `priceInfo` block, or the whole payload with `all_data`.
    pub async fn quote(&self, code: &str, all_data: bool) -> Result<Record, NseError> {
        let code = normalize_code(code);
        debug!("Fetching quote for {}", code);

        let payload = self.fetch_json(&render(&self.endpoints.quote, &code)).await?;
        let payload = if all_data {
            payload
        } else {
            take_field(payload, "priceInfo", "quote")?
        };
        Ok(self.policy.normalize(&into_record(payload, "quote")?))
    }

    /// Top gainers, for every category or just `category` (`NIFTY`, `BANKNIFTY`, ...).
    pub async fn top_gainers(&self, category: Option<&str>) -> Result<Movers, NseError> {
        self.movers(&self.endpoints.top_gainers, category).await
    }

    /// Top losers, for every category or just `category`.
    pub async fn top_losers(&self, category: Option<&str>) -> Result<Movers, NseError> {
        self.movers(&self.endpoints.top_losers, category).await
    }

    /// Top derivatives gainers, with `"-"` as null and comma groups parsed.
    pub async fn top_fno_gainers(&self) -> Result<Vec<Record>, NseError> {
        self.fno_movers(&self.endpoints.top_fno_gainers).await
    }

    /// Top derivatives losers, cleaned like [`top_fno_gainers`](Self::top_fno_gainers).
    pub async fn top_fno_losers(&self) -> Result<Vec<Record>, NseError> {
        self.fno_movers(&self.endpoints.top_fno_losers).await
    }

    // ========================================================================
    // Indices
    // ========================================================================

    /// Advance/decline counts for an index (see [`DEFAULT_INDEX`]).
    pub async fn advances_declines(&self, index_code: &str) -> Result<Record, NseError> {
        let code = normalize_code(index_code);
        debug!("Fetching advances/declines for {}", code);

        let url = render(&self.endpoints.equity_stock_indices, &code);
        let advance = take_field(self.fetch_json(&url).await?, "advance", "advances/declines")?;
        Ok(self.policy.normalize(&into_record(advance, "advances/declines")?))
    }

    /// Latest values of every index.
    pub async fn all_index_quotes(&self) -> Result<Vec<Record>, NseError> {
        let payload = self.fetch_json(&self.endpoints.all_indices).await?;
        let rows = into_records(take_field(payload, "data", "all indices")?, "all indices")?;
        Ok(rows.iter().map(|row| self.policy.normalize(row)).collect())
    }

    /// Names of every index.
    pub async fn index_list(&self) -> Result<Vec<String>, NseError> {
        Ok(self
            .all_index_quotes()
            .await?
            .iter()
            .filter_map(index_symbol)
            .map(str::to_string)
            .collect())
    }

    /// Latest values of one index.
    ///
    /// # Errors
    ///
    /// [`NseError::UnknownCode`] if no index matches the normalized code.
    pub async fn index_quote(&self, code: &str) -> Result<Record, NseError> {
        let code = normalize_code(code);
        debug!("Fetching index quote for {}", code);

        self.all_index_quotes()
            .await?
            .into_iter()
            .find(|row| index_symbol(row) == Some(code.as_str()))
            .ok_or(NseError::UnknownCode {
                kind: CodeKind::Index,
                code,
            })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn endpoints(&self) -> &EndpointCatalog {
        &self.endpoints
    }

    pub fn gateway(&self) -> &FetchGateway {
        &self.gateway
    }

    pub fn symbol_cache(&self) -> &ReferenceCache<SymbolDirectory> {
        &self.symbols
    }

    pub fn lot_size_cache(&self) -> &ReferenceCache<LotSizes> {
        &self.lot_sizes
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn fetch_json(&self, url: &str) -> Result<Value, NseError> {
        self.gateway.fetch(url).await?.json()
    }

    async fn movers(&self, url: &str, category: Option<&str>) -> Result<Movers, NseError> {
        let mut payload = into_record(self.fetch_json(url).await?, "movers")?;

        let Some(category) = category else {
            return Ok(Movers::All(self.policy.normalize(&payload)));
        };

        let key = payload
            .keys()
            .find(|k| k.as_str() == category)
            .or_else(|| payload.keys().find(|k| k.eq_ignore_ascii_case(category)))
            .cloned()
            .ok_or_else(|| NseError::UnknownCode {
                kind: CodeKind::Index,
                code: category.to_string(),
            })?;

        let section = payload.remove(&key).unwrap_or(Value::Null);
        let context = format!("movers for {}", key);
        let rows = into_records(take_field(section, "data", &context)?, &context)?;
        Ok(Movers::Category(
            rows.iter().map(|row| self.policy.normalize(row)).collect(),
        ))
    }

    async fn fno_movers(&self, url: &str) -> Result<Vec<Record>, NseError> {
        let payload = self.fetch_json(url).await?;
        let rows = into_records(take_field(payload, "data", "F&O movers")?, "F&O movers")?;
        let cleaning = NormalizePolicy::cleaning();
        Ok(rows.iter().map(|row| cleaning.normalize(row)).collect())
    }
}

impl fmt::Display for NseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Driver for National Stock Exchange (NSE)")
    }
}

fn index_symbol(row: &Record) -> Option<&str> {
    row.get(INDEX_SYMBOL_FIELD).and_then(Value::as_str)
}
