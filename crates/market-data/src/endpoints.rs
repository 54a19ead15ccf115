//! URL templates for each data product.
//!
//! Templates that take a code carry a single `%s` slot. The code is
//! percent-encoded on substitution, so `NIFTY 50` becomes `NIFTY%2050`.

use serde::{Deserialize, Serialize};
use urlencoding::encode;

/// Substitution slot in parameterised templates.
pub const CODE_SLOT: &str = "%s";

const NSE_HOME: &str = "https://www.nseindia.com";
const NSE_API: &str = "https://www.nseindia.com/api";
const NSE_ARCHIVES: &str = "https://nsearchives.nseindia.com/content";

/// Named URL templates for every product the client can fetch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EndpointCatalog {
    /// Home page hit once per session to obtain cookies.
    pub home: String,
    /// Equity list CSV (`SYMBOL,NAME OF COMPANY,...`).
    pub stocks_csv: String,
    /// Equity quote, `%s` = symbol.
    pub quote: String,
    /// Top gainers across categories.
    pub top_gainers: String,
    /// Top losers across categories.
    pub top_losers: String,
    /// Index constituents with the advance/decline block, `%s` = index name.
    pub equity_stock_indices: String,
    /// Every index with its latest values.
    pub all_indices: String,
    /// Derivatives market lot CSV.
    pub fno_lot_sizes: String,
    /// Top derivatives gainers.
    pub top_fno_gainers: String,
    /// Top derivatives losers.
    pub top_fno_losers: String,
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self {
            home: NSE_HOME.to_string(),
            stocks_csv: format!("{}/equities/EQUITY_L.csv", NSE_ARCHIVES),
            quote: format!("{}/quote-equity?symbol=%s", NSE_API),
            top_gainers: format!("{}/live-analysis-variations?index=gainers", NSE_API),
            // The exchange spells it this way.
            top_losers: format!("{}/live-analysis-variations?index=loosers", NSE_API),
            equity_stock_indices: format!("{}/equity-stockIndices?index=%s", NSE_API),
            all_indices: format!("{}/allIndices", NSE_API),
            fno_lot_sizes: format!("{}/fo/fo_mktlots.csv", NSE_ARCHIVES),
            top_fno_gainers: format!("{}/live-analysis-variations?index=fnoGainers", NSE_API),
            top_fno_losers: format!("{}/live-analysis-variations?index=fnoLoosers", NSE_API),
        }
    }
}

impl EndpointCatalog {
    /// A catalog where every URL lives under `base`.
    ///
    /// Paths mirror the defaults; used to point the client at a mirror or
    /// a local stub server.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            home: base.to_string(),
            stocks_csv: format!("{}/content/equities/EQUITY_L.csv", base),
            quote: format!("{}/api/quote-equity?symbol=%s", base),
            top_gainers: format!("{}/api/live-analysis-variations?index=gainers", base),
            top_losers: format!("{}/api/live-analysis-variations?index=loosers", base),
            equity_stock_indices: format!("{}/api/equity-stockIndices?index=%s", base),
            all_indices: format!("{}/api/allIndices", base),
            fno_lot_sizes: format!("{}/content/fo/fo_mktlots.csv", base),
            top_fno_gainers: format!("{}/api/live-analysis-variations?index=fnoGainers", base),
            top_fno_losers: format!("{}/api/live-analysis-variations?index=fnoLoosers", base),
        }
    }
}

/// Substitute an already-normalized code into a template.
pub fn render(template: &str, code: &str) -> String {
    template.replacen(CODE_SLOT, &encode(code), 1)
}

/// Upper-case a code and collapse internal whitespace.
///
/// `" nifty   50 "` becomes `"NIFTY 50"`.
pub fn normalize_code(code: &str) -> String {
    code.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
