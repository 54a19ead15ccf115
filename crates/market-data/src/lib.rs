//! NSE Market Data Crate
//!
//! This crate fetches market data from the National Stock Exchange of India
//! website: equity quotes, index quotes, gainers/losers, advances/declines,
//! derivatives lot sizes and the full symbol list.
//!
//! # Overview
//!
//! The exchange's JSON API only answers requests that look like they come
//! from its own website and carry cookies issued by its home page. This crate
//! takes care of that and of cleaning up the payloads:
//! - A self-renewing session that re-bootstraps once it goes stale
//! - A single fetch gateway every request goes through
//! - Per-client caches for the bulk reference downloads
//! - Coercion of numeric strings into JSON numbers
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    NseClient     | --> | EndpointCatalog  |  (URL templates)
//! +------------------+     +------------------+
//!          |       \
//!          |        \----> +------------------+
//!          |               |  ReferenceCache  |  (symbols, lot sizes)
//!          v               +------------------+
//! +------------------+
//! |   FetchGateway   |  (every GET)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  SessionManager  | --> |    Transport     |  (reqwest + cookie jar)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | NormalizePolicy  |  ("123.45" -> 123.45)
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use nse_market_data::{NseClient, NseConfig};
//!
//! # async fn run() -> Result<(), nse_market_data::NseError> {
//! let client = NseClient::from_config(NseConfig::from_env()?).await?;
//! let quote = client.quote("infy", false).await?;
//! println!("{}", quote["lastPrice"]);
//!
//! if client.is_valid_symbol("tcs").await? {
//!     let nifty = client.index_quote("nifty 50").await?;
//!     println!("{}", nifty["last"]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Not implemented
//!
//! The following products are known but not offered: 52-week highs and lows,
//! pre-open snapshots (NIFTY, BANKNIFTY, F&O), most active monthly
//! contracts, bhavcopy downloads, and a generic "fetch any JSON URL" helper.

pub mod cache;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod normalize;
pub mod parse;
pub mod render;
pub mod session;
pub mod transport;

pub use cache::{ReferenceCache, ReferenceKind};
pub use client::{NseClient, DEFAULT_INDEX};
pub use config::NseConfig;
pub use endpoints::{normalize_code, EndpointCatalog};
pub use errors::{CodeKind, NseError, RetryClass};
pub use gateway::FetchGateway;
pub use models::{LotSizes, Movers, Record, SymbolDirectory};
pub use normalize::{normalize, NormalizePolicy};
pub use session::SessionManager;
pub use transport::{HttpSession, RawResponse, ReqwestTransport, Transport};
