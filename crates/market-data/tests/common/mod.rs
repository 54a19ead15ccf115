//! In-memory stand-in for the exchange used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nse_market_data::transport::next_session_id;
use nse_market_data::{
    EndpointCatalog, HttpSession, NseClient, NseConfig, NseError, RawResponse, Transport,
};

pub const BASE_URL: &str = "http://nse.test";

#[derive(Clone)]
enum Route {
    Respond { status: u16, body: String },
    Refuse,
}

/// Routes, hit counters and bootstrap counter shared by every fake session.
#[derive(Default)]
pub struct FakeExchange {
    routes: Mutex<HashMap<String, Route>>,
    hits: Mutex<HashMap<String, usize>>,
    bootstraps: AtomicUsize,
    refuse_bootstrap: AtomicBool,
}

impl FakeExchange {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `url` with a 200 and `body`.
    pub fn serve(&self, url: &str, body: &str) {
        self.respond(url, 200, body);
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route::Respond {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Fail requests to `url` at the transport level.
    pub fn refuse(&self, url: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Refuse);
    }

    pub fn refuse_bootstrap(&self, refuse: bool) {
        self.refuse_bootstrap.store(refuse, Ordering::SeqCst);
    }

    /// Requests made to `url`, warm-ups included.
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn bootstraps(&self) -> usize {
        self.bootstraps.load(Ordering::SeqCst)
    }

    fn handle(&self, url: &str) -> Result<RawResponse, NseError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        if url == BASE_URL {
            return Ok(RawResponse::new(url, 200, "<html>home</html>"));
        }

        match self.routes.lock().unwrap().get(url).cloned() {
            Some(Route::Respond { status, body }) => Ok(RawResponse::new(url, status, body)),
            Some(Route::Refuse) => Err(NseError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
            None => Ok(RawResponse::new(url, 404, "")),
        }
    }
}

pub struct FakeTransport {
    exchange: Arc<FakeExchange>,
}

impl FakeTransport {
    pub fn new(exchange: Arc<FakeExchange>) -> Arc<Self> {
        Arc::new(Self { exchange })
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn open_session(&self) -> Result<Arc<dyn HttpSession>, NseError> {
        if self.exchange.refuse_bootstrap.load(Ordering::SeqCst) {
            return Err(NseError::Transport {
                url: BASE_URL.to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.exchange.bootstraps.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeSession {
            id: next_session_id(),
            exchange: Arc::clone(&self.exchange),
        }))
    }
}

struct FakeSession {
    id: u64,
    exchange: Arc<FakeExchange>,
}

#[async_trait]
impl HttpSession for FakeSession {
    fn id(&self) -> u64 {
        self.id
    }

    async fn get(&self, url: &str) -> Result<RawResponse, NseError> {
        self.exchange.handle(url)
    }
}

pub fn endpoints() -> EndpointCatalog {
    EndpointCatalog::with_base_url(BASE_URL)
}

pub fn config() -> NseConfig {
    NseConfig {
        session_refresh_interval: Duration::from_secs(120),
        endpoints: endpoints(),
        ..Default::default()
    }
}

pub async fn client(exchange: &Arc<FakeExchange>) -> NseClient {
    NseClient::with_transport(config(), FakeTransport::new(Arc::clone(exchange)))
        .await
        .expect("fake bootstrap succeeds")
}

pub const EQUITY_CSV: &str = "SYMBOL,NAME OF COMPANY, SERIES, DATE OF LISTING, PAID UP VALUE, MARKET LOT, ISIN NUMBER, FACE VALUE
INFY,Infosys Limited,EQ,08-FEB-1995,5,1,INE009A01021,5
RELIANCE,Reliance Industries Limited,EQ,29-NOV-1995,10,1,INE002A01018,10
TCS,Tata Consultancy Services Limited,EQ,25-AUG-2004,1,1,INE467B01029,1
";

pub const LOTS_CSV: &str = "UNDERLYING                              ,SYMBOL    ,OCT-26    ,NOV-26    ,DEC-26
Derivatives on Individual Securities    ,Symbol    ,          ,          ,
NIFTY 50                                ,NIFTY     ,75        ,75        ,75
INFOSYS LIMITED                         ,INFY      ,400       ,400       ,400
";

pub const QUOTE_JSON: &str = r#"{
    "info": {"symbol": "INFY", "companyName": "Infosys Limited"},
    "priceInfo": {"lastPrice": "1523.45", "change": "-", "pChange": "0.85", "vwap": "1520", "open": 1510.0}
}"#;

pub const GAINERS_JSON: &str = r#"{
    "NIFTY": {"data": [
        {"symbol": "TCS", "ltp": "4100.5", "net_price": "3.2", "trade_quantity": "120000"},
        {"symbol": "INFY", "ltp": "1523.45", "net_price": "2.1", "trade_quantity": "-"}
    ], "timestamp": "16-Oct-2026 15:30:00"},
    "BANKNIFTY": {"data": [], "timestamp": "16-Oct-2026 15:30:00"},
    "allSec": {"data": [{"symbol": "XYZ", "ltp": "10"}]},
    "legends": "NIFTY"
}"#;

pub const ALL_INDICES_JSON: &str = r#"{
    "data": [
        {"key": "BROAD MARKET INDICES", "index": "NIFTY 50", "indexSymbol": "NIFTY 50", "last": "25123.65", "variation": "-", "advances": "32"},
        {"key": "SECTORAL INDICES", "index": "NIFTY BANK", "indexSymbol": "NIFTY BANK", "last": "56789.1", "variation": "120.5", "advances": "8"}
    ],
    "timestamp": "16-Oct-2026 15:30"
}"#;

pub const ADVANCE_JSON: &str = r#"{
    "name": "NIFTY 50",
    "advance": {"declines": "18", "advances": "32", "unchanged": "0"},
    "data": []
}"#;

pub const FNO_GAINERS_JSON: &str = r#"{
    "data": [
        {"symbol": "INFY", "ltp": "1,523.45", "previousPrice": "1,500.00", "tradedQuantity": "12,34,500", "turnoverInLakhs": "-"}
    ]
}"#;
