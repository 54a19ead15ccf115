//! Raw HTTP transport seam.
//!
//! The client never talks to `reqwest` directly. It asks a [`Transport`] for
//! a fresh [`HttpSession`] (a cookie jar plus default headers) and issues
//! GETs through it. [`ReqwestTransport`] is the production implementation;
//! tests plug in an in-memory one.

mod headers;
mod http;

pub use headers::nse_headers;
pub use http::ReqwestTransport;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::NseError;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique session id.
pub fn next_session_id() -> u64 {
    NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Status and body of a completed GET, uninterpreted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Whether the status code was in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx response that actually carries content.
    ///
    /// # Errors
    ///
    /// [`NseError::HttpStatus`] for non-2xx, [`NseError::EmptyResponse`] for a
    /// blank body.
    pub fn into_body(self) -> Result<String, NseError> {
        if !self.is_success() {
            return Err(NseError::HttpStatus {
                url: self.url,
                status: self.status,
            });
        }
        if self.body.trim().is_empty() {
            return Err(NseError::EmptyResponse { url: self.url });
        }
        Ok(self.body)
    }

    /// Decode the body as JSON.
    pub fn json(self) -> Result<Value, NseError> {
        let url = self.url.clone();
        let body = self.into_body()?;
        serde_json::from_str(&body).map_err(|e| NseError::parse(format!("JSON from {}", url), e))
    }
}

/// One cookie-bearing HTTP conversation.
#[async_trait]
pub trait HttpSession: Send + Sync {
    /// Identity of this session; a rebuilt session gets a new id.
    fn id(&self) -> u64;

    /// Issue a GET. Non-2xx statuses are returned, not raised.
    async fn get(&self, url: &str) -> Result<RawResponse, NseError>;
}

/// Factory for fresh sessions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open an empty session carrying the default header set.
    ///
    /// The warm-up request that fills the cookie jar is issued by the
    /// session manager, not here.
    async fn open_session(&self) -> Result<Arc<dyn HttpSession>, NseError>;
}
