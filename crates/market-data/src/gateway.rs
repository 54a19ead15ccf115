//! Single choke-point for outbound requests.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::errors::NseError;
use crate::session::SessionManager;
use crate::transport::RawResponse;

/// Routes every GET through a fresh-enough session.
///
/// The body is returned as-is; callers decide whether a status or an empty
/// body is a problem.
pub struct FetchGateway {
    sessions: SessionManager,
    requests: AtomicU64,
}

impl FetchGateway {
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            sessions,
            requests: AtomicU64::new(0),
        }
    }

    /// GET `url` with the current session's headers and cookies.
    ///
    /// # Errors
    ///
    /// Transport-level failures from the session bootstrap or the request
    /// itself. HTTP error statuses are not errors here.
    pub async fn fetch(&self, url: &str) -> Result<RawResponse, NseError> {
        let session = self.sessions.acquire().await?;
        self.requests.fetch_add(1, Ordering::Relaxed);
        debug!("GET {} (session {})", url, session.id());

        let response = session.get(url).await?;
        debug!("{} -> HTTP {} ({} bytes)", url, response.status, response.body.len());
        Ok(response)
    }

    /// Number of requests issued through this gateway, warm-ups excluded.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}
