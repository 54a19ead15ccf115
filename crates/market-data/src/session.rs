//! Self-renewing HTTP session.
//!
//! The exchange only answers API calls that carry cookies handed out by its
//! home page, and those cookies go stale. [`SessionManager`] owns the one live
//! session, checks its age lazily on every [`acquire`](SessionManager::acquire)
//! and rebuilds it (new cookie jar + warm-up GET) once it is older than the
//! refresh interval. There is no background timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::errors::NseError;
use crate::transport::{HttpSession, Transport};

/// The session currently in use and when it was bootstrapped.
struct ActiveSession {
    session: Arc<dyn HttpSession>,
    created_at: Instant,
}

/// Owner of the single live session.
///
/// The staleness check and the rebuild happen under one lock, so concurrent
/// callers never trigger two overlapping bootstraps.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    home_url: String,
    refresh_interval: Duration,
    state: Mutex<ActiveSession>,
}

impl SessionManager {
    /// Bootstrap the first session.
    ///
    /// # Errors
    ///
    /// Any transport error from opening the session or from the warm-up GET,
    /// or [`NseError::HttpStatus`] if the home page answers with a non-2xx.
    pub async fn new(
        transport: Arc<dyn Transport>,
        home_url: impl Into<String>,
        refresh_interval: Duration,
    ) -> Result<Self, NseError> {
        let home_url = home_url.into();
        let active = bootstrap(transport.as_ref(), &home_url).await?;
        Ok(Self {
            transport,
            home_url,
            refresh_interval,
            state: Mutex::new(active),
        })
    }

    /// Return a usable session, rebuilding it first if it has gone stale.
    ///
    /// If the rebuild fails the error is returned and the stale session is
    /// kept; the next call will try again.
    pub async fn acquire(&self) -> Result<Arc<dyn HttpSession>, NseError> {
        let mut state = self.state.lock().await;
        let age = state.created_at.elapsed();

        if age < self.refresh_interval {
            debug!("Reusing session {} (age {}s)", state.session.id(), age.as_secs());
            return Ok(Arc::clone(&state.session));
        }

        info!(
            "Session {} is {}s old, re-initialising",
            state.session.id(),
            age.as_secs()
        );
        *state = bootstrap(self.transport.as_ref(), &self.home_url).await?;
        Ok(Arc::clone(&state.session))
    }

    /// Time since the current session was bootstrapped.
    pub async fn session_age(&self) -> Duration {
        self.state.lock().await.created_at.elapsed()
    }

    /// Id of the current session, without checking staleness.
    pub async fn current_session_id(&self) -> u64 {
        self.state.lock().await.session.id()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }
}

async fn bootstrap(transport: &dyn Transport, home_url: &str) -> Result<ActiveSession, NseError> {
    let session = transport.open_session().await?;
    let warmup = session.get(home_url).await?;
    if !warmup.is_success() {
        return Err(NseError::HttpStatus {
            url: warmup.url,
            status: warmup.status,
        });
    }

    debug!("Session {} bootstrapped against {}", session.id(), home_url);
    Ok(ActiveSession {
        session,
        created_at: Instant::now(),
    })
}
