//! Clock synchronisation with the API
//!
//! Every signed request carries a timestamp that must fall inside the
//! server's acceptance window. The client measures the difference between
//! the local clock and `GET /auth/time` once at construction and adds it to
//! the local clock on every call. It never re-syncs on its own; long-lived
//! clients call [`OvhClient::refresh_time_delta`] when they see fit.

use ovh_auth::Method;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument};

use crate::client::OvhClient;
use crate::error::{OvhError, OvhResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub(crate) const TIME_PATH: &str = "/auth/time";

/// Local unix time in whole seconds
///
/// Negative if the local clock is set before the epoch.
pub fn unix_now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// Parse the plain-text body of `GET /auth/time`
pub(crate) fn parse_time(response: &HttpResponse) -> OvhResult<i64> {
    if !response.is_success() {
        return Err(OvhError::RemoteUnavailable {
            status: response.status,
        });
    }

    let text = std::str::from_utf8(&response.body)
        .map_err(|e| OvhError::malformed(response.status, e))?;
    text.trim().parse::<i64>().map_err(|e| {
        OvhError::malformed(response.status, format!("invalid server time {:?}: {}", text, e))
    })
}

/// Server time minus local time, rejecting values that do not fit in `i64`
pub(crate) fn compute_delta(remote: i64, local: i64, status: u16) -> OvhResult<i64> {
    remote.checked_sub(local).ok_or_else(|| {
        OvhError::malformed(status, format!("server time {} out of range", remote))
    })
}

impl<T: Transport> OvhClient<T> {
    /// Get the API server time in unix seconds
    ///
    /// Unauthenticated call to `GET /auth/time`.
    #[instrument(skip(self))]
    pub async fn time(&self) -> OvhResult<i64> {
        let response = self.fetch_time().await?;
        parse_time(&response)
    }

    async fn fetch_time(&self) -> OvhResult<HttpResponse> {
        let request = HttpRequest::new(Method::Get, self.url(TIME_PATH));
        Ok(self.transport.execute(request).await?)
    }

    /// Check that the API is reachable
    ///
    /// Same call as [`time`](Self::time), the value is discarded.
    pub async fn ping(&self) -> OvhResult<()> {
        self.time().await.map(|_| ())
    }

    /// Measure the clock difference with the API again
    ///
    /// Returns the new delta in seconds (server minus local).
    pub async fn refresh_time_delta(&mut self) -> OvhResult<i64> {
        let local = unix_now();
        let response = self.fetch_time().await?;
        let remote = parse_time(&response)?;
        self.time_delta = compute_delta(remote, local, response.status)?;
        debug!(delta = self.time_delta, "Synchronised with API clock");
        Ok(self.time_delta)
    }

    /// Current clock delta in seconds (server minus local)
    pub fn time_delta(&self) -> i64 {
        self.time_delta
    }

    /// Timestamp to stamp the next signed request with
    pub(crate) fn timestamp(&self) -> i64 {
        unix_now().saturating_add(self.time_delta)
    }
}
