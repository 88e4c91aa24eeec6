use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::connectivity::Connectivity;
use crate::provider::ProviderResponse;
use crate::record::{FallbackReason, LocationRecord};

/// Shared cancellation flag for an in-flight lookup.
///
/// Cancellation is a one-way latch: [`cancel`](Self::cancel) is idempotent
/// and cancelling an already-settled lookup is a no-op. A worker that
/// observes the latch drops its result instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the latch. Returns `true` only for the call that actually
    /// flipped it.
    pub fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Failure inside the request path, before it folds into a fallback record.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("geolocation endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response missing usable city/coordinates")]
    MissingFields,
}

impl LookupError {
    /// Map onto the fallback taxonomy.
    pub fn reason(&self) -> FallbackReason {
        match self {
            LookupError::Status(_) => FallbackReason::HttpError,
            LookupError::MissingFields => FallbackReason::ParseError,
            LookupError::Transport(err) => {
                if err.is_timeout() {
                    FallbackReason::Timeout
                } else if err.is_connect() {
                    FallbackReason::Offline
                } else if err.is_decode() {
                    FallbackReason::ParseError
                } else {
                    FallbackReason::HttpError
                }
            }
        }
    }
}

/// Outcome of polling a [`LookupHandle`].
#[derive(Debug)]
pub enum LookupPoll {
    /// Still in flight; poll again on the next tick.
    Pending,
    /// Settled. The handle is spent — drop it; polling past this point is
    /// a caller bug.
    Ready(LocationRecord),
}

/// Owner's end of one spawned lookup.
///
/// The worker delivers exactly one record through the channel (or none, if
/// cancelled first). The handle enforces the deadline on the polling side:
/// when `timeout` elapses without a delivery it cancels the worker and
/// settles with a timeout fallback, so time-to-degraded is bounded by the
/// configured timeout plus one tick.
pub struct LookupHandle {
    token: CancelToken,
    rx: Receiver<LocationRecord>,
    started: Instant,
    deadline: Duration,
}

impl LookupHandle {
    pub fn poll(&mut self, now: Instant) -> LookupPoll {
        match self.rx.try_recv() {
            Ok(record) => LookupPoll::Ready(record),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                if now.saturating_duration_since(self.started) >= self.deadline {
                    self.token.cancel();
                    debug!(timeout_ms = self.deadline.as_millis() as u64, "lookup deadline expired");
                    LookupPoll::Ready(LocationRecord::fallback(FallbackReason::Timeout))
                } else {
                    LookupPoll::Pending
                }
            }
        }
    }

    /// Cancel the in-flight request. Safe to call any number of times,
    /// before or after the lookup settles.
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

/// Start the single geolocation attempt for a widget.
///
/// Consults the connectivity probe first: offline short-circuits to an
/// immediately-ready offline fallback without touching the network.
/// Otherwise the request runs on a named worker thread and the result
/// arrives via the returned handle. Never blocks the caller.
pub fn spawn_lookup(
    endpoint: &str,
    timeout: Duration,
    connectivity: &dyn Connectivity,
) -> LookupHandle {
    let (tx, rx) = mpsc::channel();
    let token = CancelToken::new();
    let started = Instant::now();

    if !connectivity.is_online() {
        debug!("connectivity probe reports offline, skipping lookup");
        let _ = tx.send(LocationRecord::fallback(FallbackReason::Offline));
        return LookupHandle {
            token,
            rx,
            started,
            deadline: timeout,
        };
    }

    let url = endpoint.to_string();
    let worker_token = token.clone();
    let spawned = std::thread::Builder::new()
        .name("tellurion-lookup".into())
        .spawn(move || {
            let record = match request(&url, timeout) {
                Ok(record) => {
                    debug!(city = %record.city, "geolocation resolved");
                    record
                }
                Err(err) => {
                    debug!(error = %err, reason = %err.reason(), "geolocation fell back");
                    LocationRecord::fallback(err.reason())
                }
            };
            if worker_token.is_cancelled() {
                debug!("lookup settled after cancellation, result dropped");
                return;
            }
            let _ = tx.send(record);
        });

    if let Err(err) = spawned {
        warn!(error = %err, "failed to spawn lookup worker");
    }

    LookupHandle {
        token,
        rx,
        started,
        deadline: timeout,
    }
}

/// The blocking request itself: one GET, status check, body validation.
fn request(url: &str, timeout: Duration) -> Result<LocationRecord, LookupError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(LookupError::Status(response.status()));
    }

    let body: ProviderResponse = response.json()?;
    body.into_record().ok_or(LookupError::MissingFields)
}
