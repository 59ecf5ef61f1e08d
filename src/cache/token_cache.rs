use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, RwLock};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::cache::expiry::effective_ttl;
use crate::cache::slot::{TokenSlot, TokenStatus};
use crate::config::settings::ServiceConfig;
use crate::error::TokenError;
use crate::source::http::HttpTokenSource;
use crate::source::{Credentials, TokenSource};
use crate::utils::constants::RETRY_DELAY_SECS;

const RETRY_DELAY: Duration = Duration::from_secs(RETRY_DELAY_SECS);

/// Self-refreshing cache for a single shared access token.
///
/// One instance holds one credential pair and one background refresh task.
/// Readers call [`get_token`](TokenCache::get_token) and never touch the
/// network; the background task renews the token on a timer derived from
/// the server-declared expiry and falls back to a fixed one-minute retry
/// cadence on failure. Cloning is cheap and every clone shares the same
/// slot and background task.
pub struct TokenCache<S = HttpTokenSource> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for TokenCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<S> {
    credentials: Credentials,
    source: S,
    slot: RwLock<TokenSlot>,
    /// Single-slot control channel: any refresh, forced or automatic,
    /// reprograms the background task's next wake-up through it.
    reschedule_tx: mpsc::Sender<Duration>,
    shutdown_tx: watch::Sender<bool>,
}

impl<S: TokenSource> Inner<S> {
    /// Fetch a new token and store the outcome in the slot. The caller holds
    /// the write guard, so fetch and update are atomic with respect to
    /// readers and to the other writer.
    async fn fetch_and_store(
        &self,
        slot: &mut TokenSlot,
    ) -> Result<(String, Duration), TokenError> {
        let outcome = match self.source.fetch_token(&self.credentials).await {
            Ok(fetched) => effective_ttl(fetched.expires_in).map(|ttl| (fetched.value, ttl)),
            Err(err) => Err(err),
        };
        match &outcome {
            Ok((value, ttl)) => {
                slot.store_token(value);
                debug!(next_refresh_secs = ttl.as_secs(), "token refreshed");
            }
            Err(err) => {
                slot.store_error(err.clone());
                warn!(error = %err, "token fetch failed");
            }
        }
        outcome
    }
}

impl TokenCache<HttpTokenSource> {
    /// Build a cache backed by the standard HTTP transport.
    ///
    /// Fallible only on transport construction; a failed initial fetch still
    /// yields a working cache that reports the error and keeps retrying.
    pub async fn connect(
        endpoint: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, TokenError> {
        let source = HttpTokenSource::new(endpoint)?;
        Ok(Self::with_source(credentials, source).await)
    }

    /// Build a cache from a loaded service configuration.
    pub async fn from_config(cfg: &ServiceConfig) -> anyhow::Result<Self> {
        let credentials = cfg.credentials.resolve()?;
        let source = HttpTokenSource::from_config(&cfg.endpoint)?;
        Ok(Self::with_source(credentials, source).await)
    }
}

impl<S> TokenCache<S>
where
    S: TokenSource + Send + Sync + 'static,
{
    /// Build a cache around an injected fetch collaborator.
    ///
    /// Performs one fetch inline before returning, so the first
    /// [`get_token`](TokenCache::get_token) already reflects a real outcome,
    /// then starts the background refresh task. The initial delay is the
    /// effective TTL on success and the fixed retry delay on failure.
    pub async fn with_source(credentials: Credentials, source: S) -> Self {
        let (reschedule_tx, reschedule_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let inner = Arc::new(Inner {
            credentials,
            source,
            slot: RwLock::new(TokenSlot::default()),
            reschedule_tx,
            shutdown_tx,
        });

        let first_wait = {
            let mut slot = inner.slot.write().await;
            match inner.fetch_and_store(&mut slot).await {
                Ok((_, ttl)) => ttl,
                Err(_) => RETRY_DELAY,
            }
        };

        tokio::spawn(refresh_loop(inner.clone(), reschedule_rx, shutdown_rx, first_wait));

        Self { inner }
    }

    /// Return the cached token, or the error left by the most recent fetch.
    ///
    /// Lock-protected read with no I/O; safe for unbounded concurrent
    /// callers. Exactly one of token / error is ever present. Retrying is
    /// the background task's job, not the reader's.
    pub async fn get_token(&self) -> Result<String, TokenError> {
        self.inner.slot.read().await.to_result()
    }

    /// Force a token renewal now, bypassing the background schedule.
    ///
    /// Fetches under the exclusive lock, stores the outcome, and reprograms
    /// the background task: to the new effective TTL on success, to the
    /// fixed retry delay on failure (discarding whatever wake-up was
    /// pending). Prefer [`get_token`](TokenCache::get_token): every call
    /// here is a network round-trip, and concurrent forced refreshes
    /// amplify traffic to the token endpoint. The cache does not rate-limit
    /// them; that responsibility sits with the caller.
    pub async fn refresh_token(&self) -> Result<String, TokenError> {
        let mut slot = self.inner.slot.write().await;
        let outcome = self.inner.fetch_and_store(&mut slot).await;
        drop(slot);

        let (result, next) = match outcome {
            Ok((token, ttl)) => (Ok(token), ttl),
            Err(err) => (Err(err), RETRY_DELAY),
        };
        // The background task may race us here; whichever reprogram lands
        // last wins, and both reflect a just-finished fetch. The send only
        // fails after shutdown, when there is no task left to reprogram.
        let _ = self.inner.reschedule_tx.send(next).await;
        result
    }

    /// Snapshot of the slot for status reporting.
    pub async fn status(&self) -> TokenStatus {
        self.inner.slot.read().await.status()
    }

    /// Stop the background refresh task. The cache remains usable:
    /// `get_token` keeps serving the last outcome and `refresh_token`
    /// still fetches on demand.
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }
}

/// The perpetual refresh task: waits, fires, re-arms.
///
/// A message on the control channel abandons the current timer and waits
/// the received duration instead. When the timer elapses the task fetches
/// under the exclusive lock and re-arms with the new effective TTL, or with
/// the fixed retry delay after a failure.
async fn refresh_loop<S: TokenSource>(
    inner: Arc<Inner<S>>,
    mut reschedule_rx: mpsc::Receiver<Duration>,
    mut shutdown_rx: watch::Receiver<bool>,
    mut wait: Duration,
) {
    loop {
        tokio::select! {
            Some(next) = reschedule_rx.recv() => {
                debug!(wait_secs = next.as_secs(), "refresh timer reprogrammed");
                wait = next;
            }
            _ = sleep(wait) => {
                let mut slot = inner.slot.write().await;
                let outcome = inner.fetch_and_store(&mut slot).await;
                drop(slot);
                wait = match outcome {
                    Ok((_, ttl)) => ttl,
                    Err(_) => RETRY_DELAY,
                };
            }
            _ = shutdown_rx.changed() => {
                info!("token refresh task stopped");
                return;
            }
        }
    }
}
