//! Shared constants and invariants

/// Delay before the background task retries after a failed fetch.
/// Also applied when a forced refresh fails.
pub const RETRY_DELAY_SECS: u64 = 60;

/// Default request timeout for the bundled HTTP transport. The cache itself
/// never bounds a fetch; the transport must.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// Default cadence for the daemon status report.
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 300;
