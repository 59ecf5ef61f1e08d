use std::time::Duration;

use crate::error::TokenError;

/// Convert a server-declared expiry into the duration used to schedule the
/// next refresh.
///
/// The declared expiry is a hard deadline at the server; network latency and
/// clock skew mean a client waiting exactly that long risks presenting an
/// expired token. The margin scales with the magnitude of the expiry so that
/// short-lived tokens are not reduced to zero:
///
/// - above 1 hour: 10 minutes
/// - above 30 minutes: 5 minutes
/// - above 5 minutes: 1 minute
/// - above 1 minute: 10 seconds
/// - 1..=60 seconds: used as-is, best effort
///
/// A non-positive expiry is rejected with [`TokenError::InvalidExpiry`].
pub fn effective_ttl(expires_in: i64) -> Result<Duration, TokenError> {
    let buffered = match expires_in {
        s if s > 60 * 60 => s - 60 * 10,
        s if s > 60 * 30 => s - 60 * 5,
        s if s > 60 * 5 => s - 60,
        s if s > 60 => s - 10,
        s if s > 0 => s,
        s => return Err(TokenError::InvalidExpiry(s)),
    };
    Ok(Duration::from_secs(buffered as u64))
}
