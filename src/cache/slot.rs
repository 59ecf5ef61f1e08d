use chrono::{DateTime, Utc};

use crate::error::TokenError;

/// Shared token state guarded by the cache's read/write lock.
///
/// Invariant: after the construction-time fetch has run, exactly one of
/// `value` non-empty / `last_error` set holds. Every store replaces the
/// whole pair, so readers never observe a mixed state.
#[derive(Debug, Default)]
pub(crate) struct TokenSlot {
    value: String,
    last_error: Option<TokenError>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Read-only snapshot of the slot, for status reporting.
#[derive(Debug, Clone)]
pub struct TokenStatus {
    pub has_token: bool,
    pub last_error: Option<TokenError>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl TokenSlot {
    pub(crate) fn store_token(&mut self, value: &str) {
        self.value = value.to_owned();
        self.last_error = None;
        self.refreshed_at = Some(Utc::now());
    }

    pub(crate) fn store_error(&mut self, err: TokenError) {
        self.value.clear();
        self.last_error = Some(err);
        self.refreshed_at = Some(Utc::now());
    }

    pub(crate) fn to_result(&self) -> Result<String, TokenError> {
        match &self.last_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.value.clone()),
        }
    }

    pub(crate) fn status(&self) -> TokenStatus {
        TokenStatus {
            has_token: !self.value.is_empty(),
            last_error: self.last_error.clone(),
            refreshed_at: self.refreshed_at,
        }
    }
}
