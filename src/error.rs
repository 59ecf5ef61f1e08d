use thiserror::Error;

/// Errors surfaced by the token cache and its fetch collaborators.
///
/// The cache stores the most recent error in its slot and hands out clones
/// to every reader, so transport failures are carried as strings rather
/// than as the underlying (non-cloneable) client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token endpoint could not be reached, answered with a non-success
    /// status, or returned a body that does not parse.
    #[error("token fetch failed: {0}")]
    Transport(String),

    /// The remote service answered with its own error envelope.
    #[error("token endpoint error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The remote service declared a non-positive expiry for the token.
    #[error("token endpoint declared invalid expiry: {0}")]
    InvalidExpiry(i64),
}

impl TokenError {
    pub fn transport(message: impl Into<String>) -> Self {
        TokenError::Transport(message.into())
    }
}
