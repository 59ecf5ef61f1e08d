/// Source module
///
/// Defines the fetch collaborator contract the cache depends on and the
/// bundled HTTP transport implementing it.
pub mod http;

use crate::error::TokenError;

/// Identity used to obtain tokens. One cache instance serves exactly one
/// credential pair; the cache passes it through to the source untouched.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// A freshly issued token together with the raw server-declared expiry in
/// seconds. The expiry is consumed once, to derive the refresh schedule,
/// and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedToken {
    pub value: String,
    pub expires_in: i64,
}

pub trait TokenSource {
    fn fetch_token(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<FetchedToken, TokenError>> + Send;
}
