//! # Token Keeper Library
//!
//! Provides a self-refreshing cache for a single short-lived access token:
//! readers get the current token with no I/O, a background task renews it
//! on a schedule derived from the server-declared expiry, and a forced
//! refresh escape hatch renews it on demand.
//!
//! Modules:
//! - `cache`: the token cache, its slot and the expiry-buffering policy
//! - `source`: the fetch collaborator contract and the bundled HTTP transport
//! - `config`: service configuration
//! - `error`: error taxonomy

pub mod cache;
pub mod config;
pub mod error;
pub mod source;
pub mod tests;
pub mod utils;

pub use crate::cache::expiry::effective_ttl;
pub use crate::cache::slot::TokenStatus;
pub use crate::cache::token_cache::TokenCache;
pub use crate::config::loader::load_config;
pub use crate::config::settings::ServiceConfig;
pub use crate::error::TokenError;
pub use crate::source::http::{AuthStyle, HttpTokenSource};
pub use crate::source::{Credentials, FetchedToken, TokenSource};
