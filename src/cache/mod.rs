pub mod expiry;
pub mod slot;
pub mod token_cache;
