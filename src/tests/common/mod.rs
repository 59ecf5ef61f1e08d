// tests/common/mod.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::TokenError;
use crate::source::{Credentials, FetchedToken, TokenSource};

pub fn test_credentials() -> Credentials {
    Credentials::new("test-client", "test-secret")
}

/// Scripted fetch collaborator: pops pre-programmed outcomes in order, then
/// keeps returning a fixed fallback outcome. Records the instant of every
/// fetch so tests can assert the refresh schedule against the paused clock.
#[derive(Clone)]
pub struct ScriptedSource {
    state: Arc<ScriptState>,
}

struct ScriptState {
    responses: Mutex<VecDeque<Result<FetchedToken, TokenError>>>,
    fallback: Mutex<Result<FetchedToken, TokenError>>,
    calls: Mutex<Vec<Instant>>,
    delay: Mutex<Duration>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ScriptState {
                responses: Mutex::new(VecDeque::new()),
                fallback: Mutex::new(Err(TokenError::transport("script exhausted"))),
                calls: Mutex::new(Vec::new()),
                delay: Mutex::new(Duration::ZERO),
            }),
        }
    }

    pub fn push_ok(&self, value: &str, expires_in: i64) {
        self.state.responses.lock().unwrap().push_back(Ok(FetchedToken {
            value: value.to_owned(),
            expires_in,
        }));
    }

    pub fn push_err(&self, err: TokenError) {
        self.state.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn fallback_ok(&self, value: &str, expires_in: i64) {
        *self.state.fallback.lock().unwrap() = Ok(FetchedToken {
            value: value.to_owned(),
            expires_in,
        });
    }

    pub fn fallback_err(&self, err: TokenError) {
        *self.state.fallback.lock().unwrap() = Err(err);
    }

    /// Make every subsequent fetch take this long, to widen race windows.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<Instant> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }
}

impl TokenSource for ScriptedSource {
    async fn fetch_token(&self, _credentials: &Credentials) -> Result<FetchedToken, TokenError> {
        self.state.calls.lock().unwrap().push(Instant::now());

        let delay = *self.state.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.state.responses.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => self.state.fallback.lock().unwrap().clone(),
        }
    }
}
