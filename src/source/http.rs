use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::Deserialize;

use crate::config::settings::EndpointConfig;
use crate::error::TokenError;
use crate::source::{Credentials, FetchedToken, TokenSource};
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

/// How the bundled transport presents the credential pair to the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStyle {
    /// `client_id` / `client_secret` as query parameters.
    #[default]
    Query,
    /// `Authorization: Basic base64(client_id:client_secret)`.
    Basic,
}

/// The standard transport: one GET against a token endpoint that answers
/// with either `{access_token, expires_in}` or an `{errcode, errmsg}`
/// error envelope.
#[derive(Debug, Clone)]
pub struct HttpTokenSource {
    client: Client,
    endpoint: String,
    auth_style: AuthStyle,
}

/// Token endpoint response. Success and error fields share one envelope;
/// a non-zero `errcode` wins over whatever else is present.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

impl TokenEndpointResponse {
    fn into_fetched(self) -> Result<FetchedToken, TokenError> {
        if self.errcode != 0 {
            return Err(TokenError::Remote {
                code: self.errcode,
                message: self.errmsg,
            });
        }
        match (self.access_token, self.expires_in) {
            (Some(value), Some(expires_in)) if !value.is_empty() => {
                Ok(FetchedToken { value, expires_in })
            }
            _ => Err(TokenError::transport(
                "token endpoint response missing access_token or expires_in",
            )),
        }
    }
}

impl HttpTokenSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TokenError> {
        Self::with_timeout(endpoint, Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS))
    }

    /// The cache never bounds a fetch; a request timeout here is what keeps
    /// a hung endpoint from hanging `refresh_token` and construction.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TokenError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TokenError::transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_style: AuthStyle::default(),
        })
    }

    pub fn auth_style(mut self, auth_style: AuthStyle) -> Self {
        self.auth_style = auth_style;
        self
    }

    pub fn from_config(cfg: &EndpointConfig) -> Result<Self, TokenError> {
        let timeout = Duration::from_millis(cfg.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS));
        Ok(Self::with_timeout(cfg.url.as_str(), timeout)?.auth_style(cfg.auth_style))
    }
}

impl TokenSource for HttpTokenSource {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<FetchedToken, TokenError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("grant_type", "client_credentials")]);

        request = match self.auth_style {
            AuthStyle::Query => request.query(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ]),
            AuthStyle::Basic => {
                let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
                request.header("Authorization", format!("Basic {}", BASE64.encode(raw)))
            }
        };

        let response = request
            .send()
            .await
            .map_err(|err| TokenError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::transport(format!(
                "token endpoint returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| TokenError::transport(err.to_string()))?;
        let parsed: TokenEndpointResponse = serde_json::from_str(&body)
            .map_err(|err| TokenError::transport(format!("invalid token response: {err}")))?;
        parsed.into_fetched()
    }
}
