// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! OAuth2 client for the Withings token endpoint.
//!
//! Withings routes both the authorization-code exchange and the refresh
//! grant through a single `action=requesttoken` POST, and wraps the result
//! in its `{status, body}` envelope. A token request succeeds only when
//! the HTTP status is 200, the envelope status is 0, and both tokens are
//! present; every other outcome is an
//! [`Authentication`](crate::errors::Error::Authentication) error carrying
//! the raw response body.
//!
//! The client never persists tokens. Persistence belongs to the caller,
//! through a [`CredentialStore`](crate::store::CredentialStore).

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::constants::{api, endpoints, limits, oauth};
use crate::errors::{Error, Result};
use crate::store::Credentials;

#[derive(Debug, Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the URI registered with the developer portal exactly.
    pub redirect_uri: String,
    pub scope: String,
}

impl OAuth2Config {
    /// Build a config from stored credentials. Fails with a
    /// [`Configuration`](Error::Configuration) error when the client id or
    /// secret is missing, since no token operation can proceed without them.
    pub fn from_credentials(
        credentials: &Credentials,
        redirect_uri: impl Into<String>,
    ) -> Result<Self> {
        if credentials.client_id.is_empty() {
            return Err(Error::Configuration("CLIENT_ID is empty".into()));
        }
        if credentials.client_secret.is_empty() {
            return Err(Error::Configuration("CLIENT_SECRET is empty".into()));
        }
        Ok(Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            redirect_uri: redirect_uri.into(),
            scope: oauth::DEFAULT_SCOPE.to_string(),
        })
    }
}

/// A token pair returned by the provider. `expires_at` is derived from the
/// envelope's `expires_in` at the moment the response is processed.
#[derive(Debug, Clone)]
pub struct OAuth2Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuth2Token {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now(),
            None => false,
        }
    }

    pub fn will_expire_soon(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now() + Duration::minutes(5),
            None => false,
        }
    }
}

pub struct OAuth2Client {
    config: OAuth2Config,
    http: reqwest::Client,
    token_url: String,
}

impl OAuth2Client {
    pub fn new(config: OAuth2Config) -> Result<Self> {
        Self::with_token_url(config, endpoints::TOKEN_URL)
    }

    /// Point the client at a different token endpoint, e.g. a mock server.
    pub fn with_token_url(config: OAuth2Config, token_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(limits::REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            config,
            http,
            token_url: token_url.into(),
        })
    }

    /// Build the browser-facing authorization URL. Pure string
    /// construction; every parameter is URL-encoded by the query builder.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(endpoints::AUTHORIZE_URL)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", &self.config.scope)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    /// Exchange an authorization code pasted back from the browser
    /// redirect for a token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuth2Token> {
        debug!("exchanging authorization code for tokens");
        let params = [
            ("action", api::ACTION_REQUEST_TOKEN),
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.request_token(&params).await
    }

    /// Trade a refresh token for a fresh pair. Withings rotates the
    /// refresh token on every call, so the caller must persist both
    /// returned tokens.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token> {
        debug!("refreshing access token");
        let params = [
            ("action", api::ACTION_REQUEST_TOKEN),
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<OAuth2Token> {
        let response = self.http.post(&self.token_url).form(params).send().await?;

        let http_status = response.status();
        let text = response.text().await?;
        if !http_status.is_success() {
            return Err(Error::Authentication { body: text });
        }

        let envelope: TokenEnvelope = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) => return Err(Error::Authentication { body: text }),
        };
        if envelope.status != api::STATUS_OK {
            return Err(Error::Authentication { body: text });
        }
        let tokens = match envelope.body {
            Some(tokens) => tokens,
            None => return Err(Error::Authentication { body: text }),
        };
        let (access_token, refresh_token) = match (tokens.access_token, tokens.refresh_token) {
            (Some(access_token), Some(refresh_token)) => (access_token, refresh_token),
            _ => return Err(Error::Authentication { body: text }),
        };

        let expires_at = tokens
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));

        info!("token request succeeded");
        Ok(OAuth2Token {
            access_token,
            refresh_token,
            expires_at,
        })
    }
}

/// Opaque state parameter for a new authorization attempt.
pub fn generate_state() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    status: i64,
    body: Option<TokenBody>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}
