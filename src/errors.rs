// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error taxonomy for the Withings client.
//!
//! Provider-level failures carry the raw response body so callers can see
//! the provider's own diagnostics. The measurement endpoint does not
//! distinguish an expired token from a malformed request, so both surface
//! as [`Error::TokenOrRequest`]; callers should treat that variant as a
//! single retryable-by-reauthentication class.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required client id/secret are absent or unusable.
    #[error("client credentials are not configured: {0}")]
    Configuration(String),

    /// The token endpoint returned non-200, a non-zero application status,
    /// or a body missing the expected token fields.
    #[error("token request rejected by the provider: {body}")]
    Authentication { body: String },

    /// The measurement endpoint returned non-200, or 200 with a non-zero
    /// application status. Expired tokens and malformed requests are
    /// indistinguishable here without inspecting the body.
    #[error("workout request failed (expired token or bad request): {body}")]
    TokenOrRequest { body: String },

    /// A category id appeared in a response that is not part of the
    /// [`WorkoutCategory`](crate::models::WorkoutCategory) enumeration.
    #[error("unknown workout category id: {0}")]
    UnknownCategory(i64),

    /// Transport-level failure before any provider response was obtained.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential file could not be read or written.
    #[error("credential store i/o error: {0}")]
    Store(#[from] std::io::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether re-running the authorization or refresh flow could clear
    /// this error.
    pub fn is_retryable_by_reauthentication(&self) -> bool {
        matches!(self, Error::TokenOrRequest { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
