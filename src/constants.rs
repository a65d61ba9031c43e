// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Provider endpoints, OAuth defaults, and environment-based overrides.

/// Withings endpoints. The defaults point at the production service;
/// clients accept overrides so tests can target a mock server.
pub mod endpoints {
    /// Browser-facing authorization page.
    pub const AUTHORIZE_URL: &str = "https://account.withings.com/oauth2_user/authorize2";

    /// Token endpoint, shared by code exchange and refresh.
    pub const TOKEN_URL: &str = "https://wbsapi.withings.net/v2/oauth2";

    /// Measurement endpoint serving `getworkouts`.
    pub const MEASURE_URL: &str = "https://wbsapi.withings.net/v2/measure";
}

/// OAuth2 parameters.
pub mod oauth {
    use std::env;

    /// Scope required to read workout data.
    pub const DEFAULT_SCOPE: &str = "user.activity";

    /// Redirect URI registered with the provider. There is no usable
    /// default: the value must match the developer-portal registration
    /// exactly.
    pub fn redirect_uri() -> Option<String> {
        env::var("WITHINGS_REDIRECT_URI").ok()
    }
}

/// Application-level protocol values. Withings wraps every response in a
/// `{status, body}` envelope; HTTP 200 alone does not mean success.
pub mod api {
    /// Envelope status signalling success.
    pub const STATUS_OK: i64 = 0;

    pub const ACTION_REQUEST_TOKEN: &str = "requesttoken";
    pub const ACTION_GET_WORKOUTS: &str = "getworkouts";
}

/// Request limits. The provider specifies no timeout; both HTTP clients
/// apply this bounded default.
pub mod limits {
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Environment-based configuration.
pub mod env_config {
    use std::env;
    use std::path::PathBuf;

    /// Credential file location: `WITHINGS_CREDENTIALS_FILE`, then the
    /// user config directory, then the working directory.
    pub fn credentials_path() -> PathBuf {
        if let Ok(path) = env::var("WITHINGS_CREDENTIALS_FILE") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|p| p.join("withings-workouts/credentials.env"))
            .unwrap_or_else(|| PathBuf::from("credentials.env"))
    }
}
