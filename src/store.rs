// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Durable credential storage.
//!
//! Credentials are an explicit value passed into the authenticator and
//! client, never ambient process state. Persistence is injected through
//! the [`CredentialStore`] trait; [`EnvFileStore`] is the flat
//! `KEY=VALUE` file implementation the CLI uses.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::env_config;
use crate::errors::{Error, Result};

const CLIENT_ID_KEY: &str = "CLIENT_ID";
const CLIENT_SECRET_KEY: &str = "CLIENT_SECRET";
const ACCESS_TOKEN_KEY: &str = "ACCESS_TOKEN";
const REFRESH_TOKEN_KEY: &str = "REFRESH_TOKEN";

/// Client registration plus the current token pair, if any. The client
/// id and secret are required for every token operation; the access token
/// may be absent (never authorized) or stale (provider will reject it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            access_token: None,
            refresh_token: None,
        }
    }

    /// Replace both tokens after a successful exchange or refresh. The
    /// provider rotates the refresh token, so the pair is always replaced
    /// together.
    pub fn update_tokens(&mut self, access_token: &str, refresh_token: &str) {
        self.access_token = Some(access_token.to_string());
        self.refresh_token = Some(refresh_token.to_string());
    }
}

/// Injected persistence capability for [`Credentials`].
pub trait CredentialStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Credentials>>;

    fn save(&self, credentials: &Credentials) -> Result<()>;
}

/// `KEY=VALUE` file store, one key per line. Values run to the end of the
/// line, so they may themselves contain `=`; they may not contain
/// newlines.
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (see
    /// [`env_config::credentials_path`]).
    pub fn default_location() -> Self {
        Self::new(env_config::credentials_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for EnvFileStore {
    fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no credential file");
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;

        let mut values: HashMap<&str, &str> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key, value);
            }
        }

        let client_id = values.get(CLIENT_ID_KEY).copied().ok_or_else(|| {
            Error::Configuration(format!(
                "{} missing from {}",
                CLIENT_ID_KEY,
                self.path.display()
            ))
        })?;
        let client_secret = values.get(CLIENT_SECRET_KEY).copied().ok_or_else(|| {
            Error::Configuration(format!(
                "{} missing from {}",
                CLIENT_SECRET_KEY,
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), "loaded credentials");
        Ok(Some(Credentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            access_token: values.get(ACCESS_TOKEN_KEY).map(|v| v.to_string()),
            refresh_token: values.get(REFRESH_TOKEN_KEY).map(|v| v.to_string()),
        }))
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        content.push_str(&format!("{}={}\n", CLIENT_ID_KEY, credentials.client_id));
        content.push_str(&format!(
            "{}={}\n",
            CLIENT_SECRET_KEY, credentials.client_secret
        ));
        if let Some(access_token) = &credentials.access_token {
            content.push_str(&format!("{}={}\n", ACCESS_TOKEN_KEY, access_token));
        }
        if let Some(refresh_token) = &credentials.refresh_token {
            content.push_str(&format!("{}={}\n", REFRESH_TOKEN_KEY, refresh_token));
        }

        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> EnvFileStore {
        EnvFileStore::new(dir.path().join("credentials.env"))
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut credentials = Credentials::new("id-123", "secret-456");
        credentials.update_tokens("access-789", "refresh-012");
        store.save(&credentials).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, credentials);
    }

    #[test]
    fn tokens_are_optional_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let credentials = Credentials::new("id", "secret");
        store.save(&credentials).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, None);
        assert_eq!(loaded.refresh_token, None);
    }

    #[test]
    fn values_may_contain_equals_signs() {
        // Tokens are opaque; base64-style padding must survive.
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut credentials = Credentials::new("id", "secret");
        credentials.update_tokens("abc==", "d=e=f");
        store.save(&credentials).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("abc=="));
        assert_eq!(loaded.refresh_token.as_deref(), Some("d=e=f"));
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut first = Credentials::new("id", "secret");
        first.update_tokens("old-access", "old-refresh");
        store.save(&first).unwrap();

        let mut second = first.clone();
        second.update_tokens("new-access", "new-refresh");
        store.save(&second).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("new-access"));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("old-access"));
    }

    #[test]
    fn file_without_client_keys_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.env");
        std::fs::write(&path, "ACCESS_TOKEN=only-a-token\n").unwrap();

        let store = EnvFileStore::new(path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = EnvFileStore::new(dir.path().join("nested/deeper/credentials.env"));

        store.save(&Credentials::new("id", "secret")).unwrap();
        assert!(store.path().exists());
    }
}
