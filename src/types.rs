//! Core types for the credential state and token bundle.
//!
//! This module contains the data structures used for storing the
//! authorization code, the cached token bundle and its expiry.

use chrono::{DateTime, Duration, Utc};

/// Access/refresh token pair returned by the authorization server
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Declared lifetime in seconds
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// A token bundle together with the instant it goes stale.
///
/// Keeping both in one value means the bundle and its expiry are always
/// written (and cleared) together.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StoredToken {
    pub bundle: TokenBundle,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Process-wide credential state shared by the token manager and the uploader
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CredentialState {
    #[serde(default)]
    pub authorization_code: String,
    #[serde(default)]
    pub token: Option<StoredToken>,
    /// True only while one upload is in flight. Never persisted.
    #[serde(skip)]
    pub is_busy: bool,
}

impl CredentialState {
    pub fn has_authorization_code(&self) -> bool {
        !self.authorization_code.is_empty()
    }

    /// Store a pasted authorization code.
    ///
    /// A different code starts a new grant, so any bundle obtained with the
    /// previous one is dropped as well.
    pub fn set_authorization_code(&mut self, code: &str) {
        let code = code.trim();
        if code == self.authorization_code {
            return;
        }
        self.authorization_code = code.to_string();
        self.token = None;
    }

    pub fn clear_authorization_code(&mut self) {
        self.authorization_code.clear();
    }

    /// Replace the cached bundle and recompute its expiry from `fetched_at`.
    pub fn store_token(&mut self, bundle: TokenBundle, fetched_at: DateTime<Utc>) {
        let lifetime = i64::try_from(bundle.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let expires_at = fetched_at
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.token = Some(StoredToken { bundle, expires_at });
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// The cached access token, if one exists and has not gone stale.
    pub fn fresh_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        self.token
            .as_ref()
            .filter(|stored| stored.is_fresh(now))
            .map(|stored| stored.bundle.access_token.as_str())
    }
}
