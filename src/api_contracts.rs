//! Wire contracts for the P3d.in token and upload endpoints.
//!
//! Keeping request/response shapes here means a change on the server side
//! only has to be mirrored in one place.

use serde::{Deserialize, Serialize};
use crate::types::TokenBundle;

// ============================================================================
// Token endpoint
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

/// Form body for `POST /o/token/`
///
/// Exactly one of `code` / `refresh_token` is present, matching `grant_type`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
    pub grant_type: GrantType,
    pub redirect_uri: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn authorization_code(client_id: &'a str, code: &'a str, redirect_uri: &'a str) -> Self {
        Self {
            client_id,
            code: Some(code),
            refresh_token: None,
            grant_type: GrantType::AuthorizationCode,
            redirect_uri,
        }
    }

    pub fn refresh(client_id: &'a str, refresh_token: &'a str, redirect_uri: &'a str) -> Self {
        Self {
            client_id,
            code: None,
            refresh_token: Some(refresh_token),
            grant_type: GrantType::RefreshToken,
            redirect_uri,
        }
    }
}

/// Successful token endpoint payload. Every field is optional on the wire;
/// a missing access token is treated as a failed request.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    pub fn into_bundle(self) -> Option<TokenBundle> {
        let access_token = self.access_token.filter(|token| !token.is_empty())?;
        Some(TokenBundle {
            access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(0),
            token_type: self.token_type,
            scope: self.scope,
        })
    }
}

// ============================================================================
// Upload endpoint
// ============================================================================

pub const MODEL_PART: &str = "model";
pub const SNAPSHOT_PART: &str = "snapshot";
pub const MODEL_INFO_FIELD: &str = "model_info";

/// Value of the `model_info` form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

impl ModelInfo {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
