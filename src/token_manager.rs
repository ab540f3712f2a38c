use std::sync::Arc;
use crate::api_contracts::{GrantType, TokenRequest, TokenResponse};
use crate::clock::Clock;
use crate::errors::UploadError;
use crate::settings::Settings;
use crate::state::{lock_credentials, SharedCredentials};

/// What to do after looking at the cached credentials
#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenPlan {
    Reuse(String),
    Exchange { code: String },
    Refresh { refresh_token: String },
}

/// Owns the reuse-or-refresh decision for the single P3d.in credential
pub struct TokenManager {
    token_url: String,
    client_id: String,
    redirect_uri: String,
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(settings: &Settings, clock: Arc<dyn Clock>) -> Self {
        Self {
            token_url: settings.token_url.clone(),
            client_id: settings.client_id.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            client: settings.http_client(),
            clock,
        }
    }

    /// Return a usable access token, calling the token endpoint only when
    /// nothing fresh is cached.
    ///
    /// A rejected grant clears the authorization code so the user is asked
    /// to authorize again.
    pub async fn obtain_access_token(
        &self,
        credentials: &SharedCredentials,
    ) -> Result<String, UploadError> {
        let plan = self.plan(credentials)?;

        let request = match &plan {
            TokenPlan::Reuse(access_token) => {
                tracing::debug!("Reusing cached access token");
                return Ok(access_token.clone());
            }
            TokenPlan::Exchange { code } => {
                TokenRequest::authorization_code(&self.client_id, code, &self.redirect_uri)
            }
            TokenPlan::Refresh { refresh_token } => {
                TokenRequest::refresh(&self.client_id, refresh_token, &self.redirect_uri)
            }
        };

        self.request_token(credentials, &request).await
    }

    fn plan(&self, credentials: &SharedCredentials) -> Result<TokenPlan, UploadError> {
        let state = lock_credentials(credentials);

        if !state.has_authorization_code() {
            return Err(UploadError::MissingAuthCode);
        }

        let plan = match &state.token {
            Some(stored) if stored.is_fresh(self.clock.now()) => {
                TokenPlan::Reuse(stored.bundle.access_token.clone())
            }
            Some(stored) => TokenPlan::Refresh {
                refresh_token: stored.bundle.refresh_token.clone(),
            },
            None => TokenPlan::Exchange {
                code: state.authorization_code.clone(),
            },
        };
        Ok(plan)
    }

    async fn request_token(
        &self,
        credentials: &SharedCredentials,
        request: &TokenRequest<'_>,
    ) -> Result<String, UploadError> {
        tracing::info!(grant_type = request.grant_type.as_str(), "Requesting access token");

        let response = self.client
            .post(&self.token_url)
            .form(request)
            .send()
            .await
            .map_err(|e| UploadError::transport("Network error", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Token request rejected, clearing authorization code");
            lock_credentials(credentials).clear_authorization_code();
            return Err(UploadError::AuthRequestFailed(if error_text.is_empty() {
                status.to_string()
            } else {
                error_text
            }));
        }

        let data: TokenResponse = response
            .json()
            .await
            .map_err(|e| UploadError::transport("Failed to parse token response", e))?;

        let bundle = data.into_bundle().ok_or_else(|| {
            UploadError::AuthRequestFailed("Token response did not include an access token".to_string())
        })?;

        let access_token = bundle.access_token.clone();
        let fetched_at = self.clock.now();
        lock_credentials(credentials).store_token(bundle, fetched_at);

        if request.grant_type == GrantType::RefreshToken {
            tracing::info!("Access token refreshed");
        } else {
            tracing::info!("Authorization code exchanged for access token");
        }

        Ok(access_token)
    }
}
