//! Credential inspection and logout commands.

use serde::Serialize;
use crate::config_utils;
use crate::state::{lock_credentials, AppStateManager};

/// What the user may see about the stored credentials. Never the tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialStatus {
    pub has_authorization_code: bool,
    pub has_token: bool,
    pub token_expires_at: Option<String>,
    pub token_fresh: bool,
}

pub fn credential_status(state_manager: &AppStateManager) -> CredentialStatus {
    let now = state_manager.clock.now();
    let state = lock_credentials(&state_manager.credentials);

    CredentialStatus {
        has_authorization_code: state.has_authorization_code(),
        has_token: state.token.is_some(),
        token_expires_at: state.token.as_ref().map(|t| t.expires_at.to_rfc3339()),
        token_fresh: state.fresh_access_token(now).is_some(),
    }
}

/// Forget the authorization code and token bundle (logout)
pub fn clear_credentials(state_manager: &AppStateManager) -> Result<(), String> {
    state_manager.debug_logger.info("Clearing stored credentials".to_string());
    {
        let mut state = lock_credentials(&state_manager.credentials);
        state.clear_authorization_code();
        state.clear_token();
    }

    if config_utils::remove_json_file(&state_manager.credentials_path)? {
        state_manager.debug_logger.debug("Credentials file deleted".to_string());
    } else {
        state_manager.debug_logger.debug("No credentials file to delete".to_string());
    }
    Ok(())
}
