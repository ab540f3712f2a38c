//! Application state manager: loads, shares and persists the credentials.

use std::path::PathBuf;
use std::sync::Arc;
use crate::clock::{Clock, SystemClock};
use crate::config_utils::{self, CREDENTIALS_FILE};
use crate::debug_logger::{DebugLogger, Reporter};
use crate::export::ModelExporter;
use crate::settings::Settings;
use crate::token_manager::TokenManager;
use crate::types::CredentialState;
use crate::upload_manager::UploadManager;
use super::{lock_credentials, shared_credentials, SharedCredentials};

/// Owns the shared resources a command needs
pub struct AppStateManager {
    pub settings: Settings,
    pub credentials: SharedCredentials,
    /// Where `credentials` is persisted between runs
    pub credentials_path: PathBuf,
    pub debug_logger: Arc<DebugLogger>,
    pub clock: Arc<dyn Clock>,
}

impl AppStateManager {
    /// Load persisted credentials from the default config location
    pub fn load(settings: Settings) -> Result<Self, String> {
        let path = config_utils::config_file_path(CREDENTIALS_FILE)?;
        Self::load_from(settings, path)
    }

    pub fn load_from(settings: Settings, credentials_path: PathBuf) -> Result<Self, String> {
        let debug_logger = Arc::new(DebugLogger::new());
        let state: CredentialState = config_utils::load_json_file(&credentials_path)?
            .unwrap_or_default();

        debug_logger.debug(format!(
            "Loaded credentials from {} (authorization code: {}, cached token: {})",
            credentials_path.display(),
            state.has_authorization_code(),
            state.token.is_some()
        ));

        Ok(Self {
            settings,
            credentials: shared_credentials(state),
            credentials_path,
            debug_logger,
            clock: Arc::new(SystemClock),
        })
    }

    /// Write the authorization code and token bundle back to disk
    pub fn persist_credentials(&self) -> Result<(), String> {
        let snapshot = lock_credentials(&self.credentials).clone();
        config_utils::save_json_file(&self.credentials_path, &snapshot)
            .map_err(|e| {
                self.debug_logger.error(e.clone());
                e
            })?;
        self.debug_logger.debug("Credentials saved".to_string());
        Ok(())
    }

    pub fn token_manager(&self) -> TokenManager {
        TokenManager::new(&self.settings, Arc::clone(&self.clock))
    }

    pub fn upload_manager(&self, exporter: Arc<dyn ModelExporter>) -> UploadManager {
        UploadManager::new(
            Arc::clone(&self.credentials),
            self.token_manager(),
            &self.settings,
            exporter,
            Arc::clone(&self.debug_logger) as Arc<dyn Reporter>,
        )
    }
}
