//! Upload command: token, export, upload, persist.

use std::path::PathBuf;
use std::sync::Arc;
use crate::errors::UploadError;
use crate::export::{ExportConfig, FileExporter};
use crate::state::AppStateManager;
use crate::upload_manager::UploadJob;

/// Arguments for one upload, as collected from the user
#[derive(Debug, Clone)]
pub struct UploadArgs {
    pub model_path: PathBuf,
    pub model_name: String,
    pub model_description: String,
    pub authorization_code: Option<String>,
    pub export_config: ExportConfig,
}

/// Upload a model and persist whatever happened to the credentials.
///
/// Credentials are saved even on failure, because a rejected code or an
/// expired session changes the stored state.
pub async fn upload_model(
    state_manager: &AppStateManager,
    args: UploadArgs,
) -> Result<(), UploadError> {
    let exporter = Arc::new(FileExporter::new(args.model_path));
    let manager = state_manager.upload_manager(exporter);

    let result = manager
        .run(UploadJob {
            model_name: args.model_name,
            model_description: args.model_description,
            authorization_code: args.authorization_code,
            export_config: args.export_config,
        })
        .await;

    if let Err(e) = state_manager.persist_credentials() {
        tracing::warn!("Could not save credentials: {}", e);
    }

    result
}
