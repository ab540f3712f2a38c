//! Debug and diagnostic commands.

use std::path::PathBuf;
use crate::config_utils;
use crate::state::AppStateManager;
use super::tokens::credential_status;

/// Export the debug log to the logs directory and return the file path
pub fn export_debug_log(state_manager: &AppStateManager) -> Result<PathBuf, String> {
    let logs_dir = config_utils::get_logs_dir()?;
    let status = credential_status(state_manager);

    state_manager.debug_logger.save_report_to_file(
        &logs_dir,
        status.has_authorization_code,
        status.token_expires_at,
    )
}
