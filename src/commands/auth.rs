//! Authorization commands: get a code from the browser and store it.

use crate::state::{lock_credentials, AppStateManager};
use super::browser::open_browser;

/// Start the authorization flow.
///
/// Opens the P3d.in authorize page (unless `print_only`) and returns its
/// URL. After approving, the user is redirected to a page showing the code
/// to paste back with `set-code`.
pub fn authorize(state_manager: &AppStateManager, print_only: bool) -> Result<String, String> {
    let url = state_manager.settings.authorize_url()?;
    state_manager.debug_logger.info("Opening P3d.in authorization page".to_string());

    if !print_only {
        // The URL is still returned, so a missing browser is not fatal
        let _ = open_browser(&state_manager.debug_logger, &url);
    }

    Ok(url)
}

/// Store a pasted authorization code and persist it
pub fn set_authorization_code(state_manager: &AppStateManager, code: &str) -> Result<(), String> {
    let code = code.trim();
    if code.is_empty() {
        let error_msg = "Authentication code is required!!".to_string();
        state_manager.debug_logger.error(error_msg.clone());
        return Err(error_msg);
    }

    lock_credentials(&state_manager.credentials).set_authorization_code(code);
    state_manager.persist_credentials()?;
    state_manager.debug_logger.info("Authorization code saved".to_string());
    Ok(())
}
