//! Browser-related commands.

use crate::debug_logger::DebugLogger;

/// Open a URL in the system's default browser
pub fn open_browser(logger: &DebugLogger, url: &str) -> Result<(), String> {
    logger.debug(format!("Opening browser to: {}", url));
    match open::that(url) {
        Ok(_) => {
            logger.debug("Browser opened successfully".to_string());
            Ok(())
        }
        Err(e) => {
            let error_msg = format!("Failed to open browser: {}", e);
            logger.warn(error_msg.clone());
            Err(error_msg)
        }
    }
}
