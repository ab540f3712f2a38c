//! Configuration file utilities
//!
//! Provides helper functions for reading and writing the uploader's JSON
//! files. Everything lives in the platform-specific config directory under
//! "p3d-uploader/".

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "p3d-uploader";

/// File holding the authorization code and the cached token bundle
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Get the app's config directory path.
///
/// Returns: `~/.config/p3d-uploader` (Linux)
///          `~/Library/Application Support/p3d-uploader` (macOS)
///          `C:\Users\<User>\AppData\Roaming\p3d-uploader` (Windows)
pub fn get_config_dir() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir()
        .ok_or("Could not find config directory")?;
    Ok(config_dir.join(APP_DIR_NAME))
}

/// Get the directory where log files and debug reports are written.
///
/// Returns: `~/.p3d-uploader/logs`
pub fn get_logs_dir() -> Result<PathBuf, String> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| "Could not find home directory".to_string())?;
    Ok(home_dir.join(format!(".{}", APP_DIR_NAME)).join("logs"))
}

/// Get the full path to a config file.
pub fn config_file_path(filename: &str) -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join(filename))
}

/// Serialize `data` as pretty JSON into `path`, creating parent directories.
pub fn save_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(path, json)
        .map_err(|e| format!("Failed to write config file: {}", e))
}

/// Load JSON data from `path`.
///
/// # Returns
/// * `Ok(Some(data))` if file exists and was parsed successfully
/// * `Ok(None)` if file doesn't exist
/// * `Err(...)` if file exists but couldn't be read/parsed
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    let data = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config file: {}", e))?;

    Ok(Some(data))
}

/// Remove a config file if it exists. Returns whether anything was deleted.
pub fn remove_json_file(path: &Path) -> Result<bool, String> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)
        .map_err(|e| format!("Failed to delete config file: {}", e))?;
    Ok(true)
}
