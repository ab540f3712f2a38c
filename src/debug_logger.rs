use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use chrono::Utc;

const MAX_ENTRIES: usize = 1000;

/// Severity of a user-facing report message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for messages shown to the user by the host
pub trait Reporter: Send + Sync {
    fn report(&self, severity: Severity, message: &str);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub timestamp: String,
    pub level: Severity,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugReport {
    pub generated_at: String,
    pub app_version: String,
    pub os: String,
    pub arch: String,
    pub has_authorization_code: bool,
    pub token_expires_at: Option<String>,
    pub error_count: usize,
    pub log_entries: Vec<DebugLogEntry>,
}

/// Records every report message and mirrors it to `tracing`.
pub struct DebugLogger {
    logs: Arc<Mutex<Vec<DebugLogEntry>>>,
    error_count: Arc<Mutex<usize>>,
}

impl DebugLogger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            error_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn log(&self, level: Severity, message: String, context: Option<serde_json::Value>) {
        match level {
            Severity::Info => tracing::info!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }

        let entry = DebugLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level,
            message,
            context,
        };

        if level == Severity::Error {
            if let Ok(mut count) = self.error_count.lock() {
                *count += 1;
            }
        }

        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() >= MAX_ENTRIES {
                logs.remove(0);
            }
            logs.push(entry);
        }
    }

    pub fn info(&self, message: String) {
        self.log(Severity::Info, message, None);
    }

    pub fn warn(&self, message: String) {
        self.log(Severity::Warning, message, None);
    }

    pub fn error(&self, message: String) {
        self.log(Severity::Error, message, None);
    }

    /// Diagnostic detail; goes to tracing only, never to the user.
    pub fn debug(&self, message: String) {
        tracing::debug!("{}", message);
    }

    pub fn get_error_count(&self) -> usize {
        *self.error_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn entries(&self) -> Vec<DebugLogEntry> {
        self.logs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn generate_report(
        &self,
        has_authorization_code: bool,
        token_expires_at: Option<String>,
    ) -> DebugReport {
        DebugReport {
            generated_at: Utc::now().to_rfc3339(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            has_authorization_code,
            token_expires_at,
            error_count: self.get_error_count(),
            log_entries: self.entries(),
        }
    }

    /// Write a JSON debug report into `logs_dir`. Tokens are never included.
    pub fn save_report_to_file(
        &self,
        logs_dir: &Path,
        has_authorization_code: bool,
        token_expires_at: Option<String>,
    ) -> Result<PathBuf, String> {
        let report = self.generate_report(has_authorization_code, token_expires_at);

        fs::create_dir_all(logs_dir)
            .map_err(|e| format!("Failed to create logs directory: {}", e))?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("debug_log_{}.json", timestamp);
        let log_path = logs_dir.join(&filename);

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;

        let mut file = File::create(&log_path)
            .map_err(|e| format!("Failed to create log file: {}", e))?;

        file.write_all(json.as_bytes())
            .map_err(|e| format!("Failed to write to log file: {}", e))?;

        Ok(log_path)
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for DebugLogger {
    fn report(&self, severity: Severity, message: &str) {
        self.log(severity, message.to_string(), None);
    }
}
