use crate::debug_logger::Severity;
use thiserror::Error;

/// Every way one upload invocation can end without success.
///
/// All variants are terminal for the current invocation; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Authentication code is required!!")]
    MissingAuthCode,

    #[error("Model {field} is empty!!")]
    MissingModelMetadata { field: &'static str },

    #[error("Failed to get auth token: {0}")]
    AuthRequestFailed(String),

    #[error("Failed to authenticate. Re-authorize required")]
    AuthExpired,

    #[error("Upload failed {status}: {body}")]
    UploadFailed { status: u16, body: String },

    #[error("{0}")]
    TransportError(String),

    #[error("Already processing!!")]
    AlreadyInProgress,

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Upload cancelled")]
    Cancelled,
}

/// Custom result type
pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    pub fn missing_name() -> Self {
        Self::MissingModelMetadata { field: "name" }
    }

    pub fn missing_description() -> Self {
        Self::MissingModelMetadata { field: "description" }
    }

    pub fn transport(context: &str, error: impl std::fmt::Display) -> Self {
        Self::TransportError(format!("{}: {}", context, error))
    }

    /// Whether the user has to paste a new authorization code before the
    /// next attempt can succeed.
    ///
    /// Authorization codes are single-use, so an expired session is treated
    /// the same as a rejected code.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            Self::MissingAuthCode | Self::AuthRequestFailed(_) | Self::AuthExpired
        )
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::AlreadyInProgress | Self::Cancelled => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Convert to string for command handlers
impl From<UploadError> for String {
    fn from(error: UploadError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reauthorization_classification() {
        assert!(UploadError::MissingAuthCode.requires_reauthorization());
        assert!(UploadError::AuthRequestFailed("invalid_grant".into()).requires_reauthorization());
        assert!(UploadError::AuthExpired.requires_reauthorization());

        assert!(!UploadError::AlreadyInProgress.requires_reauthorization());
        assert!(!UploadError::UploadFailed { status: 500, body: String::new() }.requires_reauthorization());
        assert!(!UploadError::TransportError("timeout".into()).requires_reauthorization());
    }

    #[test]
    fn test_severity() {
        assert_eq!(UploadError::AlreadyInProgress.severity(), Severity::Warning);
        assert_eq!(UploadError::Cancelled.severity(), Severity::Warning);
        assert_eq!(UploadError::AuthExpired.severity(), Severity::Error);
        assert_eq!(UploadError::missing_name().severity(), Severity::Error);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(UploadError::missing_name().to_string(), "Model name is empty!!");
        assert_eq!(
            UploadError::missing_description().to_string(),
            "Model description is empty!!"
        );
        assert_eq!(
            UploadError::UploadFailed { status: 500, body: "boom".into() }.to_string(),
            "Upload failed 500: boom"
        );
        assert_eq!(
            UploadError::transport("Network error", "connection refused").to_string(),
            "Network error: connection refused"
        );
    }

    #[test]
    fn test_into_string() {
        let message: String = UploadError::AlreadyInProgress.into();
        assert_eq!(message, "Already processing!!");
    }
}
