use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::debug_logger::{Reporter, Severity};
use crate::errors::UploadError;
use crate::export::{export_to_temp, ExportConfig, ModelExporter};
use crate::model_uploader::{validate_metadata, ModelUploader, UploadRequest};
use crate::settings::Settings;
use crate::state::{lock_credentials, BusyGuard, SharedCredentials};
use crate::token_manager::TokenManager;

/// One user-triggered upload
#[derive(Debug, Clone, Default)]
pub struct UploadJob {
    pub model_name: String,
    pub model_description: String,
    /// Code pasted in this invocation, stored before anything else happens
    pub authorization_code: Option<String>,
    pub export_config: ExportConfig,
}

/// Orchestrates token, export and upload for a single credential and
/// reports every outcome through the host's [`Reporter`].
pub struct UploadManager {
    credentials: SharedCredentials,
    token_manager: TokenManager,
    uploader: ModelUploader,
    exporter: Arc<dyn ModelExporter>,
    reporter: Arc<dyn Reporter>,
    thumbnail_path: Option<PathBuf>,
    export_dir: PathBuf,
}

impl UploadManager {
    pub fn new(
        credentials: SharedCredentials,
        token_manager: TokenManager,
        settings: &Settings,
        exporter: Arc<dyn ModelExporter>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            credentials,
            token_manager,
            uploader: ModelUploader::new(settings),
            exporter,
            reporter,
            thumbnail_path: settings.thumbnail_path.clone(),
            export_dir: std::env::temp_dir(),
        }
    }

    /// Directory for the temporary export file (system temp dir by default)
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn credentials(&self) -> &SharedCredentials {
        &self.credentials
    }

    /// Run one invocation to completion. Every failure is reported to the
    /// user before being returned.
    pub async fn run(&self, job: UploadJob) -> Result<(), UploadError> {
        let result = self.execute(job).await;
        if let Err(ref e) = result {
            self.report_failure(e);
        }
        result
    }

    async fn execute(&self, job: UploadJob) -> Result<(), UploadError> {
        // Held for the whole invocation, not just the upload request
        let busy = BusyGuard::acquire(&self.credentials)?;
        {
            let mut state = lock_credentials(&self.credentials);
            if let Some(code) = job.authorization_code.as_deref().filter(|c| !c.trim().is_empty()) {
                state.set_authorization_code(code);
            }
            if !state.has_authorization_code() {
                return Err(UploadError::MissingAuthCode);
            }
        }

        validate_metadata(&job.model_name, &job.model_description)?;

        self.reporter.report(Severity::Info, "Uploading..");

        let access_token = self.token_manager.obtain_access_token(&self.credentials).await?;

        let exported = export_to_temp(self.exporter.as_ref(), &job.export_config, &self.export_dir)?;

        let request = UploadRequest {
            model_name: job.model_name,
            model_description: job.model_description,
            model_path: exported.path().to_path_buf(),
            thumbnail_path: self.thumbnail_path.clone(),
        };

        self.reporter.report(Severity::Info, "Posting to p3d.in....");
        self.uploader
            .upload_as(&busy, &self.credentials, &access_token, &request)
            .await?;

        self.reporter.report(Severity::Info, "Uploaded successfully.");
        Ok(())
    }

    fn report_failure(&self, error: &UploadError) {
        let message = match error {
            UploadError::MissingAuthCode | UploadError::AlreadyInProgress => error.to_string(),
            e if e.requires_reauthorization() => {
                format!("{} (paste a new authorization code)", e)
            }
            e => e.to_string(),
        };
        self.reporter.report(error.severity(), &message);
    }

    /// Run an invocation as a background task.
    ///
    /// `on_complete` is called exactly once with the outcome, including
    /// [`UploadError::Cancelled`] when [`UploadHandle::cancel`] wins.
    pub fn spawn<F>(self: Arc<Self>, job: UploadJob, on_complete: F) -> UploadHandle
    where
        F: FnOnce(&Result<(), UploadError>) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let join = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = task_cancel.cancelled() => {
                    // The in-flight future is dropped here, releasing the
                    // busy flag, open files and the temporary export.
                    self.report_failure(&UploadError::Cancelled);
                    Err(UploadError::Cancelled)
                }
                result = self.run(job) => result,
            };
            on_complete(&outcome);
            outcome
        });

        UploadHandle { cancel, join }
    }
}

/// Handle to a background upload
pub struct UploadHandle {
    cancel: CancellationToken,
    join: JoinHandle<Result<(), UploadError>>,
}

impl UploadHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub async fn wait(self) -> Result<(), UploadError> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(UploadError::Cancelled),
            Err(e) => Err(UploadError::TransportError(format!("Upload task failed: {}", e))),
        }
    }
}
