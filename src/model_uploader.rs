use std::path::{Path, PathBuf};
use reqwest::multipart::{Form, Part};
use crate::api_contracts::{ModelInfo, MODEL_INFO_FIELD, MODEL_PART, SNAPSHOT_PART};
use crate::errors::UploadError;
use crate::settings::{Settings, DEFAULT_THUMBNAIL, DEFAULT_THUMBNAIL_NAME};
use crate::state::{lock_credentials, BusyGuard, SharedCredentials};

/// Everything one upload needs besides the access token
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub model_name: String,
    pub model_description: String,
    pub model_path: PathBuf,
    /// Snapshot file; the bundled thumbnail when `None`
    pub thumbnail_path: Option<PathBuf>,
}

impl UploadRequest {
    pub fn validate(&self) -> Result<(), UploadError> {
        validate_metadata(&self.model_name, &self.model_description)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.model_name.clone(),
            description: self.model_description.clone(),
        }
    }
}

pub fn validate_metadata(name: &str, description: &str) -> Result<(), UploadError> {
    if name.trim().is_empty() {
        return Err(UploadError::missing_name());
    }
    if description.trim().is_empty() {
        return Err(UploadError::missing_description());
    }
    Ok(())
}

/// API client for the P3d.in upload server
pub struct ModelUploader {
    upload_url: String,
    client: reqwest::Client,
}

impl ModelUploader {
    pub fn new(settings: &Settings) -> Self {
        Self {
            upload_url: settings.upload_url.clone(),
            client: settings.http_client(),
        }
    }

    /// Upload one model with its snapshot.
    ///
    /// Holds the busy flag for the whole attempt; a 401/403 drops the cached
    /// token bundle so the next attempt fetches a new one.
    pub async fn upload_model(
        &self,
        credentials: &SharedCredentials,
        access_token: &str,
        request: &UploadRequest,
    ) -> Result<(), UploadError> {
        let busy = BusyGuard::acquire(credentials)?;
        self.upload_as(&busy, credentials, access_token, request).await
    }

    /// Upload while the caller already holds the busy flag for a longer
    /// invocation.
    pub async fn upload_as(
        &self,
        _busy: &BusyGuard,
        credentials: &SharedCredentials,
        access_token: &str,
        request: &UploadRequest,
    ) -> Result<(), UploadError> {
        request.validate()?;

        let form = build_form(request).await?;

        tracing::info!(url = %self.upload_url, name = %request.model_name, "Posting model");

        let response = self.client
            .post(&self.upload_url)
            .bearer_auth(access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::transport("Network error", e))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(%status, "Model uploaded");
            return Ok(());
        }

        if matches!(status.as_u16(), 401 | 403) {
            tracing::warn!(%status, "Upload rejected, clearing cached token");
            lock_credentials(credentials).clear_token();
            return Err(UploadError::AuthExpired);
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(UploadError::UploadFailed {
            status: status.as_u16(),
            body: error_text,
        })
    }
}

async fn build_form(request: &UploadRequest) -> Result<Form, UploadError> {
    let model_info = request.model_info()
        .to_json()
        .map_err(|e| UploadError::transport("Failed to encode model info", e))?;

    let model = file_part(&request.model_path, "model/gltf-binary").await?;
    let snapshot = match &request.thumbnail_path {
        Some(path) => file_part(path, "image/png").await?,
        None => Part::bytes(DEFAULT_THUMBNAIL)
            .file_name(DEFAULT_THUMBNAIL_NAME)
            .mime_str("image/png")
            .map_err(|e| UploadError::transport("Invalid content type", e))?,
    };

    Ok(Form::new()
        .part(MODEL_PART, model)
        .part(SNAPSHOT_PART, snapshot)
        .text(MODEL_INFO_FIELD, model_info))
}

/// Stream a file as a multipart part. The handle is owned by the request
/// body and closed once the request finishes.
async fn file_part(path: &Path, mime: &str) -> Result<Part, UploadError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| UploadError::transport(&format!("Failed to read {}", path.display()), e))?;
    let length = file.metadata()
        .await
        .map_err(|e| UploadError::transport(&format!("Failed to read {}", path.display()), e))?
        .len();

    let filename = path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| UploadError::TransportError(format!("Invalid filename: {}", path.display())))?
        .to_string();

    Part::stream_with_length(reqwest::Body::from(file), length)
        .file_name(filename)
        .mime_str(mime)
        .map_err(|e| UploadError::transport("Invalid content type", e))
}
