//! Export configuration and the host exporter seam.
//!
//! The host application owns the actual glTF exporter. The uploader only
//! hands it an [`ExportConfig`] and a destination path, then treats the
//! written file as opaque bytes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use crate::errors::UploadError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    /// Single binary file (.glb)
    #[default]
    Glb,
    /// Single JSON file with embedded buffers (.gltf)
    GltfEmbedded,
    /// JSON + .bin + textures (.gltf)
    GltfSeparate,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Glb => "glb",
            ExportFormat::GltfEmbedded | ExportFormat::GltfSeparate => "gltf",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageFormat {
    /// Keep PNGs as PNG and JPEGs as JPEG, PNG otherwise
    #[default]
    Auto,
    Jpeg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialExport {
    #[default]
    Export,
    Placeholder,
    None,
}

/// Options forwarded to the host exporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub copyright: String,
    pub image_format: ImageFormat,
    /// Collection nesting levels to keep
    pub levels: u32,
    pub materials: MaterialExport,
    pub export_colors: bool,
    pub export_cameras: bool,
    pub export_extras: bool,
    pub apply_modifiers: bool,
    pub y_up: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Glb,
            copyright: String::new(),
            image_format: ImageFormat::Auto,
            levels: 2,
            materials: MaterialExport::Export,
            export_colors: true,
            export_cameras: false,
            export_extras: false,
            apply_modifiers: false,
            y_up: true,
        }
    }
}

/// Host-provided export-to-file
pub trait ModelExporter: Send + Sync {
    fn export(&self, config: &ExportConfig, destination: &Path) -> Result<(), UploadError>;
}

/// Exporter for an already exported model file: copies it into place.
///
/// Used by the command-line front end, where the "host" is whatever tool
/// produced the file.
#[derive(Debug, Clone)]
pub struct FileExporter {
    source: PathBuf,
}

impl FileExporter {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into() }
    }
}

impl ModelExporter for FileExporter {
    fn export(&self, config: &ExportConfig, destination: &Path) -> Result<(), UploadError> {
        if !self.source.is_file() {
            return Err(UploadError::ExportFailed(format!(
                "Model file not found: {}",
                self.source.display()
            )));
        }

        let source_ext = self.source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        if source_ext.as_deref() != Some(config.format.extension()) {
            tracing::warn!(
                source = %self.source.display(),
                format = ?config.format,
                "Model file extension does not match the export format"
            );
        }

        fs::copy(&self.source, destination)
            .map_err(|e| UploadError::ExportFailed(format!("Failed to copy model: {}", e)))?;
        Ok(())
    }
}

/// Temporary export output, deleted when dropped
#[derive(Debug)]
pub struct ExportedFile {
    path: PathBuf,
}

impl ExportedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ExportedFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), "Failed to remove exported model: {}", e);
            }
        }
    }
}

/// Run the exporter into a uniquely named file in `dir`.
pub fn export_to_temp(
    exporter: &dyn ModelExporter,
    config: &ExportConfig,
    dir: &Path,
) -> Result<ExportedFile, UploadError> {
    let path = dir.join(format!("{}.{}", Uuid::new_v4(), config.format.extension()));
    // Owned before exporting so a partial file is cleaned up on failure
    let exported = ExportedFile { path };
    exporter.export(config, exported.path())?;

    if !exported.path().is_file() {
        return Err(UploadError::ExportFailed(
            "Exporter did not produce a file".to_string(),
        ));
    }

    tracing::debug!(path = %exported.path().display(), "Model exported");
    Ok(exported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::create_test_model;
    use tempfile::TempDir;

    struct NoopExporter;

    impl ModelExporter for NoopExporter {
        fn export(&self, _config: &ExportConfig, _destination: &Path) -> Result<(), UploadError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_config_matches_host_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.format, ExportFormat::Glb);
        assert_eq!(config.levels, 2);
        assert!(config.export_colors);
        assert!(!config.export_cameras);
        assert!(config.y_up);
    }

    #[test]
    fn test_config_serializes_host_enum_names() {
        let config = ExportConfig {
            format: ExportFormat::GltfSeparate,
            materials: MaterialExport::Placeholder,
            ..ExportConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["format"], "GLTF_SEPARATE");
        assert_eq!(json["materials"], "PLACEHOLDER");
        assert_eq!(json["image_format"], "AUTO");

        let partial: ExportConfig = serde_json::from_str(r#"{"format": "GLTF_EMBEDDED"}"#).unwrap();
        assert_eq!(partial.format, ExportFormat::GltfEmbedded);
        assert_eq!(partial.levels, 2);
    }

    #[test]
    fn test_export_to_temp_and_cleanup() {
        let source_dir = TempDir::new().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let source = create_test_model(source_dir.path(), "chair.glb");

        let exporter = FileExporter::new(&source);
        let exported = export_to_temp(&exporter, &ExportConfig::default(), temp_dir.path()).unwrap();

        let path = exported.path().to_path_buf();
        assert!(path.is_file());
        assert_eq!(path.extension().unwrap(), "glb");
        assert_eq!(fs::read(&path).unwrap(), fs::read(&source).unwrap());

        drop(exported);
        assert!(!path.exists());
    }

    #[test]
    fn test_export_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = FileExporter::new(temp_dir.path().join("missing.glb"));

        let result = export_to_temp(&exporter, &ExportConfig::default(), temp_dir.path());

        assert!(matches!(result, Err(UploadError::ExportFailed(_))));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_exporter_that_writes_nothing_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = export_to_temp(&NoopExporter, &ExportConfig::default(), temp_dir.path());
        assert!(matches!(result, Err(UploadError::ExportFailed(_))));
    }
}
