//! CLI argument parsing via clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use crate::export::{ExportConfig, ExportFormat, ImageFormat, MaterialExport};

/// Upload glTF 2.0 models to P3d.in.
#[derive(Debug, Parser)]
#[command(name = "p3d-uploader", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Write a JSON debug report to the logs directory before exiting.
    #[arg(long = "debug-report", global = true)]
    pub debug_report: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the P3d.in authorization page to get an authorization code.
    Authorize {
        /// Only print the URL instead of opening a browser.
        #[arg(long = "print-only")]
        print_only: bool,
    },
    /// Store the authorization code shown after authorizing.
    SetCode {
        code: String,
    },
    /// Show whether an authorization code and a token are stored.
    Status,
    /// Forget the stored authorization code and token.
    Logout,
    /// Upload an exported model.
    Upload(UploadCommand),
}

#[derive(Debug, ClapArgs)]
pub struct UploadCommand {
    /// Exported model file (.glb or .gltf).
    pub model: PathBuf,

    /// Model name shown on P3d.in.
    #[arg(short = 'n', long = "name")]
    pub name: String,

    /// Model description.
    #[arg(short = 'd', long = "description")]
    pub description: String,

    /// Authorization code to store before uploading.
    #[arg(long = "code")]
    pub code: Option<String>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Export options forwarded to the exporter.
#[derive(Debug, Clone, ClapArgs)]
pub struct ExportArgs {
    #[arg(long = "format", value_enum, default_value_t = ExportFormat::Glb)]
    pub format: ExportFormat,

    /// Legal rights and conditions for the model.
    #[arg(long = "copyright", default_value = "")]
    pub copyright: String,

    #[arg(long = "images", value_enum, default_value_t = ImageFormat::Auto)]
    pub image_format: ImageFormat,

    /// Collection levels to keep.
    #[arg(long = "levels", default_value_t = 2)]
    pub levels: u32,

    #[arg(long = "materials", value_enum, default_value_t = MaterialExport::Export)]
    pub materials: MaterialExport,

    /// Do not export vertex colors.
    #[arg(long = "no-colors")]
    pub no_colors: bool,

    #[arg(long = "cameras")]
    pub cameras: bool,

    /// Export custom properties as glTF extras.
    #[arg(long = "extras")]
    pub extras: bool,

    /// Apply modifiers (prevents exporting shape keys).
    #[arg(long = "apply-modifiers")]
    pub apply_modifiers: bool,

    /// Keep +Z up instead of the glTF +Y up convention.
    #[arg(long = "z-up")]
    pub z_up: bool,
}

impl From<ExportArgs> for ExportConfig {
    fn from(args: ExportArgs) -> Self {
        ExportConfig {
            format: args.format,
            copyright: args.copyright,
            image_format: args.image_format,
            levels: args.levels,
            materials: args.materials,
            export_colors: !args.no_colors,
            export_cameras: args.cameras,
            export_extras: args.extras,
            apply_modifiers: args.apply_modifiers,
            y_up: !args.z_up,
        }
    }
}
