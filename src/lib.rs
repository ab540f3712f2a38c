mod api_contracts;
mod cli;
mod config_utils;
mod model_uploader;
mod token_manager;

pub mod clock;
pub mod commands;
pub mod debug_logger;
pub mod errors;
pub mod export;
pub mod settings;
pub mod state;
pub mod types;
pub mod upload_manager;

#[cfg(test)]
mod test_harness;

use std::process::ExitCode;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::{Args, Command};
use commands::upload::UploadArgs;
use settings::Settings;
use state::AppStateManager;

pub use api_contracts::{GrantType, ModelInfo};
pub use debug_logger::{DebugLogger, Reporter, Severity};
pub use errors::{UploadError, UploadResult};
pub use export::{ExportConfig, FileExporter, ModelExporter};
pub use model_uploader::{ModelUploader, UploadRequest};
pub use token_manager::TokenManager;
pub use types::{CredentialState, StoredToken, TokenBundle};
pub use upload_manager::{UploadHandle, UploadJob, UploadManager};

/// Install the global subscriber: human-readable on stderr, JSON into a
/// daily log file when the logs directory is available.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match config_utils::get_logs_dir()
        .and_then(|dir| std::fs::create_dir_all(&dir).map(|_| dir).map_err(|e| e.to_string()))
    {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "p3d-uploader.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).with_filter(filter()))
        .with(file_layer)
        .try_init();

    guard
}

/// Command-line entry point
pub fn run() -> ExitCode {
    let args = Args::parse();
    let _log_guard = init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state_manager = match AppStateManager::load(Settings::from_env()) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let debug_report = args.debug_report;
    let result = runtime.block_on(dispatch(&state_manager, args.command));

    if debug_report {
        match commands::debug::export_debug_log(&state_manager) {
            Ok(path) => println!("Debug report written to {}", path.display()),
            Err(e) => eprintln!("{}", e),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(state_manager: &AppStateManager, command: Command) -> Result<(), String> {
    match command {
        Command::Authorize { print_only } => {
            let url = commands::auth::authorize(state_manager, print_only)?;
            println!("Authorize the uploader at:\n  {}", url);
            println!("Then run `p3d-uploader set-code <CODE>` with the code shown after redirect.");
            Ok(())
        }
        Command::SetCode { code } => {
            commands::auth::set_authorization_code(state_manager, &code)?;
            println!("Authorization code saved.");
            Ok(())
        }
        Command::Status => {
            let status = commands::tokens::credential_status(state_manager);
            let json = serde_json::to_string_pretty(&status)
                .map_err(|e| format!("Failed to serialize status: {}", e))?;
            println!("{}", json);
            Ok(())
        }
        Command::Logout => {
            commands::tokens::clear_credentials(state_manager)?;
            println!("Credentials cleared.");
            Ok(())
        }
        Command::Upload(upload) => {
            let args = UploadArgs {
                model_path: upload.model,
                model_name: upload.name,
                model_description: upload.description,
                authorization_code: upload.code,
                export_config: upload.export.into(),
            };
            commands::upload::upload_model(state_manager, args)
                .await
                .map_err(|e| {
                    if e.requires_reauthorization() {
                        "Run `p3d-uploader authorize` to get a new authorization code.".to_string()
                    } else {
                        String::from(e)
                    }
                })
        }
    }
}
