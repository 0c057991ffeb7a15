mod adapters;
mod core;
mod global_constants;
mod presentation;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{ArboardClipboard, TesseractEngineFactory, TextFileExporter};
use crate::core::errors::ControllerError;
use crate::core::models::{AppSettings, UiState};
use crate::core::orchestrators::recognition_session::{
    RecognitionSessionManager, SessionConfig,
};
use crate::core::orchestrators::upload_controller::UploadResultController;
use crate::presentation::{static_server, terminal_view};

const PROGRESS_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "image-to-text", version, about = "Extract text from images with Tesseract")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the browser front end from the assets directory
    Serve {
        /// Port to listen on (overrides settings and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Recognize text in one or more image files, reusing one engine
    Recognize {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Copy the recognized text to the clipboard
        #[arg(long)]
        copy: bool,
        /// Save the recognized text to the download directory
        #[arg(long)]
        download: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    log::info!("[APP] Starting {}", global_constants::APPLICATION_NAME);

    let cli = Cli::parse();
    let settings = AppSettings::load();

    match cli.command {
        Commands::Serve { port } => {
            let mut settings = settings;
            if let Some(port) = port {
                settings.server_port = port;
            }
            static_server::run_static_server(&settings).await
        }
        Commands::Recognize {
            paths,
            copy,
            download,
        } => recognize_files(&settings, &paths, copy, download).await,
    }
}

async fn recognize_files(
    settings: &AppSettings,
    paths: &[PathBuf],
    copy: bool,
    download: bool,
) -> Result<()> {
    let session = Arc::new(RecognitionSessionManager::build(
        Arc::new(TesseractEngineFactory::build()),
        SessionConfig {
            languages: settings.ocr_languages.clone(),
            page_segmentation_mode: settings.page_segmentation_mode,
        },
    ));
    let controller = UploadResultController::build(
        session,
        Arc::new(ArboardClipboard::build()),
        Arc::new(TextFileExporter::build(settings.download_dir.clone())),
        settings.low_confidence_threshold,
    );

    let mut failed_paths = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        if index > 0 {
            controller.clear();
        }
        if paths.len() > 1 {
            println!("=== {} ===", path.display());
        }

        if let Err(error) = recognize_file(&controller, path, copy, download).await {
            log::error!("[APP] {:?}: {:#}", path, error);
            eprintln!("{}: {:#}", path.display(), error);
            failed_paths.push(path.display().to_string());
        }
    }

    controller.teardown().await;

    if !failed_paths.is_empty() {
        anyhow::bail!("Recognition failed for: {}", failed_paths.join(", "));
    }
    Ok(())
}

async fn recognize_file(
    controller: &UploadResultController,
    path: &Path,
    copy: bool,
    download: bool,
) -> Result<()> {
    let file_bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    let mime_type = terminal_view::detect_mime_type(path);

    run_recognition(controller, file_bytes, &mime_type, copy, download).await
}

async fn run_recognition(
    controller: &UploadResultController,
    file_bytes: Vec<u8>,
    mime_type: &str,
    copy: bool,
    download: bool,
) -> Result<()> {
    controller.accept_image(file_bytes, mime_type)?;

    let recognition = controller.start_recognition();
    tokio::pin!(recognition);
    let mut last_rendered = String::new();

    let recognition_outcome = loop {
        tokio::select! {
            outcome = &mut recognition => break outcome,
            _ = tokio::time::sleep(PROGRESS_REFRESH_INTERVAL) => {
                let progress = controller.view().progress;
                if !progress.visible {
                    continue;
                }
                let rendered = terminal_view::render_progress(&progress);
                if rendered != last_rendered {
                    eprintln!("{}", rendered);
                    last_rendered = rendered;
                }
            }
        }
    };
    recognition_outcome?;

    let view = controller.view();
    eprintln!("{}", terminal_view::render_progress(&view.progress));
    println!("{}", terminal_view::render_result(&view));
    if view.ui_state == UiState::Error {
        anyhow::bail!(global_constants::PROGRESS_LABEL_FAILED);
    }

    if copy {
        match controller.copy_result() {
            Ok(()) => eprintln!("{}", global_constants::NOTICE_COPIED),
            Err(ControllerError::NothingToCopy) => {
                eprintln!("{}", global_constants::NOTICE_NOTHING_TO_COPY)
            }
            Err(error) => return Err(error.into()),
        }
    }

    if download {
        match controller.download_result().await {
            Ok(saved_path) => eprintln!("Saved to {}", saved_path.display()),
            Err(ControllerError::NothingToDownload) => {
                eprintln!("{}", global_constants::NOTICE_NOTHING_TO_DOWNLOAD)
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}
