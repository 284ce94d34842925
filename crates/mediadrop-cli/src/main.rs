//! Mediadrop CLI: check and upload images from the command line.
//!
//! Upload settings come from MEDIADROP_* variables (see `.env`). The API is
//! reached at MEDIADROP_API_URL with MEDIADROP_API_KEY.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediadrop_client::{ApiClient, HttpTransport};
use mediadrop_cli::{init_tracing, log_notification, print_json};
use mediadrop_core::{validate, CandidateFile, UploadConfig};
use mediadrop_upload::{ImageUpload, Notification, Phase};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "mediadrop", about = "Validate and upload images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a file against the upload constraints without sending it
    Validate {
        /// Path to the file to check
        file: PathBuf,
        /// Maximum file size in megabytes
        #[arg(long)]
        max_size_mb: Option<f64>,
        /// Accepted MIME type (repeatable)
        #[arg(long = "accept", value_name = "TYPE")]
        accept: Vec<String>,
    },
    /// Validate and upload an image, printing the committed value
    Upload {
        /// Path to the image to upload
        file: PathBuf,
        /// Upload endpoint path or absolute URL
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = UploadConfig::from_env().context("Invalid MEDIADROP_* upload settings")?;

    match cli.command {
        Commands::Validate {
            file,
            max_size_mb,
            accept,
        } => {
            if let Some(max) = max_size_mb {
                config.max_size_mb = max;
            }
            if !accept.is_empty() {
                config.accepted_types = accept;
            }
            let candidate = CandidateFile::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let result = validate(&candidate, config.max_size_bytes(), &config.accepted_types);
            print_json(&result)?;
        }
        Commands::Upload { file, endpoint } => {
            if let Some(endpoint) = endpoint {
                config.upload_endpoint = endpoint;
            }
            let candidate = CandidateFile::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let client = ApiClient::from_env().context(
                "Failed to create API client. Set MEDIADROP_API_URL and MEDIADROP_API_KEY",
            )?;

            let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
            let logger = tokio::spawn(async move {
                while let Some(notification) = rx.recv().await {
                    log_notification(&notification);
                }
            });

            let field = ImageUpload::new(
                config,
                None,
                Arc::new(HttpTransport::new(client)),
                Arc::new(tx),
            );
            let state = field.upload(candidate).await;
            field.unmount();
            logger.await.context("Notification logger stopped")?;

            match state.phase {
                Phase::Success => print_json(&state.value)?,
                Phase::Error { message } => anyhow::bail!(message),
                phase => anyhow::bail!("Upload did not complete: {:?}", phase),
            }
        }
    }

    Ok(())
}
