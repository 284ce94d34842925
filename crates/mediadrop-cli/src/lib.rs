use anyhow::Context;
use mediadrop_upload::Notification;
use serde::Serialize;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Log one lifecycle notification of an upload field.
pub fn log_notification(notification: &Notification) {
    match notification {
        Notification::UploadStarted { file_name } => {
            tracing::info!(file = %truncate_string(file_name, 60), "Uploading");
        }
        Notification::UploadProgress { progress } => {
            tracing::debug!(progress, "Upload progress");
        }
        Notification::UploadSucceeded(result) => {
            tracing::info!(url = %result.url, "Upload succeeded");
        }
        Notification::UploadFailed { message } => {
            tracing::warn!(%message, "Upload failed");
        }
        Notification::Changed(change) => {
            tracing::info!(url = change.url(), "Value changed");
        }
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
