//! Folio headless shell
//!
//! Replays editor scripts against an in-memory media service and reports the
//! resulting page.

pub mod script;

pub use script::{Script, ScriptFile, ScriptRunner, ScriptStep};

use folio_core::client::{ClientError, MemoryMediaClient};
use folio_core::config::{ConfigError, EditorConfig};
use folio_core::Editor;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that stop a script run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No media item titled {0}")]
    UnknownMedia(String),
    #[error("{0} is not an image or video container")]
    NotAContainer(String),
    #[error("Step rejected: {0}")]
    Rejected(String),
    #[error("Usage: folio <script.json> [config.json]")]
    Usage,
}

/// What a run produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport<'a> {
    pub statuses: Vec<String>,
    pub media: Vec<folio_core::MediaItem>,
    pub layout: &'a folio_core::PortfolioLayout,
}

/// Load the configuration at `path`, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, AppError> {
    match path {
        Some(path) => Ok(EditorConfig::from_path(path)?),
        None => Ok(EditorConfig::default()),
    }
}

/// Run the script at `script_path` and return the report as JSON.
pub async fn run(script_path: &Path, config: EditorConfig) -> Result<String, AppError> {
    let script: Script = serde_json::from_str(&std::fs::read_to_string(script_path)?)?;
    log::info!(
        "Replaying {} steps from {}",
        script.steps.len(),
        script_path.display()
    );

    let client = Arc::new(MemoryMediaClient::new(config.api_base_url.clone()));
    let mut editor = Editor::new(client, config);
    editor.restore_portfolio().await;

    let mut runner = ScriptRunner::new(&mut editor);
    runner.run(script).await?;
    let statuses = runner.statuses().to_vec();

    let report = RunReport {
        statuses,
        media: editor.state().media.to_vec(),
        layout: editor.layout(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
