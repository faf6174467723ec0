//! Loads a session script: a JSON array of steps.

use std::path::Path;

use crate::use_cases::session::ScriptStep;

#[derive(Debug, thiserror::Error)]
pub enum ScriptLoadError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed script JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub async fn load_script(path: impl AsRef<Path>) -> Result<Vec<ScriptStep>, ScriptLoadError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ScriptLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&raw)?;
    tracing::info!(path = %path.display(), steps = steps.len(), "Loaded session script");
    Ok(steps)
}
