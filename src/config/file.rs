use anyhow::{anyhow, Context as _, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Returns Ok(None) if the file doesn't exist
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !tokio::fs::try_exists(path).await? {
        log::debug!("No config file at {}", path.display());
        return Ok(None);
    }

    log::debug!("Loading config file {}...", path.display());
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    log::debug!("Loading config file {}...done", path.display());

    Ok(Some(parsed))
}

pub async fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    log::debug!("Saving config file {}...", path.display());

    let content = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // First write to temporary file so we don't lose data if writing fails halfway
    let filename = path
        .file_name()
        .ok_or_else(|| anyhow!("Path has no filename"))?
        .to_str()
        .ok_or_else(|| anyhow!("Filename isn't valid utf-8"))?;
    let tmppath = path.with_file_name(format!("{}.temp", filename));
    tokio::fs::write(&tmppath, content).await?;

    // Ok, writing succeeded, let's now replace the real file with the tmpfile
    tokio::fs::rename(&tmppath, path).await?;

    log::debug!("Saving config file {}...done", path.display());

    Ok(())
}
