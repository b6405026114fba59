//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage location is writable before the first save.

use std::path::Path;
use tracing::debug;

/// Ensure the parent directory of `file` exists, creating it when missing.
pub async fn ensure_parent_dir(file: &Path) -> anyhow::Result<()> {
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    debug!(dir = %parent.display(), "created storage directory");
    Ok(())
}
