// src/utils/upload.rs

use std::path::Path;

use tokio::fs;
use uuid::Uuid;

use crate::error::AppError;

/// Persists an uploaded file under `<upload_dir>/<subdir>` with a
/// uuid-based name, keeping a sanitized copy of the original extension.
///
/// Returns the path relative to the upload root; that is what gets stored
/// in the database and served back under `/media/`.
pub async fn store_file(
    upload_dir: &str,
    subdir: &str,
    original_name: &str,
    data: &[u8],
) -> Result<String, AppError> {
    let ext: String = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();
    let ext = if ext.is_empty() { "bin".to_string() } else { ext };

    let name = format!("{}.{}", Uuid::new_v4().simple(), ext);

    let dir = Path::new(upload_dir).join(subdir);
    fs::create_dir_all(&dir).await?;
    fs::write(dir.join(&name), data).await?;

    Ok(format!("{}/{}", subdir, name))
}

/// Removes a previously stored file when the record it belongs to was never
/// persisted, so rejected submissions leave nothing behind. Best effort: a
/// removal failure is logged, not propagated.
pub async fn discard_file(upload_dir: &str, stored_path: &str) {
    let path = Path::new(upload_dir).join(stored_path);
    if let Err(e) = fs::remove_file(&path).await {
        tracing::warn!("Failed to discard stored file {:?}: {}", path, e);
    }
}
