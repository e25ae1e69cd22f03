//! Example models: downloaded on first use, then served from the on-disk cache.

use std::path::{Path, PathBuf};

use ifcdot_core::{Error, ExampleModel, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Cache file for an example, named by the SHA-256 of its URL.
pub fn cache_path(cache_dir: &Path, example: &ExampleModel) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(example.url.as_bytes());
    cache_dir.join(format!("{}.ifc", hex::encode(hasher.finalize())))
}

/// Model bytes for an example, downloading them when not cached yet.
///
/// Downloads larger than `max_bytes` are abandoned; the declared length is
/// checked first and the streamed body is counted as it arrives.
pub async fn fetch_example(
    client: &reqwest::Client,
    cache_dir: &Path,
    example: &ExampleModel,
    max_bytes: usize,
) -> Result<Vec<u8>> {
    let path = cache_path(cache_dir, example);
    if let Ok(bytes) = tokio::fs::read(&path).await {
        debug!("Example {} served from {}", example.name, path.display());
        return Ok(bytes);
    }

    info!("Downloading example {} from {}", example.name, example.url);
    let mut response = client
        .get(&example.url)
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::Http(format!(
            "{} returned {}",
            example.url,
            response.status()
        )));
    }

    if let Some(length) = response.content_length() {
        if length > max_bytes as u64 {
            return Err(too_large(example, max_bytes));
        }
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::Http(e.to_string()))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large(example, max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }

    store(&path, &bytes).await?;
    Ok(bytes)
}

fn too_large(example: &ExampleModel, max_bytes: usize) -> Error {
    Error::Http(format!(
        "{} is larger than {} bytes",
        example.url, max_bytes
    ))
}

/// Writes a cache entry under a per-download temporary name, then moves it
/// into place so a partial file is never served.
async fn store(path: &Path, bytes: &[u8]) -> Result<()> {
    let partial = path.with_extension(format!("{}.part", Uuid::new_v4()));
    tokio::fs::write(&partial, bytes).await?;

    if let Err(e) = tokio::fs::rename(&partial, path).await {
        let _ = tokio::fs::remove_file(&partial).await;
        // A concurrent download of the same example got there first.
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            debug!("Cache entry {} already written", path.display());
            return Ok(());
        }
        warn!("Could not cache example at {}: {}", path.display(), e);
        return Err(e.into());
    }
    Ok(())
}
