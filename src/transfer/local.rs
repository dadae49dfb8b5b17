//! Local filesystem transfer gateway.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::gateway::{TransferError, TransferGateway, TransferResult};

/// Local filesystem gateway.
///
/// Mirrors the remote store into a directory tree:
/// ```text
/// {base_path}/
///   {id[0..2]}/      # First 2 chars of the object name for sharding
///     {id[2..]}      # Rest of the object name as filename
/// ```
///
/// Object names start with the content hash, so sharding by the first two
/// hex characters spreads entries evenly.
pub struct LocalGateway {
    base_path: PathBuf,
}

impl LocalGateway {
    /// Create a new local gateway rooted at the given directory
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the full path for an object name
    fn object_path(&self, remote_id: &str) -> PathBuf {
        if remote_id.len() >= 2 {
            self.base_path.join(&remote_id[..2]).join(&remote_id[2..])
        } else {
            self.base_path.join(remote_id)
        }
    }

    /// Ensure parent directory exists
    async fn ensure_parent(&self, path: &Path) -> TransferResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TransferGateway for LocalGateway {
    async fn put(&self, local_path: &Path, remote_id: &str) -> TransferResult<()> {
        let dest = self.object_path(remote_id);
        self.ensure_parent(&dest).await?;
        fs::copy(local_path, &dest).await?;
        Ok(())
    }

    async fn get(&self, remote_id: &str, local_path: &Path) -> TransferResult<()> {
        let src = self.object_path(remote_id);
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(&src, local_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TransferError::NotFound(remote_id.to_string())
            } else {
                TransferError::Io(e)
            }
        })?;
        Ok(())
    }

    async fn remove(&self, remote_id: &str) -> TransferResult<()> {
        let path = self.object_path(remote_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()), // Already deleted
            Err(e) => Err(TransferError::Io(e)),
        }
    }

    async fn exists(&self, remote_id: &str) -> TransferResult<bool> {
        Ok(self.object_path(remote_id).exists())
    }
}
