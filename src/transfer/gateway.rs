//! Transfer gateway trait definition.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Transfer error types
#[derive(Debug)]
pub enum TransferError {
    /// Remote object not found
    NotFound(String),
    /// IO error
    Io(std::io::Error),
    /// Transport command failed (scp/ssh exit status, stderr attached)
    Command(String),
    /// Other error
    Other(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::NotFound(id) => write!(f, "Remote object not found: {}", id),
            TransferError::Io(e) => write!(f, "IO error: {}", e),
            TransferError::Command(msg) => write!(f, "Transport command failed: {}", msg),
            TransferError::Other(msg) => write!(f, "Transfer error: {}", msg),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<std::io::Error> for TransferError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            TransferError::NotFound(e.to_string())
        } else {
            TransferError::Io(e)
        }
    }
}

pub type TransferResult<T> = Result<T, TransferError>;

/// Gateway to the remote registry store.
///
/// `remote_id` is the object name recorded in the catalog
/// (`{hash}{extension}`); each backend resolves it against its own configured
/// root, so catalog rows stay portable across environments.
#[async_trait]
pub trait TransferGateway: Send + Sync {
    /// Copy a local file to the remote store
    async fn put(&self, local_path: &Path, remote_id: &str) -> TransferResult<()>;

    /// Copy a remote object to a local file
    async fn get(&self, remote_id: &str, local_path: &Path) -> TransferResult<()>;

    /// Remove a remote object. Removing an already-absent object is not an
    /// error; the store converges to the same state either way.
    async fn remove(&self, remote_id: &str) -> TransferResult<()>;

    /// Check if a remote object exists
    async fn exists(&self, remote_id: &str) -> TransferResult<bool>;
}
