//! Content fingerprinting.
//!
//! A dataset's identity is the SHA-256 of its bytes. Two pushes of
//! bit-identical content resolve to the same fingerprint regardless of
//! filename, which is what makes the registry content-addressed.

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read buffer size for streaming file hashes (64KB)
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Content hash (256-bit)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        Self(hash)
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash a file's contents in streaming fashion.
///
/// Reads in fixed-size blocks so arbitrarily large datasets never need to
/// fit in memory. Same algorithm and encoding for every caller; changing it
/// would invalidate all existing hash-based identity.
pub async fn hash_file(path: &Path) -> std::io::Result<ContentHash> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    Ok(ContentHash(hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_hash_file_matches_known_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hello.txt");
        tokio::fs::write(&path, b"hello world").await.unwrap();

        let hash = hash_file(&path).await.unwrap();
        assert_eq!(hash.to_hex().len(), 64);
        assert_eq!(
            hash.to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(hash, ContentHash::from_data(b"hello world"));
    }

    #[tokio::test]
    async fn test_identical_content_same_hash() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.csv");
        let b = temp_dir.path().join("b.csv");
        tokio::fs::write(&a, b"col1,col2\n1,2\n").await.unwrap();
        tokio::fs::write(&b, b"col1,col2\n1,2\n").await.unwrap();

        let ha = hash_file(&a).await.unwrap();
        let hb = hash_file(&b).await.unwrap();
        assert_eq!(ha, hb);
    }
}
