//! Registry configuration.

use std::path::PathBuf;

use crate::transfer::TransferConfig;

/// Configuration for a registry instance.
///
/// Passed to [`crate::RegistryService::connect`] rather than read from
/// process-wide constants, so tests and multiple environments can point at
/// different catalogs and remotes.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Catalog database file
    pub catalog_path: PathBuf,
    /// Remote transfer backend
    pub transfer: TransferConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let home = std::env::var("DATAVAULT_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("datavault"));
        Self {
            catalog_path: home.join("catalog.db"),
            transfer: TransferConfig::default(),
        }
    }
}
