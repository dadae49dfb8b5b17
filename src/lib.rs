//! datavault - content-addressed dataset registry.
//!
//! Tracks data files by the SHA-256 of their bytes, records where the
//! authoritative copy lives in a remote store, lets independent users keep
//! their own local copies of the same logical dataset, and maintains a
//! DAG-shaped derivation (lineage) relation between datasets.
//!
//! The catalog is SQLite via SeaORM; byte movement goes through a pluggable
//! [`TransferGateway`] (local filesystem mirror or scp/ssh). There is no
//! presentation layer here: CLIs, HTTP APIs and UIs embed [`RegistryService`]
//! and render its typed results.

pub mod config;
pub mod db;
pub mod error;
pub mod hash;
pub mod lineage;
pub mod registry;
pub mod transfer;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use hash::{hash_file, ContentHash};
pub use lineage::{Lineage, LineageEntry};
pub use registry::{Download, DownloadStatus, LocalDelete, PushOutcome, RegistryService};
pub use transfer::{
    LocalGateway, ScpGateway, SshConfig, TransferConfig, TransferError, TransferGateway,
};
