//! Transfer gateway configuration.

use std::path::PathBuf;
use std::sync::Arc;

use super::{LocalGateway, ScpGateway, SshConfig, TransferGateway};

/// Transfer backend selection.
///
/// Injected into the registry rather than read from process-wide constants,
/// so tests and multiple environments can use different remotes.
#[derive(Debug, Clone)]
pub enum TransferConfig {
    /// Local filesystem mirror at the given path
    Local { path: PathBuf },
    /// scp/ssh to a remote host
    Ssh(SshConfig),
}

impl Default for TransferConfig {
    fn default() -> Self {
        TransferConfig::Local {
            path: std::env::temp_dir().join("datavault-registry"),
        }
    }
}

impl TransferConfig {
    /// Config for a local mirror at the given path
    pub fn local(path: PathBuf) -> Self {
        TransferConfig::Local { path }
    }

    /// Config for an ssh-reachable remote host
    pub fn ssh(user: impl Into<String>, host: impl Into<String>, remote_root: impl Into<String>) -> Self {
        TransferConfig::Ssh(SshConfig::new(user, host, remote_root))
    }

    /// Build a transfer gateway from this config
    pub fn build(&self) -> Arc<dyn TransferGateway> {
        match self {
            TransferConfig::Local { path } => {
                std::fs::create_dir_all(path).ok();
                Arc::new(LocalGateway::new(path.clone()))
            }
            TransferConfig::Ssh(config) => Arc::new(ScpGateway::new(config.clone())),
        }
    }
}
