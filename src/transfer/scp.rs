//! scp/ssh transfer gateway.
//!
//! Drives the system `scp` and `ssh` binaries as subprocesses. Key-based
//! authentication is assumed to be configured out of band; this gateway never
//! handles credentials itself.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::gateway::{TransferError, TransferGateway, TransferResult};

/// Connection settings for an ssh-reachable registry host.
#[derive(Debug, Clone)]
pub struct SshConfig {
    pub user: String,
    pub host: String,
    /// Directory on the remote host holding registry objects
    pub remote_root: String,
}

impl SshConfig {
    pub fn new(user: impl Into<String>, host: impl Into<String>, remote_root: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            remote_root: remote_root.into(),
        }
    }

    /// The `user@host` target scp and ssh expect
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Transfer gateway backed by scp/ssh.
pub struct ScpGateway {
    config: SshConfig,
}

impl ScpGateway {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    /// Absolute path of an object on the remote host
    fn remote_path(&self, remote_id: &str) -> String {
        format!("{}/{}", self.config.remote_root, remote_id)
    }

    /// `user@host:path` spec for scp
    fn remote_spec(&self, remote_id: &str) -> String {
        format!("{}:{}", self.config.target(), self.remote_path(remote_id))
    }

    /// Run a command to completion, mapping a non-zero exit into a
    /// `TransferError::Command` carrying whatever the tool wrote to stderr.
    async fn run(&self, mut command: Command) -> TransferResult<()> {
        let output = command.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(TransferError::Command(detail));
        }
        Ok(())
    }
}

#[async_trait]
impl TransferGateway for ScpGateway {
    async fn put(&self, local_path: &Path, remote_id: &str) -> TransferResult<()> {
        tracing::debug!("scp {} -> {}", local_path.display(), self.remote_spec(remote_id));
        let mut cmd = Command::new("scp");
        cmd.arg("-q").arg(local_path).arg(self.remote_spec(remote_id));
        self.run(cmd).await
    }

    async fn get(&self, remote_id: &str, local_path: &Path) -> TransferResult<()> {
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tracing::debug!("scp {} -> {}", self.remote_spec(remote_id), local_path.display());
        let mut cmd = Command::new("scp");
        cmd.arg("-q").arg(self.remote_spec(remote_id)).arg(local_path);
        self.run(cmd).await
    }

    async fn remove(&self, remote_id: &str) -> TransferResult<()> {
        // rm -f keeps remove idempotent, matching the trait contract
        let mut cmd = Command::new("ssh");
        cmd.arg(self.config.target())
            .arg(format!("rm -f {}", self.remote_path(remote_id)));
        self.run(cmd).await
    }

    async fn exists(&self, remote_id: &str) -> TransferResult<bool> {
        let mut cmd = Command::new("ssh");
        cmd.arg(self.config.target())
            .arg(format!("test -f {}", self.remote_path(remote_id)));
        let output = cmd.output().await?;
        Ok(output.status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_spec_layout() {
        let config = SshConfig::new("registry", "data.example.com", "/srv/datasets");
        let gateway = ScpGateway::new(config);

        assert_eq!(
            gateway.remote_spec("abc123.csv"),
            "registry@data.example.com:/srv/datasets/abc123.csv"
        );
    }
}
