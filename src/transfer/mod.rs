//! Remote transfer gateway abstraction.
//!
//! Moves dataset bytes between a local filesystem and the remote registry
//! store. Pluggable backends:
//! - Local filesystem mirror (default, also used by tests)
//! - scp/ssh over a remote shell session
//!
//! The registry core only needs `put`, `get` and `remove` to be all-or-nothing
//! from its point of view; retry and timeout policy live in the gateway
//! implementations or above them, never in the core.

mod config;
mod gateway;
mod local;
mod scp;

pub use config::TransferConfig;
pub use gateway::{TransferError, TransferGateway, TransferResult};
pub use local::LocalGateway;
pub use scp::{ScpGateway, SshConfig};
