use thiserror::Error;

use crate::transfer::TransferError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("File not found at: {0}")]
    FileNotFound(String),

    #[error("Dataset is deregistered and no longer available: {0}")]
    Deregistered(String),

    #[error("Dataset already deregistered: {0}")]
    AlreadyDeregistered(String),

    #[error("Deregistration requires a privileged caller")]
    PermissionDenied,

    #[error("Invalid lineage: {0}")]
    Validation(String),

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Catalog error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
