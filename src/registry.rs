//! Registry core.
//!
//! Orchestrates push, download, listing, local-copy management,
//! deregistration and lineage over the catalog and the transfer gateway.
//! Every operation is a single awaited call; multi-row catalog mutations run
//! inside one transaction scoped to that call. The registry holds no
//! long-lived in-memory state of its own.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::RegistryConfig;
use crate::db::entities::{dataset, lineage_edge, local_copy};
use crate::error::{RegistryError, Result};
use crate::lineage::{self, Lineage};
use crate::transfer::TransferGateway;
use crate::{db, hash};

/// Result of a push: the catalog row plus whether new content was uploaded.
///
/// `created = false` means the content was already registered and no transfer
/// happened; callers use this for messaging, not to change behavior.
#[derive(Debug)]
pub struct PushOutcome {
    pub dataset: dataset::Model,
    pub created: bool,
}

/// How a download was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    /// The caller already held a live local copy; no remote I/O happened
    AlreadyLocal,
    /// Bytes were fetched from the remote store
    Downloaded,
}

/// Result of a download
#[derive(Debug)]
pub struct Download {
    pub path: PathBuf,
    pub status: DownloadStatus,
}

/// Outcome of a local-copy deletion. Only `Deleted` counts as success; the
/// two failure shapes are distinguished so callers can tell "nothing to do"
/// from "cleaned up after an external deletion".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalDelete {
    /// File removed from disk and record dropped
    Deleted(PathBuf),
    /// File was already gone; the dangling record was dropped
    StaleRecordCleaned,
    /// No record for this (dataset, user) pair
    NoRecord,
}

impl LocalDelete {
    pub fn succeeded(&self) -> bool {
        matches!(self, LocalDelete::Deleted(_))
    }

    pub fn message(&self) -> String {
        match self {
            LocalDelete::Deleted(path) => format!("Deleted local copy at {}", path.display()),
            LocalDelete::StaleRecordCleaned => {
                "Local file was already gone; stale record cleaned".to_string()
            }
            LocalDelete::NoRecord => "No local record for this dataset".to_string(),
        }
    }
}

/// The registry core.
pub struct RegistryService {
    db: DatabaseConnection,
    gateway: Arc<dyn TransferGateway>,
}

impl RegistryService {
    pub fn new(db: DatabaseConnection, gateway: Arc<dyn TransferGateway>) -> Self {
        Self { db, gateway }
    }

    /// Open the catalog and build the transfer gateway from config
    pub async fn connect(config: &RegistryConfig) -> Result<Self> {
        let db = db::init_catalog(&config.catalog_path).await?;
        Ok(Self::new(db, config.transfer.build()))
    }

    /// Look up a dataset by its content hash
    pub async fn find_by_hash(&self, hash: &str) -> Result<Option<dataset::Model>> {
        Ok(dataset::Entity::find_by_id(hash).one(&self.db).await?)
    }

    /// Push a local file into the registry.
    ///
    /// Content-addressed: if the fingerprint is already registered no bytes
    /// move, whatever the filename or source. Either way the caller's local
    /// copy record is refreshed to point at `local_path`.
    pub async fn push(
        &self,
        user_id: &str,
        local_path: &Path,
        source: Option<&str>,
    ) -> Result<PushOutcome> {
        let local_path = tokio::fs::canonicalize(local_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RegistryError::FileNotFound(local_path.display().to_string())
            } else {
                RegistryError::Io(e)
            }
        })?;
        let size_bytes = tokio::fs::metadata(&local_path).await?.len() as i64;
        let file_hash = hash::hash_file(&local_path).await?.to_hex();

        let (dataset, created) = match self.find_by_hash(&file_hash).await? {
            Some(existing) => {
                tracing::debug!("Dataset {} already registered, skipping upload", file_hash);
                (existing, false)
            }
            None => {
                let name = local_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_hash.clone());
                let extension = local_path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                let remote_name = format!("{}{}", file_hash, extension);

                // The catalog row is only written after the upload succeeds,
                // so the catalog never references a nonexistent remote object.
                tracing::info!("Uploading {} as {}", local_path.display(), remote_name);
                self.gateway.put(&local_path, &remote_name).await?;

                let row = dataset::ActiveModel {
                    hash: Set(file_hash.clone()),
                    name: Set(name),
                    source: Set(source.map(str::to_string)),
                    registry_path: Set(remote_name),
                    created_at: Set(now_ts()),
                    is_active: Set(true),
                    size_bytes: Set(Some(size_bytes)),
                    download_count: Set(0),
                    last_downloaded_at: Set(None),
                };
                match row.insert(&self.db).await {
                    Ok(model) => (model, true),
                    // A concurrent push of identical content can win the
                    // insert; the uniqueness violation is the dedup branch,
                    // not a hard error.
                    Err(insert_err) => match self.find_by_hash(&file_hash).await? {
                        Some(existing) => {
                            tracing::debug!("Lost push race for {}, deduplicating", file_hash);
                            (existing, false)
                        }
                        None => return Err(insert_err.into()),
                    },
                }
            }
        };

        upsert_local_copy(&self.db, &file_hash, user_id, &local_path).await?;

        Ok(PushOutcome { dataset, created })
    }

    /// Download a dataset for the calling user.
    ///
    /// Returns the caller's existing copy when one is live on disk; otherwise
    /// fetches from the remote store into `destination_dir` under the
    /// dataset's display name and updates download stats. The counter tracks
    /// distinct remote fetches, not local-copy reuse.
    pub async fn download(
        &self,
        user_id: &str,
        file_hash: &str,
        destination_dir: &Path,
    ) -> Result<Download> {
        if let Some(row) = find_local_copy(&self.db, file_hash, user_id).await? {
            let path = PathBuf::from(&row.local_path);
            if path.exists() {
                return Ok(Download {
                    path,
                    status: DownloadStatus::AlreadyLocal,
                });
            }
            // Lazy pruning: the file left disk outside our control
            tracing::debug!("Pruning stale local copy record for {}", file_hash);
            local_copy::Entity::delete_by_id(row.id).exec(&self.db).await?;
        }

        let dataset = self
            .find_by_hash(file_hash)
            .await?
            .ok_or_else(|| RegistryError::DatasetNotFound(file_hash.to_string()))?;

        // A deregistered dataset's bytes are gone remotely; don't attempt a
        // transfer that can only fail.
        if !dataset.is_active {
            return Err(RegistryError::Deregistered(file_hash.to_string()));
        }

        let destination = destination_dir.join(&dataset.name);
        tracing::info!("Downloading {} to {}", file_hash, destination.display());
        self.gateway.get(&dataset.registry_path, &destination).await?;

        let txn = self.db.begin().await?;

        // The is_active guard makes a deregister committed mid-download fail
        // this update cleanly instead of resurrecting an inactive record.
        let updated = dataset::Entity::update_many()
            .col_expr(
                dataset::Column::DownloadCount,
                Expr::col(dataset::Column::DownloadCount).add(1),
            )
            .col_expr(dataset::Column::LastDownloadedAt, Expr::value(now_ts()))
            .filter(dataset::Column::Hash.eq(file_hash))
            .filter(dataset::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            let _ = tokio::fs::remove_file(&destination).await;
            return Err(RegistryError::Deregistered(file_hash.to_string()));
        }

        upsert_local_copy(&txn, file_hash, user_id, &destination).await?;
        txn.commit().await?;

        Ok(Download {
            path: destination,
            status: DownloadStatus::Downloaded,
        })
    }

    /// All datasets visible to `user_id`, newest first.
    ///
    /// A dataset is visible if it is active, or if the user holds a local
    /// copy record for it (possibly stale: no disk checks here, a listing is
    /// an unrelated read and never prunes).
    pub async fn list_visible(&self, user_id: &str) -> Result<Vec<dataset::Model>> {
        let held: Vec<String> = local_copy::Entity::find()
            .filter(local_copy::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.dataset_hash)
            .collect();

        let mut visible = Condition::any().add(dataset::Column::IsActive.eq(true));
        if !held.is_empty() {
            visible = visible.add(dataset::Column::Hash.is_in(held));
        }

        Ok(dataset::Entity::find()
            .filter(visible)
            .order_by_desc(dataset::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// The caller's recorded local path for a dataset, if the file is still
    /// on disk. Records whose file vanished are pruned and reported absent.
    pub async fn local_path_for(&self, user_id: &str, file_hash: &str) -> Result<Option<PathBuf>> {
        let Some(row) = find_local_copy(&self.db, file_hash, user_id).await? else {
            return Ok(None);
        };

        let path = PathBuf::from(&row.local_path);
        if path.exists() {
            Ok(Some(path))
        } else {
            tracing::debug!("Pruning stale local copy record for {}", file_hash);
            local_copy::Entity::delete_by_id(row.id).exec(&self.db).await?;
            Ok(None)
        }
    }

    /// Remove the caller's local copy: the file from disk and the record from
    /// the catalog. Touches nothing belonging to other users or the dataset
    /// row itself.
    pub async fn delete_local_copy(&self, user_id: &str, file_hash: &str) -> Result<LocalDelete> {
        let Some(row) = find_local_copy(&self.db, file_hash, user_id).await? else {
            return Ok(LocalDelete::NoRecord);
        };

        let path = PathBuf::from(&row.local_path);
        if !path.exists() {
            local_copy::Entity::delete_by_id(row.id).exec(&self.db).await?;
            return Ok(LocalDelete::StaleRecordCleaned);
        }

        tokio::fs::remove_file(&path).await?;
        local_copy::Entity::delete_by_id(row.id).exec(&self.db).await?;
        Ok(LocalDelete::Deleted(path))
    }

    /// Soft-delete a dataset: remove the remote object and mark the row
    /// inactive. Existing local copies are untouched; deregistration revokes
    /// future distribution, not past copies.
    ///
    /// `privileged` is asserted by the presentation layer; the core never
    /// compares credentials.
    pub async fn deregister(&self, file_hash: &str, privileged: bool) -> Result<dataset::Model> {
        if !privileged {
            return Err(RegistryError::PermissionDenied);
        }

        let dataset = self
            .find_by_hash(file_hash)
            .await?
            .ok_or_else(|| RegistryError::DatasetNotFound(file_hash.to_string()))?;

        if !dataset.is_active {
            return Err(RegistryError::AlreadyDeregistered(file_hash.to_string()));
        }

        // Remote removal first: if it fails the dataset must stay active, so
        // the catalog never advertises bytes that are known to be gone.
        tracing::info!("Removing remote object {}", dataset.registry_path);
        self.gateway.remove(&dataset.registry_path).await?;

        let mut row: dataset::ActiveModel = dataset.into();
        row.is_active = Set(false);
        let updated = row.update(&self.db).await?;
        tracing::info!("Dataset {} deregistered", file_hash);
        Ok(updated)
    }

    /// Record that `child_hash` was derived from `parent_hash`.
    ///
    /// Returns `true` if a new edge was written, `false` for an exact
    /// duplicate (idempotent no-op). Fails `Validation` if either endpoint is
    /// unregistered, for self-loops, and for edges that would close a cycle.
    pub async fn create_edge(&self, parent_hash: &str, child_hash: &str) -> Result<bool> {
        if parent_hash == child_hash {
            return Err(RegistryError::Validation(
                "a dataset cannot derive from itself".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        for (role, h) in [("parent", parent_hash), ("child", child_hash)] {
            if dataset::Entity::find_by_id(h).one(&txn).await?.is_none() {
                return Err(RegistryError::Validation(format!(
                    "{} dataset not found: {}",
                    role, h
                )));
            }
        }

        let existing = lineage_edge::Entity::find_by_id((parent_hash.to_string(), child_hash.to_string()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        if lineage::reaches(&txn, child_hash, parent_hash).await? {
            return Err(RegistryError::Validation(format!(
                "edge {} -> {} would create a cycle",
                parent_hash, child_hash
            )));
        }

        lineage_edge::Entity::insert(lineage_edge::ActiveModel {
            parent_hash: Set(parent_hash.to_string()),
            child_hash: Set(child_hash.to_string()),
            created_at: Set(now_ts()),
        })
        .exec(&txn)
        .await?;
        txn.commit().await?;

        tracing::debug!("Lineage edge {} -> {} created", parent_hash, child_hash);
        Ok(true)
    }

    /// Direct parents and children of a dataset
    pub async fn get_lineage(&self, file_hash: &str) -> Result<Lineage> {
        if self.find_by_hash(file_hash).await?.is_none() {
            return Err(RegistryError::DatasetNotFound(file_hash.to_string()));
        }
        lineage::neighbors(&self.db, file_hash).await
    }
}

fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

async fn find_local_copy<C: ConnectionTrait>(
    db: &C,
    file_hash: &str,
    user_id: &str,
) -> Result<Option<local_copy::Model>> {
    Ok(local_copy::Entity::find()
        .filter(local_copy::Column::DatasetHash.eq(file_hash))
        .filter(local_copy::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Create or refresh the (dataset, user) local copy record. Repeated pushes
/// or downloads by the same user just re-point the recorded path.
async fn upsert_local_copy<C: ConnectionTrait>(
    db: &C,
    file_hash: &str,
    user_id: &str,
    path: &Path,
) -> Result<()> {
    match find_local_copy(db, file_hash, user_id).await? {
        Some(row) => {
            let mut active: local_copy::ActiveModel = row.into();
            active.local_path = Set(path.display().to_string());
            active.updated_at = Set(now_ts());
            active.update(db).await?;
        }
        None => {
            local_copy::ActiveModel {
                dataset_hash: Set(file_hash.to_string()),
                user_id: Set(user_id.to_string()),
                local_path: Set(path.display().to_string()),
                updated_at: Set(now_ts()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}
