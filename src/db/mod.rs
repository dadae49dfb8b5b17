//! Catalog persistence using SQLite via SeaORM

pub mod entities;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;

/// Initialize catalog connection and create tables
pub async fn init_catalog(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    tracing::info!("Connecting to catalog: {}", db_url);

    let db = Database::connect(&db_url).await?;

    create_tables(&db).await?;

    Ok(db)
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Datasets table: one row per distinct content fingerprint ever pushed.
    // Rows are soft-deleted (is_active=0), never removed by steady-state
    // operations.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS datasets (
            hash TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            source TEXT,
            registry_path TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            size_bytes INTEGER,
            download_count INTEGER NOT NULL DEFAULT 0,
            last_downloaded_at INTEGER
        )
        "#
        .to_string(),
    ))
    .await?;

    // Migration: add size_bytes column if it doesn't exist (for older catalogs)
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            r#"ALTER TABLE datasets ADD COLUMN size_bytes INTEGER"#.to_string(),
        ))
        .await;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_datasets_created ON datasets(created_at)"#.to_string(),
    ))
    .await?;

    // Local copies table: one row per (dataset, user) pair that holds or once
    // held a local copy.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS local_copies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            dataset_hash TEXT NOT NULL,
            user_id TEXT NOT NULL,
            local_path TEXT NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (dataset_hash) REFERENCES datasets(hash) ON DELETE CASCADE,
            UNIQUE(dataset_hash, user_id)
        )
        "#
        .to_string(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_local_copies_user ON local_copies(user_id)"#.to_string(),
    ))
    .await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_local_copies_hash ON local_copies(dataset_hash)"#
            .to_string(),
    ))
    .await?;

    // Lineage edges table: directed "child derived from parent" relation,
    // many-to-many between datasets.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS lineage_edges (
            parent_hash TEXT NOT NULL,
            child_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (parent_hash, child_hash),
            FOREIGN KEY (parent_hash) REFERENCES datasets(hash) ON DELETE CASCADE,
            FOREIGN KEY (child_hash) REFERENCES datasets(hash) ON DELETE CASCADE
        )
        "#
        .to_string(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_lineage_child ON lineage_edges(child_hash)"#.to_string(),
    ))
    .await?;

    tracing::info!("Catalog tables initialized");
    Ok(())
}
