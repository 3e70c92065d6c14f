//! Identity Storage
//! Mission: Durably store identity records with SQLite

use crate::identity::models::Identity;
use crate::identity::repository::{IdentityRepository, StorageError};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, name, password_hash, created_at FROM identities";

/// Identity storage with SQLite backend
#[derive(Debug, Clone)]
pub struct SqliteIdentityRepository {
    db_path: PathBuf,
}

impl SqliteIdentityRepository {
    /// Open (or create) the database file and initialize the schema
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        store.init_db()?;
        info!("Identity store initialized at: {}", store.db_path.display());
        Ok(store)
    }

    fn init_db(&self) -> Result<(), StorageError> {
        let conn = Connection::open(&self.db_path)?;

        // No UNIQUE constraint on name: lookups tolerate duplicates.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS identities (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_identities_name ON identities(name);",
        )?;

        Ok(())
    }

    /// Run a blocking closure against a fresh connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            f(&conn)
        })
        .await?
    }
}

fn identity_from_row(row: &Row<'_>) -> rusqlite::Result<(String, Identity)> {
    let raw_id: String = row.get(0)?;
    Ok((
        raw_id,
        Identity {
            id: Uuid::nil(),
            name: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: row.get(3)?,
        },
    ))
}

fn parse_id((raw_id, mut identity): (String, Identity)) -> Result<Identity, StorageError> {
    identity.id = Uuid::parse_str(&raw_id)
        .map_err(|e| StorageError::Corrupt(format!("identity id {raw_id:?}: {e}")))?;
    Ok(identity)
}

fn collect_identities(
    rows: impl Iterator<Item = rusqlite::Result<(String, Identity)>>,
) -> Result<Vec<Identity>, StorageError> {
    rows.map(|row| parse_id(row?)).collect()
}

#[async_trait]
impl IdentityRepository for SqliteIdentityRepository {
    async fn insert(&self, identity: Identity) -> Result<Uuid, StorageError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO identities (id, name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    identity.id.to_string(),
                    identity.name,
                    identity.password_hash,
                    identity.created_at,
                ],
            )?;
            Ok(identity.id)
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Identity>, StorageError> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_COLUMNS} WHERE name = ?1 ORDER BY created_at"))?;
            let rows = stmt.query_map(params![name], identity_from_row)?;
            collect_identities(rows)
        })
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Identity>, StorageError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let result = stmt.query_row(params![id.to_string()], identity_from_row);

            match result {
                Ok(row) => parse_id(row).map(Some),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Identity>, StorageError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt.query_map(params![limit, offset], identity_from_row)?;
            collect_identities(rows)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        self.with_conn(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM identities WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}
