//! Persistence seam for identity records
//!
//! Names are not unique: `find_by_name` returns every record sharing a name and
//! leaves the credential check to the service.

use crate::error::Error;
use crate::identity::models::Identity;
use async_trait::async_trait;
use uuid::Uuid;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Task(join) if join.is_cancelled() => Error::Cancelled,
            other => Error::upstream(other),
        }
    }
}

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Persist a new record and return its id
    async fn insert(&self, identity: Identity) -> Result<Uuid, StorageError>;

    /// All records with exactly this name
    async fn find_by_name(&self, name: &str) -> Result<Vec<Identity>, StorageError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Identity>, StorageError>;

    /// Records ordered by creation time
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Identity>, StorageError>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}
