//! In-memory storage backend
//!
//! Suitable for development and tests. Data is lost on restart.

use crate::identity::models::Identity;
use crate::identity::repository::{IdentityRepository, StorageError};
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

/// In-memory identity store, insertion ordered
#[derive(Debug, Default)]
pub struct MemoryIdentityRepository {
    identities: RwLock<Vec<Identity>>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn insert(&self, identity: Identity) -> Result<Uuid, StorageError> {
        let id = identity.id;
        self.identities.write().push(identity);
        Ok(id)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Identity>, StorageError> {
        let identities = self.identities.read();
        Ok(identities.iter().filter(|i| i.name == name).cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Identity>, StorageError> {
        let identities = self.identities.read();
        Ok(identities.iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Identity>, StorageError> {
        let identities = self.identities.read();
        Ok(identities
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut identities = self.identities.write();
        let before = identities.len();
        identities.retain(|i| i.id != id);
        Ok(identities.len() != before)
    }
}
