//! Identity Service
//! Mission: Hash new credentials and match presented ones against storage

use crate::error::{Error, Result};
use crate::identity::models::Identity;
use crate::identity::repository::IdentityRepository;
use bcrypt::{hash, verify, DEFAULT_COST};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// bcrypt only reads this many bytes of a password; anything longer would be
/// silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Credential custody on top of an [`IdentityRepository`]
#[derive(Clone)]
pub struct IdentityService {
    repository: Arc<dyn IdentityRepository>,
    cost: u32,
}

impl IdentityService {
    pub fn new(repository: Arc<dyn IdentityRepository>) -> Self {
        Self::with_cost(repository, DEFAULT_COST)
    }

    /// Override the bcrypt work factor. Only tests and benchmarks should go
    /// below `DEFAULT_COST`.
    pub fn with_cost(repository: Arc<dyn IdentityRepository>, cost: u32) -> Self {
        Self { repository, cost }
    }

    /// Hash the plaintext and persist a new identity
    pub async fn create_identity(&self, name: &str, password: &str) -> Result<Uuid> {
        if name.is_empty() || password.is_empty() {
            return Err(Error::validation("missing name or password"));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(Error::validation(format!(
                "password longer than {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        let password = password.to_string();
        let cost = self.cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
            .await?
            .map_err(Error::upstream)?;

        let id = self
            .repository
            .insert(Identity::new(name, password_hash))
            .await?;

        info!(%id, name, "Created identity");
        Ok(id)
    }

    /// Return the first identity named `name` whose hash accepts `password`
    pub async fn find_by_name_and_password(&self, name: &str, password: &str) -> Result<Identity> {
        let candidates = self.repository.find_by_name(name).await?;
        let password = password.to_string();

        // No stored password can be this long, and bcrypt would compare only a prefix.
        if password.len() > MAX_PASSWORD_BYTES {
            debug!(name, "Presented password exceeds bcrypt input limit");
            return Err(Error::CredentialMismatch);
        }

        if candidates.is_empty() {
            // Spend one hash so unknown names cost the same as a failed verify.
            let cost = self.cost;
            let _ = tokio::task::spawn_blocking(move || hash(password, cost)).await?;
            debug!(name, "No identity with this name");
            return Err(Error::CredentialMismatch);
        }

        let matched = tokio::task::spawn_blocking(move || {
            candidates.into_iter().find(|candidate| {
                match verify(&password, &candidate.password_hash) {
                    Ok(valid) => valid,
                    Err(e) => {
                        warn!(id = %candidate.id, "Unreadable password hash: {e}");
                        false
                    }
                }
            })
        })
        .await?;

        matched.ok_or(Error::CredentialMismatch)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Identity>> {
        Ok(self.repository.get_by_id(id).await?)
    }

    pub async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Identity>> {
        Ok(self.repository.list(limit, offset).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(%id, "Deleted identity");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::memory::MemoryIdentityRepository;

    // Minimum bcrypt cost keeps the suite fast.
    const TEST_COST: u32 = 4;

    fn service() -> (IdentityService, Arc<MemoryIdentityRepository>) {
        let repo = Arc::new(MemoryIdentityRepository::new());
        (IdentityService::with_cost(repo.clone(), TEST_COST), repo)
    }

    #[tokio::test]
    async fn test_create_then_match() {
        let (svc, _) = service();
        let id = svc.create_identity("alice", "pw1").await.unwrap();

        let identity = svc.find_by_name_and_password("alice", "pw1").await.unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(identity.name, "alice");
    }

    #[tokio::test]
    async fn test_plaintext_is_never_stored() {
        let (svc, repo) = service();
        svc.create_identity("alice", "pw1").await.unwrap();

        let stored = repo.find_by_name("alice").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_ne!(stored[0].password_hash, "pw1");
        assert!(stored[0].password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_credential_mismatch() {
        let (svc, _) = service();
        svc.create_identity("alice", "pw1").await.unwrap();

        for wrong in ["wrong", "", "PW1", "pw1 "] {
            let err = svc
                .find_by_name_and_password("alice", wrong)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::CredentialMismatch), "{wrong:?}");
        }
    }

    #[tokio::test]
    async fn test_unknown_name_is_credential_mismatch() {
        let (svc, _) = service();
        let err = svc
            .find_by_name_and_password("nobody", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CredentialMismatch));
    }

    #[tokio::test]
    async fn test_duplicate_names_match_on_hash_not_name() {
        let (svc, _) = service();
        let first = svc.create_identity("alice", "first").await.unwrap();
        let second = svc.create_identity("alice", "second").await.unwrap();

        let found = svc
            .find_by_name_and_password("alice", "second")
            .await
            .unwrap();
        assert_eq!(found.id, second);

        let found = svc
            .find_by_name_and_password("alice", "first")
            .await
            .unwrap();
        assert_eq!(found.id, first);
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_skipped() {
        let (svc, repo) = service();
        repo.insert(Identity::new("alice", "not-a-bcrypt-hash".to_string()))
            .await
            .unwrap();
        let good = svc.create_identity("alice", "pw1").await.unwrap();

        let found = svc.find_by_name_and_password("alice", "pw1").await.unwrap();
        assert_eq!(found.id, good);

        let err = svc
            .find_by_name_and_password("alice", "not-a-bcrypt-hash")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CredentialMismatch));
    }

    #[tokio::test]
    async fn test_admin_pass_through() {
        let (svc, _) = service();
        let id = svc.create_identity("bob", "pw").await.unwrap();

        assert_eq!(svc.get_by_id(id).await.unwrap().unwrap().name, "bob");
        assert_eq!(svc.list(10, 0).await.unwrap().len(), 1);
        assert!(svc.delete(id).await.unwrap());
        assert!(svc.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_fields_rejected_before_storage() {
        let (svc, repo) = service();
        for (name, password) in [("", "pw"), ("alice", "")] {
            let err = svc.create_identity(name, password).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(repo.list(10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_password_over_bcrypt_limit_is_refused() {
        let (svc, repo) = service();
        let too_long = format!("{}correct-suffix", "a".repeat(MAX_PASSWORD_BYTES));

        let err = svc.create_identity("alice", &too_long).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(repo.list(10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_longer_password_sharing_prefix_does_not_match() {
        let (svc, _) = service();
        let stored = "a".repeat(MAX_PASSWORD_BYTES);
        svc.create_identity("alice", &stored).await.unwrap();

        let presented = format!("{stored}WRONG");
        let err = svc
            .find_by_name_and_password("alice", &presented)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CredentialMismatch));
        assert!(svc.find_by_name_and_password("alice", &stored).await.is_ok());
    }
}
