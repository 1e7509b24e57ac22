use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, ScriptError};
use crate::store::UserStore;
use crate::user::{UserId, UserRecord};

/// Process-local store keeping `user_id -> email`.
///
/// Unlike [`super::SimulatedStore`] it answers "not found" and refuses to
/// bind one identifier to two emails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, String>>,
}

impl MemoryStore {
    /// Create a new empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.write().await;

        match users.get(&record.user_id) {
            Some(email) if email == &record.email => {
                tracing::debug!(user_id = %record.user_id, "user already saved");
                Ok(())
            },
            Some(_) => Err(ScriptError::IdentifierCollision {
                user_id: record.user_id.to_string(),
                email: record.email.clone(),
            }),
            None => {
                users.insert(record.user_id.clone(), record.email.clone());
                tracing::info!(user_id = %record.user_id, "user saved in memory");
                Ok(())
            },
        }
    }

    async fn find_by_email(
        &self,
        email: &str,
        candidate: &UserId,
    ) -> Result<Option<UserId>> {
        let users = self.users.read().await;

        match users.get(candidate) {
            Some(saved) if saved == email => Ok(Some(candidate.clone())),
            Some(_) => {
                tracing::warn!(
                    user_id = %candidate,
                    "identifier is bound to another email, treating as not found"
                );
                Ok(None)
            },
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> UserRecord {
        UserRecord::verified(UserId::derive(email), email)
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.create(&record("jane.doe@example.com")).await.unwrap();

        let candidate = UserId::derive("jane.doe@example.com");
        let found = store
            .find_by_email("jane.doe@example.com", &candidate)
            .await
            .unwrap();
        assert_eq!(found, Some(candidate));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = MemoryStore::new();
        let candidate = UserId::derive("ghost@example.com");

        let found = store
            .find_by_email("ghost@example.com", &candidate)
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = MemoryStore::new();

        store.create(&record("a@x.com")).await.unwrap();
        store.create(&record("a@x.com")).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_collision_is_rejected() {
        let store = MemoryStore::new();
        store.create(&record("a@x.com")).await.unwrap();

        let err = store.create(&record("a@y.com")).await.unwrap_err();
        assert!(matches!(
            err,
            ScriptError::IdentifierCollision { ref user_id, ref email }
                if user_id == "a" && email == "a@y.com"
        ));

        // Lookup never hands out someone else's identifier.
        let found = store
            .find_by_email("a@y.com", &UserId::derive("a@y.com"))
            .await
            .unwrap();
        assert_eq!(found, None);
    }
}
