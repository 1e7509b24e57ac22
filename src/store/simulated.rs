use async_trait::async_trait;

use crate::error::Result;
use crate::store::UserStore;
use crate::user::{UserId, UserRecord};

/// Store that persists nothing.
///
/// Writes only emit a log line and every lookup of a well-formed email
/// succeeds with the derived identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedStore;

impl SimulatedStore {
    /// Create a new [`SimulatedStore`].
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserStore for SimulatedStore {
    async fn create(&self, record: &UserRecord) -> Result<()> {
        tracing::info!(
            user_id = %record.user_id,
            "[EXTERNAL DB WRITE]: user created"
        );
        Ok(())
    }

    async fn find_by_email(
        &self,
        _email: &str,
        candidate: &UserId,
    ) -> Result<Option<UserId>> {
        tracing::debug!(user_id = %candidate, "[EXTERNAL DB READ]: user found");
        Ok(Some(candidate.clone()))
    }
}
