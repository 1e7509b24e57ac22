//! User store port and its stand-in implementations.
mod memory;
mod simulated;

pub use memory::MemoryStore;
pub use simulated::SimulatedStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::user::{UserId, UserRecord};

/// Port for the external user-record store.
///
/// Replace [`SimulatedStore`] with a real client to persist users; scripts
/// do not change.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Save a new user record.
    async fn create(&self, record: &UserRecord) -> Result<()>;

    /// Find the identifier saved for `email`.
    ///
    /// `candidate` is the identifier derived from `email`. `Ok(None)` means
    /// the user does not exist.
    async fn find_by_email(
        &self,
        email: &str,
        candidate: &UserId,
    ) -> Result<Option<UserId>>;
}
