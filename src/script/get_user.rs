use std::sync::Arc;

use crate::error::Result;
use crate::script::fail_closed;
use crate::store::UserStore;
use crate::user::{LookupContext, LookupOutcome, UserId, UserRecord};

/// `get_user` script: find a user by identifier.
#[derive(Clone)]
pub struct GetUser {
    store: Arc<dyn UserStore>,
}

impl GetUser {
    /// Create a new [`GetUser`].
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Look `identifier` up.
    ///
    /// An identifier which is not email-like is inconclusive and gives
    /// [`LookupOutcome::NotFound`], so the platform may go on to `create`.
    pub async fn execute(
        &self,
        identifier: &str,
        context: &LookupContext,
    ) -> Result<LookupOutcome> {
        fail_closed("get_user", self.process(identifier, context)).await
    }

    /// Callback form of [`GetUser::execute`].
    pub async fn call<F>(
        &self,
        identifier: &str,
        context: &LookupContext,
        callback: F,
    ) where
        F: FnOnce(Result<LookupOutcome>),
    {
        callback(self.execute(identifier, context).await)
    }

    async fn process(
        &self,
        identifier: &str,
        _context: &LookupContext,
    ) -> Result<LookupOutcome> {
        if !is_email_like(identifier) {
            tracing::debug!("identifier is not an email, user not found");
            return Ok(LookupOutcome::NotFound);
        }

        let candidate = UserId::derive(identifier);
        let found = self.store.find_by_email(identifier, &candidate).await?;

        Ok(found
            .map(|user_id| UserRecord::verified(user_id, identifier))
            .into())
    }
}

fn is_email_like(identifier: &str) -> bool {
    identifier.contains('@')
}
