use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::error::{Result, ScriptError};
use crate::script::fail_closed;
use crate::store::UserStore;
use crate::user::{NewUser, UserId, UserRecord};

/// `create` script: provision a user from its email.
#[derive(Clone)]
pub struct CreateUser {
    store: Arc<dyn UserStore>,
}

impl CreateUser {
    /// Create a new [`CreateUser`].
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create the user, `None` meaning the platform sent no user.
    pub async fn execute(&self, user: Option<NewUser>) -> Result<UserRecord> {
        fail_closed("create", self.process(user)).await
    }

    /// Same as [`CreateUser::execute`] on a raw platform payload.
    pub async fn execute_value(&self, payload: Value) -> Result<UserRecord> {
        match NewUser::from_value(payload) {
            Ok(user) => self.execute(user).await,
            Err(err) => fail_closed("create", async { Err(err) }).await,
        }
    }

    /// Callback form of [`CreateUser::execute`].
    pub async fn call<F>(&self, user: Option<NewUser>, callback: F)
    where
        F: FnOnce(Result<UserRecord>),
    {
        callback(self.execute(user).await)
    }

    async fn process(&self, user: Option<NewUser>) -> Result<UserRecord> {
        let user = user.ok_or(ScriptError::MissingUser)?;
        user.validate()?;
        let Some(email) = user.email else {
            return Err(ScriptError::MissingUser);
        };

        let record = UserRecord::verified(UserId::derive(&email), email);
        self.store.create(&record).await?;

        Ok(record)
    }
}
