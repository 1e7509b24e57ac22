//! Custom database scripts invoked by the identity platform.
//!
//! Each script completes exactly once: either through the returned future,
//! or through an [`FnOnce`] callback for callers which want the platform's
//! callback shape. Panics raised while processing are caught and delivered
//! as [`ScriptError::Unexpected`].
pub mod create;
pub mod get_user;

pub use create::CreateUser;
pub use get_user::GetUser;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{ErrorKind, Result, ScriptError};
use crate::store::UserStore;

/// Both scripts, sharing one store.
#[derive(Clone)]
pub struct Scripts {
    pub create: CreateUser,
    pub get_user: GetUser,
}

impl Scripts {
    /// Create a new [`Scripts`] on top of `store`.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            create: CreateUser::new(Arc::clone(&store)),
            get_user: GetUser::new(store),
        }
    }
}

/// Run `fut`, turning a panic into an error.
async fn fail_closed<F, T>(script: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let result = match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ScriptError::from_panic(payload)),
    };

    if let Err(err) = &result {
        match err.kind() {
            ErrorKind::Unexpected => {
                tracing::error!(script, error = %err, "an unexpected error occurred")
            },
            _ => tracing::warn!(script, error = %err, "script refused request"),
        }
    }

    result
}
