//! Custom database connection scripts for an identity platform.
//!
//! Two scripts, [`script::CreateUser`] and [`script::GetUser`], correlated
//! only by [`user::UserId::derive`]: a lookup after a creation resolves the
//! same identifier. Persistence sits behind [`store::UserStore`].
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod script;
pub mod store;
pub mod telemetry;
pub mod user;

use std::sync::Arc;

use config::{Configuration, StoreKind};
use script::Scripts;
use store::{MemoryStore, SimulatedStore, UserStore};

/// Build both scripts from the configuration.
pub fn initialize(config: &Configuration) -> Scripts {
    let store: Arc<dyn UserStore> = match config.store {
        StoreKind::Simulated => Arc::new(SimulatedStore::new()),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };

    tracing::info!(
        name = %config.name,
        version = config.version(),
        store = ?config.store,
        "scripts initialized"
    );

    Scripts::new(store)
}
