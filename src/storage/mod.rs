pub mod in_memory;
pub mod traits;

#[cfg(feature = "db")]
pub mod database;

pub use in_memory::InMemoryStore;
pub use traits::UserStore;

use crate::common::error::Result;
use crate::config::{Config, StoreBackend};
use crate::registry::StoreRegistry;
use std::sync::Arc;

#[cfg(not(feature = "db"))]
use crate::common::error::DirectoryError;
#[cfg(feature = "db")]
use crate::domain::Role;

/// Builds the role-to-store registry for the configured backend.
pub async fn build_registry(config: &Config) -> Result<Arc<StoreRegistry>> {
    match config.stores.backend {
        StoreBackend::Memory => Ok(Arc::new(StoreRegistry::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
        ))),
        #[cfg(feature = "db")]
        StoreBackend::Libsql => {
            let admin = Arc::new(database::LibsqlStore::connect(Role::Admin).await?);
            let teacher = Arc::new(database::LibsqlStore::connect(Role::Teacher).await?);
            let student = Arc::new(database::LibsqlStore::connect(Role::Student).await?);
            Ok(Arc::new(StoreRegistry::new(admin, teacher, student)))
        }
        #[cfg(not(feature = "db"))]
        StoreBackend::Libsql => Err(DirectoryError::Config(
            "store backend 'libsql' requires building with the 'db' feature".to_string(),
        )),
    }
}
