use super::traits::UserStore;
use crate::common::error::Result;
use crate::domain::UserRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory store implementation for development/testing.
pub struct InMemoryStore {
    users: Arc<Mutex<HashMap<Uuid, UserRecord>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<UserRecord>> {
        let users = self.users.lock().unwrap();
        let user = users
            .values()
            .find(|u| u.email == email || u.phone == phone)
            .cloned();
        Ok(user)
    }

    async fn insert(&self, record: &mut UserRecord) -> Result<()> {
        let id = Uuid::new_v4();
        record.id = Some(id);

        let mut users = self.users.lock().unwrap();
        users.insert(id, record.clone());

        debug!("Created {} record: {} with id {}", record.role, record.email, id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserRecord>> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}
