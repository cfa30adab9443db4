use crate::common::error::Result;
use crate::domain::UserRecord;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage trait for one role-scoped collection of user records.
///
/// The store itself enforces no uniqueness; duplicate detection is a
/// check-then-insert performed by callers and is not atomic.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the first record whose email equals `email` OR whose phone
    /// equals `phone`. Used for both duplicate detection and credential
    /// lookup (where both arguments are the login id).
    async fn find_by_email_or_phone(&self, email: &str, phone: &str)
        -> Result<Option<UserRecord>>;

    /// Persists a new record, assigning it a store-unique id. Does not
    /// check for duplicates.
    async fn insert(&self, record: &mut UserRecord) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Batch lookup for access-list resolution. Order of the returned
    /// records is unspecified; missing ids are simply absent.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserRecord>>;
}
