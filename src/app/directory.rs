use crate::common::error::{DirectoryError, Result};
use crate::domain::{ResolvedUser, Role, SignupRequest, UserRecord};
use crate::registry::StoreRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Signup, login and relationship queries over the role-scoped stores.
pub struct DirectoryService {
    registry: Arc<StoreRegistry>,
}

impl DirectoryService {
    pub fn new(registry: Arc<StoreRegistry>) -> Self {
        Self { registry }
    }

    /// Registers a new user in the store matching the requested role.
    ///
    /// The duplicate check (email OR phone) and the insert are two separate
    /// store operations; two concurrent signups for the same identity can
    /// both pass the check.
    pub async fn signup(&self, request: SignupRequest) -> Result<Role> {
        let (role, store) = self
            .registry
            .resolve_label(&request.role)
            .ok_or_else(|| DirectoryError::InvalidRole(request.role.clone()))?;

        if store
            .find_by_email_or_phone(&request.email, &request.phone)
            .await?
            .is_some()
        {
            return Err(DirectoryError::DuplicateUser);
        }

        let mut record = request.into_record(role);
        store.insert(&mut record).await?;

        info!("Registered {} account for {}", role, record.email);
        Ok(role)
    }

    /// Authenticates a login id (matched against email OR phone) and
    /// password. Stores are tried in `StoreRegistry::LOGIN_ORDER`; the
    /// first match wins, and no attempt is made to detect the same login
    /// id in multiple stores.
    pub async fn login(&self, login_id: &str, password: &str) -> Result<UserRecord> {
        for role in StoreRegistry::LOGIN_ORDER {
            let store = self.registry.resolve(role);
            if let Some(user) = store.find_by_email_or_phone(login_id, login_id).await? {
                if user.password == password {
                    info!("Login succeeded for {} ({})", login_id, role);
                    return Ok(user);
                }
            }
        }
        Err(DirectoryError::InvalidCredentials)
    }

    /// Looks up an admin and resolves its teacher and student access lists
    /// to full records.
    pub async fn admin_access(&self, admin_id: Uuid) -> Result<ResolvedUser> {
        let admin = self
            .registry
            .resolve(Role::Admin)
            .find_by_id(admin_id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound("Admin".to_string()))?;

        let teachers = self
            .resolve_references(Role::Teacher, &admin.access_to_teachers)
            .await?;
        let students = self
            .resolve_references(Role::Student, &admin.access_to_students)
            .await?;

        Ok(ResolvedUser::assemble(admin, teachers, students))
    }

    /// Looks up a teacher and resolves its student access list.
    pub async fn teacher_access(&self, teacher_id: Uuid) -> Result<ResolvedUser> {
        let teacher = self
            .registry
            .resolve(Role::Teacher)
            .find_by_id(teacher_id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound("Teacher".to_string()))?;

        let students = self
            .resolve_references(Role::Student, &teacher.access_to_students)
            .await?;

        Ok(ResolvedUser::assemble(teacher, Vec::new(), students))
    }

    /// Two-step reference resolution: batch-fetch the referenced ids from
    /// the target role's store, then reassemble in the reference list's
    /// order. Dangling references are dropped.
    async fn resolve_references(&self, role: Role, ids: &[Uuid]) -> Result<Vec<UserRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fetched = self.registry.resolve(role).find_by_ids(ids).await?;
        let mut by_id: HashMap<Uuid, UserRecord> = fetched
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user)))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
