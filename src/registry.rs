use crate::domain::Role;
use crate::storage::UserStore;
use std::sync::Arc;

/// Maps each role to its store handle. Extending the directory with a new
/// role means adding a `Role` variant and an entry here.
pub struct StoreRegistry {
    admin: Arc<dyn UserStore>,
    teacher: Arc<dyn UserStore>,
    student: Arc<dyn UserStore>,
}

impl StoreRegistry {
    /// Fixed priority order for cross-role credential lookup: the first
    /// store yielding a match wins. This ordering is a documented contract;
    /// it decides which record a login id shared across stores resolves to.
    pub const LOGIN_ORDER: [Role; 3] = [Role::Admin, Role::Student, Role::Teacher];

    pub fn new(
        admin: Arc<dyn UserStore>,
        teacher: Arc<dyn UserStore>,
        student: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            admin,
            teacher,
            student,
        }
    }

    pub fn resolve(&self, role: Role) -> &Arc<dyn UserStore> {
        match role {
            Role::Admin => &self.admin,
            Role::Teacher => &self.teacher,
            Role::Student => &self.student,
        }
    }

    /// Resolves a free-form role label to its role and store. Unknown
    /// labels yield `None`.
    pub fn resolve_label(&self, label: &str) -> Option<(Role, &Arc<dyn UserStore>)> {
        let role = Role::parse(label)?;
        Some((role, self.resolve(role)))
    }
}
