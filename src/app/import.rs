use crate::common::error::Result;
use crate::domain::{Role, SignupRequest};
use crate::registry::StoreRegistry;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Per-role creation counts reported after a bulk import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub admin: u32,
    pub teacher: u32,
    pub student: u32,
}

impl ImportSummary {
    fn record(&mut self, role: Role) {
        match role {
            Role::Admin => self.admin += 1,
            Role::Teacher => self.teacher += 1,
            Role::Student => self.student += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.admin + self.teacher + self.student
    }
}

/// Bulk import over tabular rows with the fixed column schema
/// [name, email, phone, university, password, role, universityKey].
pub struct ImportUseCase {
    registry: Arc<StoreRegistry>,
}

impl ImportUseCase {
    pub fn new(registry: Arc<StoreRegistry>) -> Self {
        Self { registry }
    }

    /// Processes rows sequentially. The first row is a header and is
    /// skipped regardless of content. Rows with an unrecognized role and
    /// rows whose email or phone already exists in the target store are
    /// skipped without error. Later rows' duplicate checks see earlier
    /// rows' inserts, so this loop must stay sequential.
    pub async fn import_rows(&self, rows: Vec<Vec<String>>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for row in rows.into_iter().skip(1) {
            let candidate = candidate_from_row(&row);

            let Some((role, store)) = self.registry.resolve_label(&candidate.role) else {
                debug!("Skipping row with unrecognized role '{}'", candidate.role);
                continue;
            };

            if store
                .find_by_email_or_phone(&candidate.email, &candidate.phone)
                .await?
                .is_some()
            {
                debug!("Skipping duplicate row for {}", candidate.email);
                continue;
            }

            let mut record = candidate.into_record(role);
            store.insert(&mut record).await?;
            summary.record(role);
        }

        Ok(summary)
    }
}

/// Maps the first seven columns positionally; missing cells become empty
/// strings rather than failing the row.
fn candidate_from_row(row: &[String]) -> SignupRequest {
    let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
    SignupRequest {
        name: cell(0),
        email: cell(1),
        phone: cell(2),
        university: cell(3),
        password: cell(4),
        role: cell(5),
        university_key: cell(6),
        access_to_students: Vec::new(),
        access_to_teachers: Vec::new(),
    }
}
