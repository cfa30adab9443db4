use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role. Determines which store a record lives in and which
/// access lists apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Parses a role label. Matching is case-sensitive and exact; anything
    /// other than "admin", "teacher" or "student" is rejected.
    pub fn parse(label: &str) -> Option<Role> {
        match label {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record in one of the role-scoped stores. Records are created by
/// signup or bulk import and never updated or deleted.
///
/// The password is stored and compared as plaintext and echoed back on
/// login; hashing is out of scope for this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub password: String,
    pub role: Role,
    pub university_key: String,
    #[serde(default)]
    pub access_to_students: Vec<Uuid>,
    #[serde(default)]
    pub access_to_teachers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Signup payload. The role arrives as a free-form label and is validated
/// against the registry rather than at deserialization time, so unknown
/// roles surface as a 400 instead of a body-parse rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub password: String,
    pub role: String,
    pub university_key: String,
    #[serde(default)]
    pub access_to_students: Vec<Uuid>,
    #[serde(default)]
    pub access_to_teachers: Vec<Uuid>,
}

impl SignupRequest {
    /// Builds the record to persist. The id is assigned by the store on
    /// insert; the role field is set from the resolved role so a record's
    /// role always matches the store it lands in.
    pub fn into_record(self, role: Role) -> UserRecord {
        UserRecord {
            id: None,
            name: self.name,
            email: self.email,
            phone: self.phone,
            university: self.university,
            password: self.password,
            role,
            university_key: self.university_key,
            access_to_students: self.access_to_students,
            access_to_teachers: self.access_to_teachers,
            created_at: Utc::now(),
        }
    }
}

/// A user record with its access lists resolved to full records via
/// cross-store lookups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedUser {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub password: String,
    pub role: Role,
    pub university_key: String,
    pub access_to_students: Vec<UserRecord>,
    pub access_to_teachers: Vec<UserRecord>,
    pub created_at: DateTime<Utc>,
}

impl ResolvedUser {
    pub fn assemble(
        record: UserRecord,
        teachers: Vec<UserRecord>,
        students: Vec<UserRecord>,
    ) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            university: record.university,
            password: record.password,
            role: record.role,
            university_key: record.university_key,
            access_to_students: students,
            access_to_teachers: teachers,
            created_at: record.created_at,
        }
    }
}
