use super::traits::UserStore;
use crate::common::error::{DirectoryError, Result};
use crate::domain::{Role, UserRecord};
use async_trait::async_trait;
use libsql::{Builder, Connection, Database};
use std::env;
use tracing::{debug, info};
use uuid::Uuid;

/// libsql-backed store, one database per role. Records are stored as JSON
/// documents with email/phone lifted into columns for lookup.
///
/// Connection endpoints come from the environment: `<ROLE>_DB_URL` plus an
/// optional `<ROLE>_DB_AUTH_TOKEN` for remote (Turso) databases. A URL
/// without a token is treated as a local database path.
pub struct LibsqlStore {
    db: Database,
    role: Role,
}

impl LibsqlStore {
    pub async fn connect(role: Role) -> Result<Self> {
        let prefix = role.as_str().to_uppercase();
        let url = env::var(format!("{prefix}_DB_URL")).map_err(|_| DirectoryError::Config(
            format!("{prefix}_DB_URL environment variable not set"),
        ))?;

        let db = match env::var(format!("{prefix}_DB_AUTH_TOKEN")) {
            Ok(token) => {
                info!("Connecting to remote {} store at {}", role, url);
                Builder::new_remote(url, token).build().await
            }
            Err(_) => {
                info!("Opening local {} store at {}", role, url);
                Builder::new_local(url).build().await
            }
        }
        .map_err(|e| DirectoryError::Storage {
            message: format!("Failed to connect to {role} store: {e}"),
        })?;

        let store = Self { db, role };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn get_connection(&self) -> Result<Connection> {
        self.db.connect().map_err(|e| DirectoryError::Storage {
            message: format!("Failed to get {} store connection: {e}", self.role),
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection().await?;
        let migration_sql = include_str!("../../migrations/001_create_users.sql");
        conn.execute_batch(migration_sql)
            .await
            .map_err(|e| DirectoryError::Storage {
                message: format!("Failed to migrate {} store: {e}", self.role),
            })?;
        Ok(())
    }

    fn record_to_row_data(record: &UserRecord) -> Result<String> {
        serde_json::to_string(record).map_err(|e| DirectoryError::Storage {
            message: format!("Failed to serialize user record: {e}"),
        })
    }

    fn row_data_to_record(id: &str, data: &str) -> Result<UserRecord> {
        let mut record: UserRecord =
            serde_json::from_str(data).map_err(|e| DirectoryError::Storage {
                message: format!("Failed to deserialize user record: {e}"),
            })?;
        record.id = Some(Uuid::parse_str(id).map_err(|e| DirectoryError::Storage {
            message: format!("Invalid user UUID: {e}"),
        })?);
        Ok(record)
    }

    async fn query_one(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<UserRecord>> {
        let conn = self.get_connection().await?;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| DirectoryError::Storage {
                message: format!("Failed to query {} store: {e}", self.role),
            })?;

        if let Some(row) = rows.next().await.map_err(|e| DirectoryError::Storage {
            message: format!("Failed to read row: {e}"),
        })? {
            let id: String = row.get(0).map_err(|e| DirectoryError::Storage {
                message: format!("Failed to get id: {e}"),
            })?;
            let data: String = row.get(1).map_err(|e| DirectoryError::Storage {
                message: format!("Failed to get data: {e}"),
            })?;
            Ok(Some(Self::row_data_to_record(&id, &data)?))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl UserStore for LibsqlStore {
    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<UserRecord>> {
        self.query_one(
            "SELECT id, data FROM users WHERE email = ?1 OR phone = ?2 LIMIT 1",
            libsql::params![email, phone],
        )
        .await
    }

    async fn insert(&self, record: &mut UserRecord) -> Result<()> {
        let id = Uuid::new_v4();
        record.id = Some(id);
        let data = Self::record_to_row_data(record)?;

        let conn = self.get_connection().await?;
        conn.execute(
            "INSERT INTO users (id, email, phone, data) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.to_string(), record.email.clone(), record.phone.clone(), data],
        )
        .await
        .map_err(|e| DirectoryError::Storage {
            message: format!("Failed to insert into {} store: {e}", self.role),
        })?;

        debug!("Created {} record: {} with id {}", self.role, record.email, id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        self.query_one(
            "SELECT id, data FROM users WHERE id = ?1",
            libsql::params![id.to_string()],
        )
        .await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserRecord>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.find_by_id(*id).await? {
                results.push(record);
            }
        }
        Ok(results)
    }
}
