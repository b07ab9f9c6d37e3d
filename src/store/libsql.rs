//! libSQL-backed persona store.
//!
//! One `personas` table with the persona serialized as a JSON document
//! column. The schema is created on open.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use libsql::params;
use uuid::Uuid;

use crate::error::StoreError;
use crate::persona::SoulDeepPersona;
use crate::store::PersonaStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS personas (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// Persona store backed by a local libSQL file database.
pub struct LibSqlStore {
    // The database must outlive its connections.
    _db: libsql::Database,
    conn: libsql::Connection,
}

impl LibSqlStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Open(format!("create {}: {}", parent.display(), e)))?;
        }

        let db = libsql::Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.execute(SCHEMA, ()).await?;

        tracing::debug!(path = %path.display(), "Opened persona store");
        Ok(Self { _db: db, conn })
    }
}

#[async_trait]
impl PersonaStore for LibSqlStore {
    async fn put(&self, user_id: &str, persona: &SoulDeepPersona) -> Result<(), StoreError> {
        let data = serde_json::to_string(persona)
            .map_err(|e| StoreError::Serialization(format!("persona encode: {e}")))?;

        self.conn
            .execute(
                "INSERT INTO personas (id, user_id, data, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    Uuid::new_v4().to_string(),
                    user_id,
                    data,
                    Utc::now().to_rfc3339(),
                ],
            )
            .await?;

        tracing::info!(user_id, "Persona stored");
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<SoulDeepPersona, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT data FROM personas WHERE user_id = ?1 ORDER BY rowid DESC LIMIT 1",
                params![user_id],
            )
            .await?;

        let row = rows.next().await?.ok_or_else(|| StoreError::NotFound {
            entity: "persona".to_string(),
            id: user_id.to_string(),
        })?;

        let data: String = row.get(0)?;
        serde_json::from_str(&data)
            .map_err(|e| StoreError::Serialization(format!("persona decode: {e}")))
    }

    async fn list_users(&self) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT DISTINCT user_id FROM personas ORDER BY user_id",
                (),
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row.get::<String>(0)?);
        }
        Ok(users)
    }
}
