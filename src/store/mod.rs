//! Persona persistence.
//!
//! An append-only keyed store: every completed submission appends a row and
//! reads return the latest persona for a user. Two backends:
//! - **libSQL** (default): local file database
//! - **memory**: ephemeral, for tests and `--ephemeral` runs

mod libsql;
mod memory;

pub use libsql::LibSqlStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::persona::SoulDeepPersona;

/// Append-only keyed store of synthesized personas.
#[async_trait]
pub trait PersonaStore: Send + Sync {
    /// Append a persona for a user. Earlier rows are kept; reads see the
    /// most recent one.
    async fn put(&self, user_id: &str, persona: &SoulDeepPersona) -> Result<(), StoreError>;

    /// Fetch the latest persona for a user.
    async fn get(&self, user_id: &str) -> Result<SoulDeepPersona, StoreError>;

    /// List all users with at least one stored persona.
    async fn list_users(&self) -> Result<Vec<String>, StoreError>;
}
