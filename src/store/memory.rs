//! In-memory persona store for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::persona::SoulDeepPersona;
use crate::store::PersonaStore;

/// Ephemeral store keeping the full append history per user.
#[derive(Default)]
pub struct MemoryStore {
    personas: RwLock<HashMap<String, Vec<SoulDeepPersona>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonaStore for MemoryStore {
    async fn put(&self, user_id: &str, persona: &SoulDeepPersona) -> Result<(), StoreError> {
        self.personas
            .write()
            .expect("personas lock poisoned")
            .entry(user_id.to_string())
            .or_default()
            .push(persona.clone());
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<SoulDeepPersona, StoreError> {
        self.personas
            .read()
            .expect("personas lock poisoned")
            .get(user_id)
            .and_then(|history| history.last().cloned())
            .ok_or_else(|| StoreError::NotFound {
                entity: "persona".to_string(),
                id: user_id.to_string(),
            })
    }

    async fn list_users(&self) -> Result<Vec<String>, StoreError> {
        let mut users: Vec<String> = self
            .personas
            .read()
            .expect("personas lock poisoned")
            .keys()
            .cloned()
            .collect();
        users.sort();
        Ok(users)
    }
}
