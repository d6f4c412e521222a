//! In-Memory Store
//!
//! Process-local `UserStore`. Used when no database is configured and in tests.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokio::sync::RwLock;

use crate::domain::entity::credential::Credential;
use crate::domain::repository::{StoreError, StoreResult, UserStore};
use crate::domain::value_object::user_name::UserName;

/// `HashMap`-backed credential store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    records: RwLock<HashMap<String, Credential>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    async fn exists(&self, username: &UserName) -> StoreResult<bool> {
        Ok(self.records.read().await.contains_key(username.as_str()))
    }

    async fn insert(&self, credential: &Credential) -> StoreResult<()> {
        // Check and write happen under one write guard
        match self
            .records
            .write()
            .await
            .entry(credential.username.as_str().to_owned())
        {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(credential.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, username: &UserName) -> StoreResult<Credential> {
        self.records
            .read()
            .await
            .get(username.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
