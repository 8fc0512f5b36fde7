//! Stores the family member list under the `familyMembers` key.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::sync::Arc;

use crate::domain::models::family::FamilyMember;
use crate::storage::traits::KeyValueStore;

pub const FAMILY_KEY: &str = "familyMembers";

#[derive(Clone)]
pub struct FamilyRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FamilyRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Vec<FamilyMember>> {
        let Some(bytes) = self.store.get(FAMILY_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(members) => Ok(members),
            Err(e) => {
                warn!("Discarding undecodable family member list: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, members: &[FamilyMember]) -> Result<()> {
        let bytes = serde_json::to_vec(members).context("Failed to encode family members")?;
        self.store.set(FAMILY_KEY, &bytes).await?;
        debug!("Saved {} family members", members.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_family_persistence() {
        let store = MemoryStore::new();
        let repo = FamilyRepository::new(Arc::new(store.clone()));
        assert!(repo.load().await.unwrap().is_empty());

        let members = vec![FamilyMember {
            id: Uuid::new_v4(),
            name: "Mum".to_string(),
            role: "Primary carer".to_string(),
            is_online: true,
            last_active: Utc::now(),
            avatar: "M".to_string(),
        }];
        repo.save(&members).await.unwrap();
        assert!(store.get("familyMembers").await.unwrap().is_some());
        assert_eq!(repo.load().await.unwrap(), members);
    }

    #[tokio::test]
    async fn test_corrupt_family_list_is_empty() {
        let store = MemoryStore::new();
        store.set("familyMembers", b"{\"not\": \"a list\"}").await.unwrap();
        let repo = FamilyRepository::new(Arc::new(store));
        assert!(repo.load().await.unwrap().is_empty());
    }
}
