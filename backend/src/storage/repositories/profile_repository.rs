//! Stores the baby profile under the `babyProfile` key.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::sync::Arc;

use crate::domain::models::profile::BabyProfile;
use crate::storage::traits::KeyValueStore;

pub const PROFILE_KEY: &str = "babyProfile";

#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<BabyProfile>> {
        let Some(bytes) = self.store.get(PROFILE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("Discarding undecodable baby profile: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, profile: &BabyProfile) -> Result<()> {
        let bytes = serde_json::to_vec(profile).context("Failed to encode baby profile")?;
        self.store.set(PROFILE_KEY, &bytes).await?;
        debug!("Saved baby profile {}", profile.id);
        Ok(())
    }

    pub async fn delete(&self) -> Result<()> {
        self.store.remove(PROFILE_KEY).await
    }
}
