//! Stores notification preferences under the `AppSettings` key.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use shared::AppSettings;
use std::sync::Arc;

use crate::storage::traits::KeyValueStore;

pub const SETTINGS_KEY: &str = "AppSettings";

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub async fn load(&self) -> Result<AppSettings> {
        let Some(bytes) = self.store.get(SETTINGS_KEY).await? else {
            info!("No stored settings, using defaults");
            return Ok(AppSettings::default());
        };
        match serde_json::from_slice(&bytes) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Discarding undecodable settings: {}", e);
                Ok(AppSettings::default())
            }
        }
    }

    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let bytes = serde_json::to_vec(settings).context("Failed to encode settings")?;
        self.store.set(SETTINGS_KEY, &bytes).await?;
        debug!("Saved settings: {:?}", settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_defaults_then_saved_value() {
        let repo = SettingsRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load().await.unwrap(), AppSettings::default());

        let settings = AppSettings {
            diaper_reminders: true,
            feeding_reminder_interval_hours: 4,
            ..AppSettings::default()
        };
        repo.save(&settings).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), settings);
    }
}
