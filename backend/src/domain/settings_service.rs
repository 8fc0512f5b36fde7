//! Notification preferences.
//!
//! The master switch drives every category: turning notifications on or off
//! sets each category toggle to the same value. Category toggles supplied in
//! the same update are applied afterwards.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::info;
use shared::AppSettings;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::notifications::{ChangeEvent, ChangeNotifier};
use crate::storage::{KeyValueStore, SettingsRepository};

pub const MIN_FEEDING_INTERVAL_HOURS: u32 = 1;
pub const MAX_FEEDING_INTERVAL_HOURS: u32 = 12;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsValidationError {
    #[error("Feeding reminder interval must be between 1 and 12 hours (got {0})")]
    InvalidFeedingInterval(u32),
}

#[derive(Clone)]
pub struct SettingsService {
    repository: SettingsRepository,
    settings: Arc<RwLock<AppSettings>>,
    notifier: ChangeNotifier,
}

impl SettingsService {
    pub async fn new(store: Arc<dyn KeyValueStore>, notifier: ChangeNotifier) -> Result<Self> {
        let repository = SettingsRepository::new(store);
        let settings = repository.load().await?;

        Ok(Self {
            repository,
            settings: Arc::new(RwLock::new(settings)),
            notifier,
        })
    }

    pub async fn get(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    pub async fn update(&self, command: UpdateSettingsCommand) -> Result<AppSettings> {
        info!("Updating settings: {:?}", command);

        if let Some(hours) = command.feeding_reminder_interval_hours {
            if !(MIN_FEEDING_INTERVAL_HOURS..=MAX_FEEDING_INTERVAL_HOURS).contains(&hours) {
                return Err(SettingsValidationError::InvalidFeedingInterval(hours).into());
            }
        }

        let mut current = self.settings.write().await;
        let mut updated = current.clone();

        if let Some(enabled) = command.notifications_enabled {
            updated.notifications_enabled = enabled;
            updated.feeding_reminders = enabled;
            updated.sleep_reminders = enabled;
            updated.diaper_reminders = enabled;
            updated.milestone_alerts = enabled;
            updated.medication_reminders = enabled;
        }
        if let Some(v) = command.feeding_reminders {
            updated.feeding_reminders = v;
        }
        if let Some(v) = command.sleep_reminders {
            updated.sleep_reminders = v;
        }
        if let Some(v) = command.diaper_reminders {
            updated.diaper_reminders = v;
        }
        if let Some(v) = command.milestone_alerts {
            updated.milestone_alerts = v;
        }
        if let Some(v) = command.medication_reminders {
            updated.medication_reminders = v;
        }
        if let Some(hours) = command.feeding_reminder_interval_hours {
            updated.feeding_reminder_interval_hours = hours;
        }

        self.repository.save(&updated).await?;
        *current = updated.clone();
        drop(current);

        self.notifier.publish(ChangeEvent::settings_changed());
        Ok(updated)
    }

    /// When the next feeding reminder is due, if reminders apply
    pub async fn next_feeding_reminder(&self, last_feeding: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        let settings = self.settings.read().await;
        next_feeding_reminder(&settings, last_feeding)
    }
}

pub fn next_feeding_reminder(settings: &AppSettings, last_feeding: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    if !settings.notifications_enabled || !settings.feeding_reminders {
        return None;
    }
    last_feeding.map(|last| last + Duration::hours(settings.feeding_reminder_interval_hours as i64))
}
