//! Profile store domain logic.
//!
//! Holds zero or one [`BabyProfile`]. Every mutation builds a complete new
//! profile, validates it, persists it and then replaces the in-memory copy.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::commands::profile::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::models::profile::{BabyProfile, ProfileNotFound};
use crate::domain::notifications::{ChangeEvent, ChangeNotifier};
use crate::storage::{KeyValueStore, ProfileRepository};

#[derive(Clone)]
pub struct ProfileService {
    repository: ProfileRepository,
    profile: Arc<RwLock<Option<BabyProfile>>>,
    notifier: ChangeNotifier,
}

impl ProfileService {
    pub async fn new(store: Arc<dyn KeyValueStore>, notifier: ChangeNotifier) -> Result<Self> {
        let repository = ProfileRepository::new(store);
        let profile = repository.load().await?;
        if let Some(profile) = &profile {
            info!("Loaded baby profile for {}", profile.name);
        }

        Ok(Self {
            repository,
            profile: Arc::new(RwLock::new(profile)),
            notifier,
        })
    }

    pub async fn get(&self) -> Option<BabyProfile> {
        self.profile.read().await.clone()
    }

    /// Create a profile, replacing any existing one
    pub async fn create(&self, command: CreateProfileCommand) -> Result<BabyProfile> {
        self.create_as_of(command, today()).await
    }

    pub async fn create_as_of(&self, command: CreateProfileCommand, today: NaiveDate) -> Result<BabyProfile> {
        info!("Creating baby profile: {:?}", command);

        let profile = BabyProfile {
            id: Uuid::new_v4(),
            name: command.name.trim().to_string(),
            birth_date: command.birth_date,
            gender: command.gender,
            birth_weight_kg: command.birth_weight_kg,
            birth_height_cm: command.birth_height_cm,
            photo_ref: command.photo_ref,
        };
        profile.validate(today)?;

        let mut current = self.profile.write().await;
        if current.is_some() {
            warn!("Replacing existing baby profile");
        }
        self.repository.save(&profile).await?;
        *current = Some(profile.clone());
        drop(current);

        self.notifier.publish(ChangeEvent::profile_changed());
        Ok(profile)
    }

    /// Merge the provided fields into the current profile
    pub async fn update(&self, command: UpdateProfileCommand) -> Result<BabyProfile> {
        self.update_as_of(command, today()).await
    }

    pub async fn update_as_of(&self, command: UpdateProfileCommand, today: NaiveDate) -> Result<BabyProfile> {
        info!("Updating baby profile: {:?}", command);

        let mut current = self.profile.write().await;
        let existing = current.as_ref().ok_or(ProfileNotFound)?;

        let updated = BabyProfile {
            id: existing.id,
            name: command
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| existing.name.clone()),
            birth_date: command.birth_date.unwrap_or(existing.birth_date),
            gender: command.gender.unwrap_or(existing.gender),
            birth_weight_kg: command.birth_weight_kg.or(existing.birth_weight_kg),
            birth_height_cm: command.birth_height_cm.or(existing.birth_height_cm),
            photo_ref: command.photo_ref.or_else(|| existing.photo_ref.clone()),
        };
        updated.validate(today)?;

        self.repository.save(&updated).await?;
        *current = Some(updated.clone());
        drop(current);

        self.notifier.publish(ChangeEvent::profile_changed());
        Ok(updated)
    }

    /// Remove the profile. Returns false when there was none.
    pub async fn clear(&self) -> Result<bool> {
        let mut current = self.profile.write().await;
        if current.is_none() {
            return Ok(false);
        }

        self.repository.delete().await?;
        *current = None;
        drop(current);

        info!("Cleared baby profile");
        self.notifier.publish(ChangeEvent::profile_changed());
        Ok(true)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::profile::ProfileValidationError;
    use crate::domain::notifications::ChangeKind;
    use crate::storage::MemoryStore;
    use shared::Gender;

    async fn setup_test() -> (ProfileService, MemoryStore, ChangeNotifier) {
        let store = MemoryStore::new();
        let notifier = ChangeNotifier::new();
        let service = ProfileService::new(Arc::new(store.clone()), notifier.clone())
            .await
            .expect("Failed to create profile service");
        (service, store, notifier)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_command(name: &str) -> CreateProfileCommand {
        CreateProfileCommand {
            name: name.to_string(),
            birth_date: date(2025, 1, 10),
            gender: Gender::Male,
            birth_weight_kg: Some(3.5),
            birth_height_cm: None,
            photo_ref: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, store, notifier) = setup_test().await;
        let mut events = notifier.subscribe();
        assert_eq!(service.get().await, None);

        let profile = service.create_as_of(create_command("  Liam "), date(2025, 3, 1)).await.unwrap();
        assert_eq!(profile.name, "Liam");
        assert_eq!(service.get().await, Some(profile));
        assert!(store.get("babyProfile").await.unwrap().is_some());
        assert_eq!(events.recv().await.unwrap().kind, ChangeKind::ProfileChanged);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_profile() {
        let (service, store, _notifier) = setup_test().await;

        let err = service.create_as_of(create_command(""), date(2025, 3, 1)).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ProfileValidationError>(), Some(&ProfileValidationError::EmptyName));

        let err = service.create_as_of(create_command("Liam"), date(2025, 1, 9)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProfileValidationError>(),
            Some(ProfileValidationError::BirthDateInFuture(_))
        ));

        assert_eq!(service.get().await, None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (service, _store, _notifier) = setup_test().await;
        let created = service.create_as_of(create_command("Liam"), date(2025, 3, 1)).await.unwrap();

        let updated = service
            .update_as_of(
                UpdateProfileCommand {
                    name: Some("Noah".to_string()),
                    birth_height_cm: Some(51.0),
                    ..UpdateProfileCommand::default()
                },
                date(2025, 3, 1),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Noah");
        assert_eq!(updated.birth_date, created.birth_date);
        assert_eq!(updated.birth_weight_kg, Some(3.5));
        assert_eq!(updated.birth_height_cm, Some(51.0));
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_previous_profile() {
        let (service, _store, _notifier) = setup_test().await;
        let created = service.create_as_of(create_command("Liam"), date(2025, 3, 1)).await.unwrap();

        let result = service
            .update_as_of(
                UpdateProfileCommand {
                    name: Some("x".repeat(101)),
                    ..UpdateProfileCommand::default()
                },
                date(2025, 3, 1),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(service.get().await, Some(created));
    }

    #[tokio::test]
    async fn test_update_without_profile_fails() {
        let (service, _store, _notifier) = setup_test().await;
        let err = service.update(UpdateProfileCommand::default()).await.unwrap_err();
        assert!(err.downcast_ref::<ProfileNotFound>().is_some());
    }

    #[tokio::test]
    async fn test_clear_and_reload() {
        let (service, store, _notifier) = setup_test().await;
        service.create_as_of(create_command("Liam"), date(2025, 3, 1)).await.unwrap();

        let reloaded = ProfileService::new(Arc::new(store.clone()), ChangeNotifier::new()).await.unwrap();
        assert_eq!(reloaded.get().await, service.get().await);

        assert!(service.clear().await.unwrap());
        assert!(!service.clear().await.unwrap());
        assert_eq!(service.get().await, None);
        assert!(store.get("babyProfile").await.unwrap().is_none());
    }
}
