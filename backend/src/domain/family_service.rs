//! Family member store domain logic.
//!
//! Keeps the caregivers the baby's records are shared with, in the order
//! they were added. Mutations are persisted before the in-memory list is
//! replaced.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::commands::family::AddFamilyMemberCommand;
use crate::domain::models::family::{initials, FamilyMember, FamilyMemberNotFound};
use crate::domain::notifications::{ChangeEvent, ChangeNotifier};
use crate::storage::{FamilyRepository, KeyValueStore};

#[derive(Clone)]
pub struct FamilyService {
    repository: FamilyRepository,
    members: Arc<RwLock<Vec<FamilyMember>>>,
    notifier: ChangeNotifier,
}

impl FamilyService {
    pub async fn new(store: Arc<dyn KeyValueStore>, notifier: ChangeNotifier) -> Result<Self> {
        let repository = FamilyRepository::new(store);
        let members = repository.load().await?;
        info!("Loaded {} family members", members.len());

        Ok(Self {
            repository,
            members: Arc::new(RwLock::new(members)),
            notifier,
        })
    }

    pub async fn list(&self) -> Vec<FamilyMember> {
        self.members.read().await.clone()
    }

    pub async fn add(&self, command: AddFamilyMemberCommand) -> Result<FamilyMember> {
        self.add_at(command, Utc::now()).await
    }

    pub async fn add_at(&self, command: AddFamilyMemberCommand, now: DateTime<Utc>) -> Result<FamilyMember> {
        info!("Adding family member: {:?}", command);

        let name = command.name.trim().to_string();
        let avatar = match command.avatar.as_deref().map(str::trim) {
            Some(avatar) if !avatar.is_empty() => avatar.to_string(),
            _ => initials(&name),
        };
        let member = FamilyMember {
            id: Uuid::new_v4(),
            role: command.role.trim().to_string(),
            is_online: command.is_online,
            last_active: now,
            avatar,
            name,
        };
        member.validate()?;

        let mut members = self.members.write().await;
        let mut updated = members.clone();
        updated.push(member.clone());
        self.repository.save(&updated).await?;
        *members = updated;
        drop(members);

        self.notifier.publish(ChangeEvent::family_changed(member.id));
        Ok(member)
    }

    /// Remove a member. Returns false when the id is unknown.
    pub async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut members = self.members.write().await;
        let Some(index) = members.iter().position(|m| m.id == id) else {
            debug!("Remove requested for unknown family member {}", id);
            return Ok(false);
        };

        let mut updated = members.clone();
        let removed = updated.remove(index);
        self.repository.save(&updated).await?;
        *members = updated;
        drop(members);

        info!("Removed family member {}", removed.name);
        self.notifier.publish(ChangeEvent::family_changed(id));
        Ok(true)
    }

    /// Set the online flag; `last_active` moves to `now` either way
    pub async fn update_presence(&self, id: Uuid, is_online: bool) -> Result<FamilyMember> {
        self.update_presence_at(id, is_online, Utc::now()).await
    }

    pub async fn update_presence_at(&self, id: Uuid, is_online: bool, now: DateTime<Utc>) -> Result<FamilyMember> {
        let mut members = self.members.write().await;
        let index = members
            .iter()
            .position(|m| m.id == id)
            .ok_or(FamilyMemberNotFound(id))?;

        let mut updated = members.clone();
        updated[index].is_online = is_online;
        updated[index].last_active = now;
        let member = updated[index].clone();

        self.repository.save(&updated).await?;
        *members = updated;
        drop(members);

        debug!("Family member {} online: {}", member.name, is_online);
        self.notifier.publish(ChangeEvent::family_changed(id));
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::family::FamilyValidationError;
    use crate::domain::notifications::ChangeKind;
    use crate::storage::test_utils::FlakyStore;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    async fn setup_test() -> (FamilyService, MemoryStore, ChangeNotifier) {
        let store = MemoryStore::new();
        let notifier = ChangeNotifier::new();
        let service = FamilyService::new(Arc::new(store.clone()), notifier.clone())
            .await
            .expect("Failed to create family service");
        (service, store, notifier)
    }

    fn command(name: &str, role: &str) -> AddFamilyMemberCommand {
        AddFamilyMemberCommand {
            name: name.to_string(),
            role: role.to_string(),
            avatar: None,
            is_online: false,
        }
    }

    #[tokio::test]
    async fn test_add_list_and_reload() {
        let (service, store, notifier) = setup_test().await;
        let mut events = notifier.subscribe();

        let mum = service.add(command(" Mum ", "Primary carer")).await.unwrap();
        let grandpa = service
            .add(AddFamilyMemberCommand {
                avatar: Some("👴".to_string()),
                ..command("Grandpa Joe", "Occasional carer")
            })
            .await
            .unwrap();

        assert_eq!(mum.name, "Mum");
        assert_eq!(mum.avatar, "M");
        assert_eq!(grandpa.avatar, "👴");

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::FamilyChanged);
        assert_eq!(event.record_id, Some(mum.id));

        let listed: Vec<Uuid> = service.list().await.iter().map(|m| m.id).collect();
        assert_eq!(listed, vec![mum.id, grandpa.id]);

        let reloaded = FamilyService::new(Arc::new(store), ChangeNotifier::new()).await.unwrap();
        assert_eq!(reloaded.list().await, service.list().await);
    }

    #[tokio::test]
    async fn test_invalid_member_is_rejected() {
        let (service, _store, _notifier) = setup_test().await;

        let err = service.add(command("Dad", "  ")).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<FamilyValidationError>(),
            Some(&FamilyValidationError::EmptyRole)
        );
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let (service, _store, _notifier) = setup_test().await;
        let dad = service.add(command("Dad", "Parent")).await.unwrap();

        assert!(!service.remove(Uuid::new_v4()).await.unwrap());
        assert!(service.remove(dad.id).await.unwrap());
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_presence() {
        let (service, _store, _notifier) = setup_test().await;
        let joined = Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 1, 20, 9, 30, 0).unwrap();
        let dad = service.add_at(command("Dad", "Parent"), joined).await.unwrap();

        let online = service.update_presence_at(dad.id, true, later).await.unwrap();
        assert!(online.is_online);
        assert_eq!(online.last_active, later);
        assert_eq!(service.list().await[0], online);

        let err = service.update_presence(Uuid::new_v4(), true).await.unwrap_err();
        assert!(err.downcast_ref::<FamilyMemberNotFound>().is_some());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_members_unchanged() {
        let store = FlakyStore::new();
        let service = FamilyService::new(Arc::new(store.clone()), ChangeNotifier::new())
            .await
            .unwrap();
        let dad = service.add(command("Dad", "Parent")).await.unwrap();

        store.fail_writes(true);
        assert!(service.add(command("Mum", "Parent")).await.is_err());
        assert!(service.remove(dad.id).await.is_err());
        assert_eq!(service.list().await, vec![dad]);
    }
}
