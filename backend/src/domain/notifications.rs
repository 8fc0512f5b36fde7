//! Change notifications for observers of the record, profile and family stores.
//!
//! Every mutation publishes a [`ChangeEvent`] naming what changed, so
//! subscribers can refresh only the affected views.

use log::debug;
use serde::Serialize;
use shared::RecordType;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
    Cleared,
    ProfileChanged,
    SettingsChanged,
    FamilyChanged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    /// Record kinds whose collections changed; empty for profile, settings and family events
    pub record_types: Vec<RecordType>,
    pub record_id: Option<Uuid>,
}

impl ChangeEvent {
    pub fn added(record_type: RecordType, id: Uuid) -> Self {
        Self {
            kind: ChangeKind::Added,
            record_types: vec![record_type],
            record_id: Some(id),
        }
    }

    pub fn updated(record_type: RecordType, id: Uuid) -> Self {
        Self {
            kind: ChangeKind::Updated,
            record_types: vec![record_type],
            record_id: Some(id),
        }
    }

    pub fn deleted(record_types: Vec<RecordType>, id: Uuid) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            record_types,
            record_id: Some(id),
        }
    }

    pub fn cleared() -> Self {
        Self {
            kind: ChangeKind::Cleared,
            record_types: RecordType::ALL.to_vec(),
            record_id: None,
        }
    }

    pub fn profile_changed() -> Self {
        Self {
            kind: ChangeKind::ProfileChanged,
            record_types: Vec::new(),
            record_id: None,
        }
    }

    pub fn settings_changed() -> Self {
        Self {
            kind: ChangeKind::SettingsChanged,
            record_types: Vec::new(),
            record_id: None,
        }
    }

    /// `member_id` is the member added, updated or removed
    pub fn family_changed(member_id: Uuid) -> Self {
        Self {
            kind: ChangeKind::FamilyChanged,
            record_types: Vec::new(),
            record_id: Some(member_id),
        }
    }

    /// A batch of records of one kind was added at once
    pub fn seeded(record_type: RecordType) -> Self {
        Self {
            kind: ChangeKind::Added,
            record_types: vec![record_type],
            record_id: None,
        }
    }
}

/// Fan-out publisher shared by the stores
#[derive(Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers. Having none is fine.
    pub fn publish(&self, event: ChangeEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!("Published change event to {} subscribers", receivers),
            Err(broadcast::error::SendError(event)) => {
                debug!("No subscribers for change event {:?}", event.kind)
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let notifier = ChangeNotifier::new();
        notifier.publish(ChangeEvent::cleared());
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let notifier = ChangeNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        let id = Uuid::new_v4();
        notifier.publish(ChangeEvent::added(RecordType::Sleep, id));

        let event = first.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Added);
        assert_eq!(event.record_types, vec![RecordType::Sleep]);
        assert_eq!(event.record_id, Some(id));
        assert_eq!(second.recv().await.unwrap(), event);
    }
}
