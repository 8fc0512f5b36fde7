use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_MEMBER_NAME_LENGTH: usize = 50;

/// A caregiver with access to the baby's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub is_online: bool,
    pub last_active: DateTime<Utc>,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FamilyValidationError {
    #[error("Family member name cannot be empty")]
    EmptyName,
    #[error("Family member name cannot exceed 50 characters (got {0})")]
    NameTooLong(usize),
    #[error("Family member role cannot be empty")]
    EmptyRole,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Family member not found: {0}")]
pub struct FamilyMemberNotFound(pub Uuid);

impl FamilyMember {
    pub fn validate(&self) -> Result<(), FamilyValidationError> {
        if self.name.trim().is_empty() {
            return Err(FamilyValidationError::EmptyName);
        }
        let length = self.name.trim().chars().count();
        if length > MAX_MEMBER_NAME_LENGTH {
            return Err(FamilyValidationError::NameTooLong(length));
        }
        if self.role.trim().is_empty() {
            return Err(FamilyValidationError::EmptyRole);
        }
        Ok(())
    }
}

/// Uppercased first letters of up to two words, `?` for a blank name
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}
