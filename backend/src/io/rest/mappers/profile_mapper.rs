use anyhow::Result;
use chrono::NaiveDate;
use shared::{BabyProfile as SharedProfile, CreateProfileRequest, ProfileResponse, UpdateProfileRequest};

use crate::domain::commands::profile::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::models::profile::{BabyProfile, ProfileValidationError};

/// Mapper between profile DTOs and the domain profile.
pub struct ProfileMapper;

impl ProfileMapper {
    pub fn to_create_command(request: CreateProfileRequest) -> Result<CreateProfileCommand> {
        Ok(CreateProfileCommand {
            name: request.name,
            birth_date: parse_date(&request.birth_date)?,
            gender: request.gender,
            birth_weight_kg: request.birth_weight_kg,
            birth_height_cm: request.birth_height_cm,
            photo_ref: request.photo_ref,
        })
    }

    pub fn to_update_command(request: UpdateProfileRequest) -> Result<UpdateProfileCommand> {
        Ok(UpdateProfileCommand {
            name: request.name,
            birth_date: request.birth_date.as_deref().map(parse_date).transpose()?,
            gender: request.gender,
            birth_weight_kg: request.birth_weight_kg,
            birth_height_cm: request.birth_height_cm,
            photo_ref: request.photo_ref,
        })
    }

    /// Converts the domain profile to a DTO with its age as of `today`.
    pub fn to_dto(profile: BabyProfile, today: NaiveDate) -> SharedProfile {
        SharedProfile {
            id: profile.id.to_string(),
            age_in_days: profile.age_in_days(today),
            age_description: profile.age_description(today),
            name: profile.name,
            birth_date: profile.birth_date.format("%Y-%m-%d").to_string(),
            gender: profile.gender,
            birth_weight_kg: profile.birth_weight_kg,
            birth_height_cm: profile.birth_height_cm,
            photo_ref: profile.photo_ref,
        }
    }

    pub fn to_response(profile: Option<BabyProfile>, today: NaiveDate, message: &str) -> ProfileResponse {
        ProfileResponse {
            profile: profile.map(|p| Self::to_dto(p, today)),
            success_message: message.to_string(),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ProfileValidationError::InvalidBirthDate(format!("'{}', expected YYYY-MM-DD", value)).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Gender;
    use uuid::Uuid;

    #[test]
    fn test_create_command_parses_birth_date() {
        let request = CreateProfileRequest {
            name: "Ava".to_string(),
            birth_date: "2025-02-14".to_string(),
            gender: Gender::Female,
            birth_weight_kg: None,
            birth_height_cm: None,
            photo_ref: None,
        };
        let command = ProfileMapper::to_create_command(request.clone()).unwrap();
        assert_eq!(command.birth_date, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());

        let bad = CreateProfileRequest {
            birth_date: "14/02/2025".to_string(),
            ..request
        };
        let err = ProfileMapper::to_create_command(bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProfileValidationError>(),
            Some(ProfileValidationError::InvalidBirthDate(_))
        ));
    }

    #[test]
    fn test_dto_includes_age() {
        let profile = BabyProfile {
            id: Uuid::new_v4(),
            name: "Ava".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
            gender: Gender::Female,
            birth_weight_kg: Some(3.1),
            birth_height_cm: None,
            photo_ref: None,
        };
        let dto = ProfileMapper::to_dto(profile, NaiveDate::from_ymd_opt(2025, 2, 26).unwrap());
        assert_eq!(dto.birth_date, "2025-02-14");
        assert_eq!(dto.age_in_days, 12);
        assert_eq!(dto.age_description, "12d");
    }
}
