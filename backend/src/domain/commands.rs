//! Domain-level command and query types
//!
//! Used by services inside the domain layer and not exposed over the public
//! API. The REST layer maps the DTOs in the `shared` crate to these.

pub mod records {
    use chrono::{DateTime, Utc};
    use shared::RecordType;

    /// Filters for listing records. All filters are optional and combine.
    #[derive(Debug, Clone, Default)]
    pub struct RecordListQuery {
        pub record_type: Option<RecordType>,
        /// Inclusive
        pub start: Option<DateTime<Utc>>,
        /// Inclusive
        pub end: Option<DateTime<Utc>>,
        pub limit: Option<usize>,
    }
}

pub mod profile {
    use chrono::NaiveDate;
    use shared::Gender;

    #[derive(Debug, Clone)]
    pub struct CreateProfileCommand {
        pub name: String,
        pub birth_date: NaiveDate,
        pub gender: Gender,
        pub birth_weight_kg: Option<f64>,
        pub birth_height_cm: Option<f64>,
        pub photo_ref: Option<String>,
    }

    /// Fields left as `None` keep their current value
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub gender: Option<Gender>,
        pub birth_weight_kg: Option<f64>,
        pub birth_height_cm: Option<f64>,
        pub photo_ref: Option<String>,
    }
}

pub mod family {
    #[derive(Debug, Clone)]
    pub struct AddFamilyMemberCommand {
        pub name: String,
        pub role: String,
        pub avatar: Option<String>,
        pub is_online: bool,
    }
}

pub mod settings {
    /// Fields left as `None` keep their current value
    #[derive(Debug, Clone, Default)]
    pub struct UpdateSettingsCommand {
        pub notifications_enabled: Option<bool>,
        pub feeding_reminders: Option<bool>,
        pub sleep_reminders: Option<bool>,
        pub diaper_reminders: Option<bool>,
        pub milestone_alerts: Option<bool>,
        pub medication_reminders: Option<bool>,
        pub feeding_reminder_interval_hours: Option<u32>,
    }
}

pub mod export {
    use chrono::{DateTime, Utc};
    use shared::RecordType;

    #[derive(Debug, Clone, Default)]
    pub struct ExportRecordsCommand {
        pub start: Option<DateTime<Utc>>,
        pub end: Option<DateTime<Utc>>,
        /// All kinds when `None`
        pub record_types: Option<Vec<RecordType>>,
    }

    #[derive(Debug, Clone)]
    pub struct ExportRecordsResult {
        pub csv_content: String,
        pub filename: String,
        pub record_count: usize,
    }
}
