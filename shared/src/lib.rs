use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The closed set of care record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Feeding,
    Diaper,
    Sleep,
    Growth,
    Milestone,
    Medication,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::Feeding,
        RecordType::Diaper,
        RecordType::Sleep,
        RecordType::Growth,
        RecordType::Milestone,
        RecordType::Medication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Feeding => "feeding",
            RecordType::Diaper => "diaper",
            RecordType::Sleep => "sleep",
            RecordType::Growth => "growth",
            RecordType::Milestone => "milestone",
            RecordType::Medication => "medication",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown record type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingMethod {
    Breast,
    Bottle,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreastSide {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WetnessLevel {
    Dry,
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BowelConsistency {
    Liquid,
    Soft,
    Normal,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepLocation {
    Crib,
    Bed,
    Stroller,
    CarSeat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneCategory {
    Physical,
    Cognitive,
    Social,
    Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrationRoute {
    Oral,
    Topical,
    Injection,
    Drops,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Variant-specific fields of a care record.
///
/// On the wire these are flattened into the record object and selected by the
/// `type` tag, so an unknown tag fails deserialization instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordDetails {
    Feeding {
        method: FeedingMethod,
        #[serde(default)]
        duration_seconds: Option<u32>,
        #[serde(default)]
        amount_ml: Option<f64>,
        #[serde(default)]
        side: Option<BreastSide>,
    },
    Diaper {
        wetness: WetnessLevel,
        has_bowel_movement: bool,
        #[serde(default)]
        consistency: Option<BowelConsistency>,
    },
    Sleep {
        start_time: String,
        #[serde(default)]
        end_time: Option<String>,
        quality: SleepQuality,
        location: SleepLocation,
    },
    Growth {
        #[serde(default)]
        weight_kg: Option<f64>,
        #[serde(default)]
        height_cm: Option<f64>,
        #[serde(default)]
        head_circumference_cm: Option<f64>,
    },
    Milestone {
        category: MilestoneCategory,
        description: String,
        age_in_days: u32,
        #[serde(default)]
        is_completed: bool,
        #[serde(default)]
        completed_date: Option<String>,
    },
    Medication {
        medication_name: String,
        dosage: String,
        route: AdministrationRoute,
        #[serde(default)]
        prescribed_by: Option<String>,
    },
}

impl RecordDetails {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordDetails::Feeding { .. } => RecordType::Feeding,
            RecordDetails::Diaper { .. } => RecordType::Diaper,
            RecordDetails::Sleep { .. } => RecordType::Sleep,
            RecordDetails::Growth { .. } => RecordType::Growth,
            RecordDetails::Milestone { .. } => RecordType::Milestone,
            RecordDetails::Medication { .. } => RecordType::Medication,
        }
    }
}

/// A care record as exchanged with the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareRecord {
    pub id: String,
    /// Event time (RFC 3339)
    pub timestamp: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub details: RecordDetails,
}

/// Request for adding a care record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    /// Optional event time override (RFC 3339) - uses current time if not provided.
    /// Ignored for sleep records, whose timestamp is their start time.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub details: RecordDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordResponse {
    pub record: CareRecord,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<CareRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordResponse {
    pub deleted: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleMilestoneResponse {
    pub record: CareRecord,
    pub success_message: String,
}

/// Aggregated statistics for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStatistics {
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    pub feeding_count: usize,
    pub diaper_count: usize,
    pub sleep_duration_seconds: i64,
    pub sleep_hours: f64,
    pub last_feeding_time: Option<String>,
    pub last_diaper_time: Option<String>,
    pub last_sleep_time: Option<String>,
    /// Habit completion score in [0, 1]
    pub habit_completion: f64,
    /// Human-readable sleep duration, e.g. "2h 15m"
    pub formatted_sleep_duration: String,
}

/// The baby profile as exchanged with the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyProfile {
    pub id: String,
    pub name: String,
    /// ISO 8601 date format (YYYY-MM-DD)
    pub birth_date: String,
    pub gender: Gender,
    pub birth_weight_kg: Option<f64>,
    pub birth_height_cm: Option<f64>,
    pub photo_ref: Option<String>,
    pub age_in_days: i64,
    pub age_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    pub birth_date: String,
    pub gender: Gender,
    #[serde(default)]
    pub birth_weight_kg: Option<f64>,
    #[serde(default)]
    pub birth_height_cm: Option<f64>,
    #[serde(default)]
    pub photo_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birth_weight_kg: Option<f64>,
    #[serde(default)]
    pub birth_height_cm: Option<f64>,
    #[serde(default)]
    pub photo_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Option<BabyProfile>,
    pub success_message: String,
}

/// A caregiver sharing the baby's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub is_online: bool,
    pub last_active: DateTime<Utc>,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFamilyMemberRequest {
    pub name: String,
    pub role: String,
    /// Short display glyph, initials when absent
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePresenceRequest {
    pub is_online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMemberListResponse {
    pub members: Vec<FamilyMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveFamilyMemberResponse {
    pub removed: bool,
    pub success_message: String,
}

/// Notification and reminder preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub notifications_enabled: bool,
    pub feeding_reminders: bool,
    pub sleep_reminders: bool,
    pub diaper_reminders: bool,
    pub milestone_alerts: bool,
    pub medication_reminders: bool,
    pub feeding_reminder_interval_hours: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            feeding_reminders: true,
            sleep_reminders: true,
            diaper_reminders: false,
            milestone_alerts: true,
            medication_reminders: true,
            feeding_reminder_interval_hours: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub notifications_enabled: Option<bool>,
    #[serde(default)]
    pub feeding_reminders: Option<bool>,
    #[serde(default)]
    pub sleep_reminders: Option<bool>,
    #[serde(default)]
    pub diaper_reminders: Option<bool>,
    #[serde(default)]
    pub milestone_alerts: Option<bool>,
    #[serde(default)]
    pub medication_reminders: Option<bool>,
    #[serde(default)]
    pub feeding_reminder_interval_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextFeedingReminderResponse {
    /// RFC 3339 time of the next reminder, None when reminders are off or no feeding exists
    pub next_reminder: Option<String>,
    pub interval_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Photo,
    Video,
}

/// A captured photo or video submitted for development analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: Uuid,
    pub filename: String,
    pub media_type: MediaType,
    /// Baby age in months when the media was captured
    #[serde(default)]
    pub baby_age_months: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStage {
    /// 0-3 months
    Newborn,
    /// 4-12 months
    Infant,
    /// 1-3 years
    Toddler,
    /// 3-5 years
    Preschool,
}

impl DevelopmentStage {
    pub fn from_age_months(age_months: Option<u32>) -> Self {
        match age_months {
            Some(0..=3) => DevelopmentStage::Newborn,
            Some(4..=12) => DevelopmentStage::Infant,
            Some(13..=36) => DevelopmentStage::Toddler,
            Some(_) => DevelopmentStage::Preschool,
            None => DevelopmentStage::Infant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionState {
    Happy,
    Calm,
    Curious,
    Sleepy,
    Crying,
    Fussy,
    Alert,
    Content,
}

impl EmotionState {
    pub const ALL: [EmotionState; 8] = [
        EmotionState::Happy,
        EmotionState::Calm,
        EmotionState::Curious,
        EmotionState::Sleepy,
        EmotionState::Crying,
        EmotionState::Fussy,
        EmotionState::Alert,
        EmotionState::Content,
    ];
}

/// Four-step skill scale shared by the motor and cognitive assessments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    NeedsAttention,
    Developing,
    Established,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::NeedsAttention,
        SkillLevel::Developing,
        SkillLevel::Established,
        SkillLevel::Advanced,
    ];

    pub fn score(&self) -> u32 {
        match self {
            SkillLevel::NeedsAttention => 1,
            SkillLevel::Developing => 2,
            SkillLevel::Established => 3,
            SkillLevel::Advanced => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorAssessment {
    pub gross_motor: SkillLevel,
    pub fine_motor: SkillLevel,
    pub coordination: SkillLevel,
    pub balance: SkillLevel,
}

impl MotorAssessment {
    pub fn average_score(&self) -> f64 {
        let total = self.gross_motor.score()
            + self.fine_motor.score()
            + self.coordination.score()
            + self.balance.score();
        total as f64 / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveAssessment {
    pub attention: SkillLevel,
    pub social_interaction: SkillLevel,
    pub language_readiness: SkillLevel,
    pub problem_solving: SkillLevel,
}

impl CognitiveAssessment {
    pub fn average_score(&self) -> f64 {
        let total = self.attention.score()
            + self.social_interaction.score()
            + self.language_readiness.score()
            + self.problem_solving.score();
        total as f64 / 4.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Result of analysing a single media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub media_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub analysis_version: String,
    pub development_stage: DevelopmentStage,
    pub primary_emotions: Vec<EmotionState>,
    pub emotion_confidence: f64,
    pub motor: MotorAssessment,
    pub cognitive: CognitiveAssessment,
    /// 0-100
    pub overall_health_score: f64,
    /// 0-1
    pub analysis_confidence: f64,
    pub data_quality: DataQuality,
}

impl AnalysisResult {
    /// Mean of the motor and cognitive averages, scaled to 0-100
    pub fn overall_development_score(&self) -> f64 {
        (self.motor.average_score() + self.cognitive.average_score()) / 2.0 * 25.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub daily_limit: u32,
    pub daily_used: u32,
    pub monthly_limit: u32,
    pub monthly_used: u32,
    pub reset_time: DateTime<Utc>,
}

impl QuotaStatus {
    pub fn daily_remaining(&self) -> u32 {
        self.daily_limit.saturating_sub(self.daily_used)
    }

    pub fn monthly_remaining(&self) -> u32 {
        self.monthly_limit.saturating_sub(self.monthly_used)
    }

    pub fn can_analyze(&self) -> bool {
        self.daily_remaining() > 0 && self.monthly_remaining() > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeMediaResponse {
    pub result: AnalysisResult,
    pub quota: QuotaStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    pub media_ids: Vec<Uuid>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// Summary over a set of analysis results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub media_items: Vec<Uuid>,
    pub total_analyses: usize,
    pub average_development_score: f64,
    pub emotion_distribution: HashMap<EmotionState, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecordsRequest {
    /// Inclusive start (RFC 3339); unbounded when absent
    #[serde(default)]
    pub start: Option<String>,
    /// Inclusive end (RFC 3339); unbounded when absent
    #[serde(default)]
    pub end: Option<String>,
    /// Restrict to these record types; all types when absent
    #[serde(default)]
    pub record_types: Option<Vec<RecordType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecordsResponse {
    pub csv_content: String,
    pub filename: String,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearDataResponse {
    pub success_message: String,
}
