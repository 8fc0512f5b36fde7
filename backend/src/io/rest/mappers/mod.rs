//! Conversions between `shared` DTOs and domain types.

pub mod family_mapper;
pub mod profile_mapper;
pub mod record_mapper;
pub mod statistics_mapper;

pub use family_mapper::FamilyMapper;
pub use profile_mapper::ProfileMapper;
pub use record_mapper::RecordMapper;
pub use statistics_mapper::StatisticsMapper;
