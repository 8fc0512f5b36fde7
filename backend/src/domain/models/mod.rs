pub mod analysis;
pub mod family;
pub mod profile;
pub mod record;
pub mod statistics;
