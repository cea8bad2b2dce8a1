//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod homepage_versions;
pub mod lead_notes;
pub mod leads;
pub mod sea_orm_active_enums;
pub mod site_state;
pub mod users;
