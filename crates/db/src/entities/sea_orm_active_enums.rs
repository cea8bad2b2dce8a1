//! `SeaORM` active enums stored as TEXT with CHECK constraints.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[sea_orm(string_value = "MASTER")]
    Master,
    #[sea_orm(string_value = "STAFF")]
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "contacted")]
    Contacted,
    #[sea_orm(string_value = "won")]
    Won,
    #[sea_orm(string_value = "lost")]
    Lost,
}

impl From<larder_core::auth::UserRole> for UserRole {
    fn from(role: larder_core::auth::UserRole) -> Self {
        match role {
            larder_core::auth::UserRole::Master => Self::Master,
            larder_core::auth::UserRole::Staff => Self::Staff,
        }
    }
}

impl From<UserRole> for larder_core::auth::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Master => Self::Master,
            UserRole::Staff => Self::Staff,
        }
    }
}

impl From<VersionStatus> for larder_core::homepage::VersionStatus {
    fn from(status: VersionStatus) -> Self {
        match status {
            VersionStatus::Draft => Self::Draft,
            VersionStatus::Published => Self::Published,
        }
    }
}

impl From<larder_core::leads::LeadStatus> for LeadStatus {
    fn from(status: larder_core::leads::LeadStatus) -> Self {
        match status {
            larder_core::leads::LeadStatus::New => Self::New,
            larder_core::leads::LeadStatus::Contacted => Self::Contacted,
            larder_core::leads::LeadStatus::Won => Self::Won,
            larder_core::leads::LeadStatus::Lost => Self::Lost,
        }
    }
}

impl From<LeadStatus> for larder_core::leads::LeadStatus {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::New => Self::New,
            LeadStatus::Contacted => Self::Contacted,
            LeadStatus::Won => Self::Won,
            LeadStatus::Lost => Self::Lost,
        }
    }
}
