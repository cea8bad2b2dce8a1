//! `SeaORM` Entity for leads table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LeadStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    /// UTM attribution object, JSON text.
    pub utm: String,
    pub message: Option<String>,
    pub status: LeadStatus,
    /// Tag array, JSON text.
    pub tags: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lead_notes::Entity")]
    LeadNotes,
}

impl Related<super::lead_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeadNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
