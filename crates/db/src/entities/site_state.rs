//! `SeaORM` Entity for the singleton site_state row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Id of the only row the table may hold.
pub const SINGLETON_ID: i64 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "site_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub homepage_version_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homepage_versions::Entity",
        from = "Column::HomepageVersionId",
        to = "super::homepage_versions::Column::Id"
    )]
    HomepageVersions,
}

impl Related<super::homepage_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HomepageVersions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
