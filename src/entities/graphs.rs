//! SeaORM entity for stored graph definitions.
//!
//! One row per saved chart: identity, chart family, title, and the JSON
//! payload the frontend renders from.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "graphs")]
pub struct Model {
    /// UUID assigned at materialization or creation time.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Chart family as its lowercase wire name (line, bar, pie, area, scatter).
    #[sea_orm(column_name = "type")]
    pub graph_type: String,
    pub title: String,
    /// Chart payload: rows plus optional axis-key hints.
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub extra: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub justification: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
