//! Zodiac reading entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "zodiac_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Client-supplied idempotency key
    #[sea_orm(unique)]
    pub session_id: String,

    /// Submitted month, stored as given even when outside 1..=12
    pub birth_month: i32,

    pub zodiac_sign: Option<String>,

    pub spirit_animal: Option<String>,

    pub spirit_animal_emoji: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub quote: Option<String>,

    pub author: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub prediction: Option<String>,

    pub good_point1: Option<String>,

    pub good_point2: Option<String>,

    pub good_point3: Option<String>,

    pub good_point4: Option<String>,

    pub has_photo: bool,

    pub location_available: bool,

    pub device_type: Option<String>,

    pub browser: Option<String>,

    /// Filled by the column default at insert time
    #[serde(with = "crate::timestamps::stored")]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
