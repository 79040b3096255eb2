// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Uuid,
    pub room_id: Uuid,
    pub title: String,
    pub description_steps: Json,
    pub category: String,
    pub priority: i32,
    pub estimated_minutes: i32,
    pub actual_minutes: Option<i32>,
    pub difficulty: i32,
    pub supplies: Json,
    pub safety_notes: Json,
    pub status: String,
    pub assignee_id: Option<Uuid>,
    pub sort_order: i32,
    pub started_at: Option<ChronoDateTimeWithTimeZone>,
    pub completed_at: Option<ChronoDateTimeWithTimeZone>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Plan,
    #[sea_orm(has_many = "super::task_event::Entity")]
    TaskEvents,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::task_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
