// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub task_id: Uuid,
    pub owner_id: Uuid,
    pub property_id: Uuid,
    pub worker_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub priority: String,
    pub take_precedence: bool,
    pub details: String,
    pub notes: String,
    pub scheduled_at: Option<ChronoDateTimeWithTimeZone>,
    pub started_at: Option<ChronoDateTimeWithTimeZone>,
    pub completed_at: Option<ChronoDateTimeWithTimeZone>,
    pub paused_at: Option<ChronoDateTimeWithTimeZone>,
    pub paused_reason: Option<String>,
    pub failed_at: Option<ChronoDateTimeWithTimeZone>,
    pub failed_reason: Option<String>,
    pub estimated_cost: f64,
    pub actual_cost: f64,
    pub profit: f64,
    pub image: Option<String>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
