// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub address: Json,
    pub bedrooms: f64,
    pub baths: f64,
    pub square_footage: f64,
    pub is_available: bool,
    pub status: String,
    pub notes: String,
    pub image: Option<String>,
    pub tax_rate: f64,
    pub tax_amount_due: f64,
    pub max_occupancy: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
