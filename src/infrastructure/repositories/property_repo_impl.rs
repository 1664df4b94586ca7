// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use crate::domain::models::property::Property;
use crate::infrastructure::database::entities::property as property_entity;
use crate::infrastructure::repositories::sea_orm_repository::{Record, SeaOrmRepository};

/// 房产仓库实现
pub type PropertyRepositoryImpl = SeaOrmRepository<Property>;

impl From<property_entity::Model> for Property {
    fn from(model: property_entity::Model) -> Self {
        Self {
            sequence: model.id,
            property_id: model.property_id,
            owner_id: model.owner_id,
            address: model.address,
            bedrooms: model.bedrooms,
            baths: model.baths,
            square_footage: model.square_footage,
            is_available: model.is_available,
            status: model.status.parse().unwrap_or_default(),
            notes: model.notes,
            image: model.image,
            tax_rate: model.tax_rate,
            tax_amount_due: model.tax_amount_due,
            max_occupancy: model.max_occupancy,
        }
    }
}

impl Record for Property {
    type Entity = property_entity::Entity;
    type ActiveModel = property_entity::ActiveModel;

    const MODEL: &'static str = "property";

    fn identifier_column() -> property_entity::Column {
        property_entity::Column::PropertyId
    }

    fn owner_column() -> property_entity::Column {
        property_entity::Column::OwnerId
    }

    fn sequence_column() -> property_entity::Column {
        property_entity::Column::Id
    }

    fn identifier(&self) -> Uuid {
        self.property_id
    }

    fn from_model(model: property_entity::Model) -> Self {
        model.into()
    }

    fn insert_model(&self) -> property_entity::ActiveModel {
        let mut active = self.update_model();
        active.property_id = Set(self.property_id);
        active.owner_id = Set(self.owner_id);
        active
    }

    fn update_model(&self) -> property_entity::ActiveModel {
        property_entity::ActiveModel {
            id: NotSet,
            property_id: NotSet,
            owner_id: NotSet,
            address: Set(self.address.clone()),
            bedrooms: Set(self.bedrooms),
            baths: Set(self.baths),
            square_footage: Set(self.square_footage),
            is_available: Set(self.is_available),
            status: Set(self.status.to_string()),
            notes: Set(self.notes.clone()),
            image: Set(self.image.clone()),
            tax_rate: Set(self.tax_rate),
            tax_amount_due: Set(self.tax_amount_due),
            max_occupancy: Set(self.max_occupancy),
        }
    }
}
