// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use crate::domain::models::worker::Worker;
use crate::infrastructure::database::entities::worker as worker_entity;
use crate::infrastructure::repositories::sea_orm_repository::{Record, SeaOrmRepository};

/// 工人仓库实现
pub type WorkerRepositoryImpl = SeaOrmRepository<Worker>;

impl From<worker_entity::Model> for Worker {
    fn from(model: worker_entity::Model) -> Self {
        Self {
            sequence: model.id,
            worker_id: model.worker_id,
            owner_id: model.owner_id,
            title: model.title,
            specialization: model.specialization,
            pay_rate: model.pay_rate,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }
}

impl Record for Worker {
    type Entity = worker_entity::Entity;
    type ActiveModel = worker_entity::ActiveModel;

    const MODEL: &'static str = "worker";

    fn identifier_column() -> worker_entity::Column {
        worker_entity::Column::WorkerId
    }

    fn owner_column() -> worker_entity::Column {
        worker_entity::Column::OwnerId
    }

    fn sequence_column() -> worker_entity::Column {
        worker_entity::Column::Id
    }

    fn identifier(&self) -> Uuid {
        self.worker_id
    }

    fn from_model(model: worker_entity::Model) -> Self {
        model.into()
    }

    fn insert_model(&self) -> worker_entity::ActiveModel {
        let mut active = self.update_model();
        active.worker_id = Set(self.worker_id);
        active.owner_id = Set(self.owner_id);
        active
    }

    fn update_model(&self) -> worker_entity::ActiveModel {
        worker_entity::ActiveModel {
            id: NotSet,
            worker_id: NotSet,
            owner_id: NotSet,
            title: Set(self.title.clone()),
            specialization: Set(self.specialization.clone()),
            pay_rate: Set(self.pay_rate),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
        }
    }
}
