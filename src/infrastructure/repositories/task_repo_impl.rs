// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::task::{ExistingTask, Priority, PriorityChange, Task};
use crate::domain::repositories::repository::RepositoryError;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::infrastructure::database::entities::task as task_entity;
use crate::infrastructure::repositories::sea_orm_repository::{Record, SeaOrmRepository};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, SimpleExpr},
    ActiveValue::NotSet, ColumnTrait, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

/// 任务仓库实现
///
/// 基于通用 sea-orm 仓库，增加投影读取与批量优先级更新
pub type TaskRepositoryImpl = SeaOrmRepository<Task>;

impl From<task_entity::Model> for Task {
    fn from(model: task_entity::Model) -> Self {
        Self {
            sequence: model.id,
            task_id: model.task_id,
            owner_id: model.owner_id,
            property_id: model.property_id,
            worker_id: model.worker_id,
            name: model.name,
            category: model.category,
            priority: stored_priority(&model.priority, model.task_id),
            take_precedence: model.take_precedence,
            details: model.details,
            notes: model.notes,
            scheduled_at: model.scheduled_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            paused_at: model.paused_at,
            paused_reason: model.paused_reason,
            failed_at: model.failed_at,
            failed_reason: model.failed_reason,
            estimated_cost: model.estimated_cost,
            actual_cost: model.actual_cost,
            profit: model.profit,
            image: model.image,
        }
    }
}

/// 解析存储的优先级，无法识别的值按默认优先级读取并记录告警
fn stored_priority(raw: &str, task_id: Uuid) -> Priority {
    match raw.parse() {
        Ok(priority) => priority,
        Err(e) => {
            warn!(task_id = %task_id, priority = raw, error = %e, "Unrecognised stored task priority");
            Priority::default()
        }
    }
}

impl Record for Task {
    type Entity = task_entity::Entity;
    type ActiveModel = task_entity::ActiveModel;

    const MODEL: &'static str = "task";

    fn identifier_column() -> task_entity::Column {
        task_entity::Column::TaskId
    }

    fn owner_column() -> task_entity::Column {
        task_entity::Column::OwnerId
    }

    fn sequence_column() -> task_entity::Column {
        task_entity::Column::Id
    }

    fn identifier(&self) -> Uuid {
        self.task_id
    }

    fn from_model(model: task_entity::Model) -> Self {
        model.into()
    }

    fn insert_model(&self) -> task_entity::ActiveModel {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let mut active = self.update_model();
        active.task_id = Set(self.task_id);
        active.owner_id = Set(self.owner_id);
        active.property_id = Set(self.property_id);
        active.created_at = Set(now);
        active.updated_at = Set(now);
        active
    }

    fn update_model(&self) -> task_entity::ActiveModel {
        task_entity::ActiveModel {
            id: NotSet,
            task_id: NotSet,
            owner_id: NotSet,
            property_id: NotSet,
            worker_id: Set(self.worker_id),
            name: Set(self.name.clone()),
            category: Set(self.category.clone()),
            priority: Set(self.priority.to_string()),
            take_precedence: Set(self.take_precedence),
            details: Set(self.details.clone()),
            notes: Set(self.notes.clone()),
            scheduled_at: Set(self.scheduled_at),
            started_at: Set(self.started_at),
            completed_at: Set(self.completed_at),
            paused_at: Set(self.paused_at),
            paused_reason: Set(self.paused_reason.clone()),
            failed_at: Set(self.failed_at),
            failed_reason: Set(self.failed_reason.clone()),
            estimated_cost: Set(self.estimated_cost),
            actual_cost: Set(self.actual_cost),
            profit: Set(self.profit),
            image: Set(self.image.clone()),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ExistingRow {
    owner_id: Uuid,
    property_id: Uuid,
    image: Option<String>,
    scheduled_at: Option<DateTime<FixedOffset>>,
    started_at: Option<DateTime<FixedOffset>>,
    completed_at: Option<DateTime<FixedOffset>>,
    paused_at: Option<DateTime<FixedOffset>>,
    failed_at: Option<DateTime<FixedOffset>>,
}

impl From<ExistingRow> for ExistingTask {
    fn from(row: ExistingRow) -> Self {
        Self {
            owner_id: row.owner_id,
            property_id: row.property_id,
            image: row.image,
            scheduled_at: row.scheduled_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            paused_at: row.paused_at,
            failed_at: row.failed_at,
        }
    }
}

#[async_trait]
impl TaskRepository for SeaOrmRepository<Task> {
    async fn fetch_existing(&self, task_id: Uuid) -> Result<ExistingTask, RepositoryError> {
        let row = task_entity::Entity::find()
            .select_only()
            .columns([
                task_entity::Column::OwnerId,
                task_entity::Column::PropertyId,
                task_entity::Column::Image,
                task_entity::Column::ScheduledAt,
                task_entity::Column::StartedAt,
                task_entity::Column::CompletedAt,
                task_entity::Column::PausedAt,
                task_entity::Column::FailedAt,
            ])
            .filter(task_entity::Column::TaskId.eq(task_id))
            .into_model::<ExistingRow>()
            .one(self.store().connection())
            .await
            .map_err(|e| RepositoryError::FetchFailed {
                model: Task::MODEL,
                source: e,
            })?;

        row.map(ExistingTask::from)
            .ok_or_else(|| RepositoryError::NoResults {
                shape: "existing task",
                identifier: task_id.to_string(),
            })
    }

    async fn update_priorities(
        &self,
        changes: &[PriorityChange],
    ) -> Result<Vec<Task>, RepositoryError> {
        // the last change for a repeated task id wins
        let mut order: Vec<Uuid> = Vec::with_capacity(changes.len());
        let mut latest: HashMap<Uuid, Priority> = HashMap::with_capacity(changes.len());
        for change in changes {
            if latest.insert(change.task_id, change.priority).is_none() {
                order.push(change.task_id);
            }
        }

        let Some(first) = order.first().copied() else {
            return Ok(Vec::new());
        };

        let then = |id: &Uuid| latest.get(id).copied().unwrap_or_default().to_string();
        let case = order.iter().skip(1).fold(
            Expr::case(
                Expr::col(task_entity::Column::TaskId).eq(first),
                then(&first),
            ),
            |case, id| case.case(Expr::col(task_entity::Column::TaskId).eq(*id), then(id)),
        );
        let priority_expr: SimpleExpr = case.finally(Expr::col(task_entity::Column::Priority)).into();
        let now: DateTime<FixedOffset> = Utc::now().into();

        let txn = self.store().begin().await?;
        let outcome = async {
            let result = task_entity::Entity::update_many()
                .col_expr(task_entity::Column::Priority, priority_expr)
                .col_expr(task_entity::Column::UpdatedAt, Expr::value(now))
                .filter(task_entity::Column::TaskId.is_in(order.clone()))
                .exec(&txn)
                .await
                .map_err(|e| RepositoryError::UpdateFailed {
                    model: Task::MODEL,
                    source: e,
                })?;

            if result.rows_affected != order.len() as u64 {
                let found: HashSet<Uuid> = task_entity::Entity::find()
                    .select_only()
                    .column(task_entity::Column::TaskId)
                    .filter(task_entity::Column::TaskId.is_in(order.clone()))
                    .into_tuple::<Uuid>()
                    .all(&txn)
                    .await
                    .map_err(|e| RepositoryError::FetchFailed {
                        model: Task::MODEL,
                        source: e,
                    })?
                    .into_iter()
                    .collect();
                let missing: Vec<String> = order
                    .iter()
                    .filter(|id| !found.contains(*id))
                    .map(Uuid::to_string)
                    .collect();

                debug!(
                    expected = order.len(),
                    updated = result.rows_affected,
                    missing = ?missing,
                    "Bulk priority update names unknown tasks"
                );
                if missing.is_empty() {
                    return Err(RepositoryError::UpdateFailed {
                        model: Task::MODEL,
                        source: DbErr::RecordNotUpdated,
                    });
                }
                return Err(RepositoryError::NoResults {
                    shape: Task::MODEL,
                    identifier: missing.join(","),
                });
            }

            let models = task_entity::Entity::find()
                .filter(task_entity::Column::TaskId.is_in(order.clone()))
                .order_by_asc(task_entity::Column::Id)
                .all(&txn)
                .await
                .map_err(|e| RepositoryError::FetchFailed {
                    model: Task::MODEL,
                    source: e,
                })?;

            Ok(models.into_iter().map(Task::from).collect::<Vec<_>>())
        }
        .await;

        let updated = self.store().settle(Task::MODEL, txn, outcome).await?;
        debug!(count = updated.len(), "Bulk priority update committed");
        Ok(updated)
    }
}
