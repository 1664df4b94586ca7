// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::models::task::{Priority, PriorityChange, Task};

fn validate_not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::new("nil_uuid"));
    }
    Ok(())
}

/// 创建任务请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(custom(function = "validate_not_nil"))]
    pub owner_id: Uuid,
    #[validate(custom(function = "validate_not_nil"))]
    pub property_id: Uuid,
    pub worker_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub take_precedence: bool,
    #[validate(length(min = 1, max = 255))]
    pub details: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub notes: String,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub estimated_cost: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub actual_cost: f64,
}

impl TaskRequest {
    /// 构造新任务，生成新的任务ID
    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.owner_id, self.property_id, self.name);
        task.worker_id = self.worker_id;
        task.category = self.category;
        task.priority = self.priority;
        task.take_precedence = self.take_precedence;
        task.details = self.details;
        task.notes = self.notes;
        task.scheduled_at = self.scheduled_at;
        task.estimated_cost = self.estimated_cost;
        task.actual_cost = self.actual_cost;
        task
    }
}

/// 修改任务请求
///
/// 通用修改路径，调用方提供完整的任务值。所有者与房产不可变，
/// 由服务层用已存储的值覆盖；附件键同样由服务层决定。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskModRequest {
    #[validate(custom(function = "validate_not_nil"))]
    pub task_id: Uuid,
    pub worker_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub take_precedence: bool,
    #[validate(length(min = 1, max = 255))]
    pub details: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub notes: String,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub paused_at: Option<DateTime<FixedOffset>>,
    #[validate(length(max = 255))]
    pub paused_reason: Option<String>,
    pub failed_at: Option<DateTime<FixedOffset>>,
    #[validate(length(max = 255))]
    pub failed_reason: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub estimated_cost: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub actual_cost: f64,
    #[serde(default)]
    pub profit: f64,
}

impl TaskModRequest {
    /// 以已存储的所有者与房产构造完整任务值
    pub fn into_task(self, owner_id: Uuid, property_id: Uuid) -> Task {
        Task {
            sequence: 0,
            task_id: self.task_id,
            owner_id,
            property_id,
            worker_id: self.worker_id,
            name: self.name,
            category: self.category,
            priority: self.priority,
            take_precedence: self.take_precedence,
            details: self.details,
            notes: self.notes,
            scheduled_at: self.scheduled_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
            paused_at: self.paused_at,
            paused_reason: self.paused_reason,
            failed_at: self.failed_at,
            failed_reason: self.failed_reason,
            estimated_cost: self.estimated_cost,
            actual_cost: self.actual_cost,
            profit: self.profit,
            image: None,
        }
    }
}

/// 分配任务请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    #[validate(custom(function = "validate_not_nil"))]
    pub worker_id: Uuid,
}

/// 暂停任务请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PauseTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
}

/// 单个任务优先级修改请求
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityRequest {
    pub priority: Priority,
}

/// 批量优先级修改中的单个元素
///
/// 元素可以是部分任务值，除任务ID与优先级外的字段被忽略。
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityChangeRequest {
    pub task_id: Uuid,
    pub priority: Priority,
}

impl From<PriorityChangeRequest> for PriorityChange {
    fn from(req: PriorityChangeRequest) -> Self {
        Self {
            task_id: req.task_id,
            priority: req.priority,
        }
    }
}
