// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::task::{Priority, Task, TaskState};

/// 任务响应
///
/// 附件只以签名URL的形式返回，存储中的相对键不对外暴露。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task_id: Uuid,
    pub owner_id: Uuid,
    pub property_id: Uuid,
    pub worker_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub priority: Priority,
    pub take_precedence: bool,
    pub details: String,
    pub notes: String,
    pub state: TaskState,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub paused_at: Option<DateTime<FixedOffset>>,
    pub paused_reason: Option<String>,
    pub failed_at: Option<DateTime<FixedOffset>>,
    pub failed_reason: Option<String>,
    pub estimated_cost: f64,
    pub actual_cost: f64,
    pub profit: f64,
    pub image_url: Option<String>,
}

impl TaskResponse {
    pub fn new(task: Task, image_url: Option<String>) -> Self {
        let state = task.state();
        Self {
            task_id: task.task_id,
            owner_id: task.owner_id,
            property_id: task.property_id,
            worker_id: task.worker_id,
            name: task.name,
            category: task.category,
            priority: task.priority,
            take_precedence: task.take_precedence,
            details: task.details,
            notes: task.notes,
            state,
            scheduled_at: task.scheduled_at,
            started_at: task.started_at,
            completed_at: task.completed_at,
            paused_at: task.paused_at,
            paused_reason: task.paused_reason,
            failed_at: task.failed_at,
            failed_reason: task.failed_reason,
            estimated_cost: task.estimated_cost,
            actual_cost: task.actual_cost,
            profit: task.profit,
            image_url,
        }
    }
}
