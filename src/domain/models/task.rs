// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 维护任务实体
///
/// 表示出租人为某处房产委托的一项维护或服务工作，可以分配给工人。
/// 任务的生命周期状态不单独存储，而是由各个时间戳字段推导得出，
/// 参见 [`TaskState`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// 存储层分配的内部序号，不对外暴露
    #[serde(skip)]
    pub sequence: i64,
    /// 对外可见的任务唯一标识符，创建时生成且永不复用
    pub task_id: Uuid,
    /// 出租人（所有者）ID，创建后不可变
    pub owner_id: Uuid,
    /// 任务所属房产ID，创建后不可变
    pub property_id: Uuid,
    /// 被分配的工人ID
    pub worker_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub priority: Priority,
    pub take_precedence: bool,
    pub details: String,
    pub notes: String,
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
    /// 附件的相对键（`{时间戳}-{文件名}`），不含所有者/对象前缀
    pub image: Option<String>,
}

/// 任务优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Immediate,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Immediate => write!(f, "immediate"),
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "immediate" => Ok(Priority::Immediate),
            other => Err(DomainError::ValidationError(format!(
                "unknown priority level: {}",
                other
            ))),
        }
    }
}

/// 任务生命周期状态
///
/// 由时间戳推导，状态转换遵循以下流程：
/// Draft → Scheduled → Assigned ⇄ Paused → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// 草稿，尚未排期
    Draft,
    /// 已排期，尚未分配
    Scheduled,
    /// 已分配给工人并开始
    Assigned,
    /// 已暂停
    Paused,
    /// 已完成（终态）
    Completed,
    /// 已失败（终态）
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskState::Draft => write!(f, "draft"),
            TaskState::Scheduled => write!(f, "scheduled"),
            TaskState::Assigned => write!(f, "assigned"),
            TaskState::Paused => write!(f, "paused"),
            TaskState::Completed => write!(f, "completed"),
            TaskState::Failed => write!(f, "failed"),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 当前状态不允许该转换
    #[error("cannot {action} a task in state {state}")]
    InvalidStateTransition {
        action: &'static str,
        state: TaskState,
    },

    /// 输入数据不符合领域规则
    #[error("Validation error: {0}")]
    ValidationError(String),
}

fn now() -> DateTime<FixedOffset> {
    Utc::now().into()
}

impl Task {
    /// 创建一个新的草稿任务
    ///
    /// # 参数
    ///
    /// * `owner_id` - 出租人ID
    /// * `property_id` - 房产ID
    /// * `name` - 任务名称
    ///
    /// # 返回值
    ///
    /// 返回带有新生成任务ID的任务实例，尚未持久化
    pub fn new(owner_id: Uuid, property_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            sequence: 0,
            task_id: Uuid::new_v4(),
            owner_id,
            property_id,
            worker_id: None,
            name: name.into(),
            category: String::new(),
            priority: Priority::default(),
            take_precedence: false,
            details: String::new(),
            notes: String::new(),
            scheduled_at: None,
            started_at: None,
            completed_at: None,
            paused_at: None,
            paused_reason: None,
            failed_at: None,
            failed_reason: None,
            estimated_cost: 0.0,
            actual_cost: 0.0,
            profit: 0.0,
            image: None,
        }
    }

    /// 根据时间戳推导当前状态
    pub fn state(&self) -> TaskState {
        if self.failed_at.is_some() {
            TaskState::Failed
        } else if self.completed_at.is_some() {
            TaskState::Completed
        } else if self.paused_at.is_some() {
            TaskState::Paused
        } else if self.worker_id.is_some() && self.started_at.is_some() {
            TaskState::Assigned
        } else if self.scheduled_at.is_some() {
            TaskState::Scheduled
        } else {
            TaskState::Draft
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// 分配任务
    ///
    /// 设置工人ID并将 `started_at` 置为当前时间。终态或暂停中的任务不能分配。
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 已分配的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn assign(mut self, worker_id: Uuid) -> Result<Self, DomainError> {
        if worker_id.is_nil() {
            return Err(DomainError::ValidationError(
                "worker id is required".to_string(),
            ));
        }
        match self.state() {
            TaskState::Draft | TaskState::Scheduled | TaskState::Assigned => {
                self.worker_id = Some(worker_id);
                self.started_at = Some(now());
                Ok(self)
            }
            state => Err(DomainError::InvalidStateTransition {
                action: "assign",
                state,
            }),
        }
    }

    /// 暂停任务
    ///
    /// 仅已分配且未暂停的任务可以暂停，必须提供暂停原因。
    pub fn pause(mut self, reason: impl Into<String>) -> Result<Self, DomainError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "paused reason is required".to_string(),
            ));
        }
        match self.state() {
            TaskState::Assigned => {
                self.paused_at = Some(now());
                self.paused_reason = Some(reason);
                Ok(self)
            }
            state => Err(DomainError::InvalidStateTransition {
                action: "pause",
                state,
            }),
        }
    }

    /// 恢复任务
    ///
    /// 清空 `paused_at` 与暂停原因，并重新设置 `started_at`。
    pub fn unpause(mut self) -> Result<Self, DomainError> {
        match self.state() {
            TaskState::Paused => {
                self.paused_at = None;
                self.paused_reason = None;
                self.started_at = Some(now());
                Ok(self)
            }
            state => Err(DomainError::InvalidStateTransition {
                action: "unpause",
                state,
            }),
        }
    }

    /// 完成任务
    ///
    /// 已分配或暂停中的任务可以完成，完成时清除暂停标记。
    pub fn complete(mut self) -> Result<Self, DomainError> {
        match self.state() {
            TaskState::Assigned | TaskState::Paused => {
                self.completed_at = Some(now());
                self.paused_at = None;
                self.paused_reason = None;
                Ok(self)
            }
            state => Err(DomainError::InvalidStateTransition {
                action: "complete",
                state,
            }),
        }
    }

    /// 修改优先级，任何状态下都允许，且不触碰其他字段
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// 校验任务不变量
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.task_id.is_nil() {
            return Err(DomainError::ValidationError(
                "task id is required".to_string(),
            ));
        }
        if self.owner_id.is_nil() {
            return Err(DomainError::ValidationError(
                "owner id is required".to_string(),
            ));
        }
        if self.property_id.is_nil() {
            return Err(DomainError::ValidationError(
                "property id is required".to_string(),
            ));
        }
        if self.completed_at.is_some() && self.failed_at.is_some() {
            return Err(DomainError::ValidationError(
                "a task cannot be both completed and failed".to_string(),
            ));
        }
        if self.paused_at.is_some() {
            if self.started_at.is_none() {
                return Err(DomainError::ValidationError(
                    "a task cannot be paused before it is started".to_string(),
                ));
            }
            if self.completed_at.is_some() || self.failed_at.is_some() {
                return Err(DomainError::ValidationError(
                    "a finished task cannot be paused".to_string(),
                ));
            }
            if blank(&self.paused_reason) {
                return Err(DomainError::ValidationError(
                    "paused reason is required".to_string(),
                ));
            }
        }
        if self.failed_at.is_some() && blank(&self.failed_reason) {
            return Err(DomainError::ValidationError(
                "failed reason is required".to_string(),
            ));
        }
        Ok(())
    }

    /// 判断两个任务的生命周期时间戳是否一致
    pub fn same_lifecycle(&self, other: &ExistingTask) -> bool {
        self.scheduled_at == other.scheduled_at
            && self.started_at == other.started_at
            && self.completed_at == other.completed_at
            && self.paused_at == other.paused_at
            && self.failed_at == other.failed_at
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

/// 任务的部分投影
///
/// 修改任务前读取的最小列集合，用于保留不可变列、合并已有附件键和判断终态。
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingTask {
    pub owner_id: Uuid,
    pub property_id: Uuid,
    pub image: Option<String>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub started_at: Option<DateTime<FixedOffset>>,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub paused_at: Option<DateTime<FixedOffset>>,
    pub failed_at: Option<DateTime<FixedOffset>>,
}

impl ExistingTask {
    /// 已存储的终态，非终态时返回 `None`
    pub fn terminal_state(&self) -> Option<TaskState> {
        if self.failed_at.is_some() {
            Some(TaskState::Failed)
        } else if self.completed_at.is_some() {
            Some(TaskState::Completed)
        } else {
            None
        }
    }
}

/// 单条优先级变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityChange {
    pub task_id: Uuid,
    pub priority: Priority,
}
