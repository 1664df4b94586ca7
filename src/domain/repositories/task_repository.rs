// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{ExistingTask, PriorityChange, Task};
use crate::domain::repositories::repository::{Repository, RepositoryError};
use async_trait::async_trait;
use uuid::Uuid;

/// 任务仓库特质
///
/// 在通用仓库能力之上增加任务特有的部分投影读取和批量优先级更新。
#[async_trait]
pub trait TaskRepository: Repository<Task> {
    /// 读取修改任务前需要合并的列（附件键与生命周期时间戳）
    async fn fetch_existing(&self, task_id: Uuid) -> Result<ExistingTask, RepositoryError>;

    /// 批量更新优先级
    ///
    /// 所有变更在一个事务内以单条集合更新语句执行，
    /// 任何一行未能更新都会回滚整批。
    ///
    /// # 返回值
    ///
    /// 返回更新后的完整任务行
    async fn update_priorities(
        &self,
        changes: &[PriorityChange],
    ) -> Result<Vec<Task>, RepositoryError>;
}
