// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::task_request::{
    AssignTaskRequest, PauseTaskRequest, PriorityChangeRequest, PriorityRequest, TaskModRequest,
    TaskRequest,
};
use crate::application::dto::task_response::TaskResponse;
use crate::domain::models::attachment::{AttachmentError, FileUpload};
use crate::domain::models::filter::{Filter, FilterError};
use crate::domain::models::task::{DomainError, PriorityChange, Task};
use crate::domain::repositories::repository::RepositoryError;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::file_store::FileStore;
use crate::infrastructure::metrics::{ATTACHMENT_FAILURES, TASK_TRANSITIONS};

/// 任务服务错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 请求未通过校验
    #[error("invalid {request} request: {reason}")]
    InvalidRequest {
        request: &'static str,
        reason: String,
    },

    /// 领域规则拒绝（非法状态转换、不变量被破坏）
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// 关系存储失败或未找到
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// 对象存储失败
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    /// 反序列化边界上收到形状错误的数据
    #[error("unexpected data: wanted {wanted}, got {got}")]
    UnexpectedData { wanted: &'static str, got: String },
}

impl ServiceError {
    fn invalid(request: &'static str, err: impl std::fmt::Display) -> Self {
        ServiceError::InvalidRequest {
            request,
            reason: err.to_string(),
        }
    }
}

/// 任务生命周期服务
///
/// 组合任务仓库与附件存储，实现创建、分配、暂停、恢复、完成、
/// 修改、优先级调整与删除。每次转换都是对整行的读取-替换。
pub struct TaskService<R: TaskRepository> {
    /// 任务仓库
    repo: Arc<R>,
    /// 任务附件存储
    files: Arc<FileStore>,
}

impl<R: TaskRepository> TaskService<R> {
    /// 创建新的任务服务实例
    ///
    /// # 参数
    ///
    /// * `repo` - 任务仓库实例
    /// * `files` - 任务类别的附件存储
    pub fn new(repo: Arc<R>, files: Arc<FileStore>) -> Self {
        Self { repo, files }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// 创建任务
    ///
    /// 生成新的任务ID，若带有附件则先上传，再插入任务行。
    /// 两次写入不在同一事务内：插入失败时尽力删除刚上传的对象。
    ///
    /// # 参数
    ///
    /// * `request` - 已解析的创建请求
    /// * `file` - 可选的附件
    ///
    /// # 返回值
    ///
    /// * `Ok(TaskResponse)` - 已持久化的任务
    /// * `Err(ServiceError)` - 校验、上传或插入失败
    pub async fn create_task(
        &self,
        request: TaskRequest,
        file: Option<FileUpload>,
    ) -> Result<TaskResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::invalid("create", e))?;

        let mut task = request.into_task();
        task.validate()?;

        let uploaded = self.upload(&task, file.as_ref()).await?;
        if uploaded.is_some() {
            task.image = uploaded.clone();
        }

        let saved = match self.repo.insert(&task).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(task_id = %task.task_id, owner_id = %task.owner_id, error = %e, "Failed to insert task");
                self.discard(&task, uploaded.as_deref()).await;
                return Err(e.into());
            }
        };

        counter!(TASK_TRANSITIONS, "action" => "create").increment(1);
        info!(task_id = %saved.task_id, owner_id = %saved.owner_id, "Task created");
        Ok(self.respond(saved).await)
    }

    /// 读取单个任务
    ///
    /// 未找到时返回 `Ok(None)`；存在附件键时附带签名URL。
    pub async fn get_task(&self, filter: &Filter) -> Result<Option<TaskResponse>, ServiceError> {
        let task = match self.repo.fetch(filter).await {
            Ok(task) => task,
            Err(e) if e.is_no_results() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let url = match task.image.as_deref() {
            Some(image) => Some(self.files.get(task.owner_id, task.task_id, image).await?),
            None => None,
        };
        Ok(Some(TaskResponse::new(task, url)))
    }

    /// 分页读取任务，过滤器标识符为所有者ID
    ///
    /// 每个所有者只列举一次附件，并按 `prefix/image` 匹配到各任务。
    pub async fn get_tasks(&self, filter: &Filter) -> Result<Vec<TaskResponse>, ServiceError> {
        let tasks = self.repo.fetch_all(filter).await?;
        self.respond_all(tasks).await
    }

    /// 通用修改路径
    ///
    /// 先读取已存储的投影：所有者与房产保持不变，没有新附件时保留原附件键。
    /// 终态任务不允许修改任何生命周期时间戳；`failed_at`/`failed_reason`
    /// 只能通过该路径设置。
    pub async fn modify_task(
        &self,
        request: TaskModRequest,
        file: Option<FileUpload>,
    ) -> Result<TaskResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::invalid("update", e))?;

        let existing = self.repo.fetch_existing(request.task_id).await?;
        let mut task = request.into_task(existing.owner_id, existing.property_id);

        if let Some(state) = existing.terminal_state() {
            if !task.same_lifecycle(&existing) {
                return Err(DomainError::InvalidStateTransition {
                    action: "modify",
                    state,
                }
                .into());
            }
        }
        task.validate()?;

        let uploaded = self.upload(&task, file.as_ref()).await?;
        task.image = uploaded.clone().or_else(|| existing.image.clone());

        let saved = match self.repo.update(&task).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(task_id = %task.task_id, error = %e, "Failed to update task");
                self.discard(&task, uploaded.as_deref()).await;
                return Err(e.into());
            }
        };

        if uploaded.is_some() {
            if let Some(previous) = existing.image.as_deref() {
                self.discard(&saved, Some(previous)).await;
            }
        }

        counter!(TASK_TRANSITIONS, "action" => "modify").increment(1);
        info!(task_id = %saved.task_id, state = %saved.state(), "Task modified");
        Ok(self.respond(saved).await)
    }

    /// 分配任务给工人，不校验工人是否存在
    pub async fn assign_task(
        &self,
        task_id: Uuid,
        request: AssignTaskRequest,
    ) -> Result<TaskResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::invalid("assign", e))?;
        self.transition(task_id, "assign", |task| task.assign(request.worker_id))
            .await
    }

    pub async fn pause_task(
        &self,
        task_id: Uuid,
        request: PauseTaskRequest,
    ) -> Result<TaskResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::invalid("pause", e))?;
        self.transition(task_id, "pause", |task| task.pause(request.reason))
            .await
    }

    pub async fn unpause_task(&self, task_id: Uuid) -> Result<TaskResponse, ServiceError> {
        self.transition(task_id, "unpause", Task::unpause).await
    }

    pub async fn complete_task(&self, task_id: Uuid) -> Result<TaskResponse, ServiceError> {
        self.transition(task_id, "complete", Task::complete).await
    }

    /// 修改单个任务的优先级，其他字段保持不变
    pub async fn reprioritize(
        &self,
        task_id: Uuid,
        request: PriorityRequest,
    ) -> Result<TaskResponse, ServiceError> {
        self.transition(task_id, "reprioritize", |task| {
            Ok(task.with_priority(request.priority))
        })
        .await
    }

    /// 批量修改优先级
    ///
    /// 在任何写入之前检查每个元素的形状，任一元素不合法则整批失败。
    /// 合法的批次以单条集合更新语句在一个事务内执行。
    pub async fn bulk_reprioritize(
        &self,
        payloads: Vec<serde_json::Value>,
    ) -> Result<Vec<TaskResponse>, ServiceError> {
        let mut changes = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let change: PriorityChangeRequest = serde_json::from_value(payload.clone())
                .map_err(|e| {
                    warn!(payload = %payload, error = %e, "Rejected bulk priority element");
                    ServiceError::UnexpectedData {
                        wanted: "PriorityChangeRequest",
                        got: payload.to_string(),
                    }
                })?;
            if change.task_id.is_nil() {
                return Err(ServiceError::invalid("bulk priority", "task id is required"));
            }
            changes.push(PriorityChange::from(change));
        }

        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let updated = self.repo.update_priorities(&changes).await?;
        counter!(TASK_TRANSITIONS, "action" => "bulk_reprioritize").increment(updated.len() as u64);
        info!(count = updated.len(), "Task priorities updated");
        self.respond_all(updated).await
    }

    /// 删除任务
    ///
    /// 无条件删除，不检查生命周期状态；随后尽力删除其附件。
    pub async fn delete_task(&self, task_id: Uuid) -> Result<(), ServiceError> {
        if task_id.is_nil() {
            return Err(ServiceError::invalid("delete", "task id is required"));
        }

        let existing = self.repo.fetch_existing(task_id).await?;
        self.repo.delete(task_id).await?;

        if let Some(image) = existing.image.as_deref() {
            if let Err(e) = self.files.remove(existing.owner_id, task_id, image).await {
                counter!(ATTACHMENT_FAILURES, "operation" => "delete").increment(1);
                warn!(task_id = %task_id, error = %e, "Failed to remove attachment of deleted task");
            }
        }

        counter!(TASK_TRANSITIONS, "action" => "delete").increment(1);
        info!(task_id = %task_id, "Task deleted");
        Ok(())
    }

    async fn transition<F>(
        &self,
        task_id: Uuid,
        action: &'static str,
        apply: F,
    ) -> Result<TaskResponse, ServiceError>
    where
        F: FnOnce(Task) -> Result<Task, DomainError> + Send,
    {
        if task_id.is_nil() {
            return Err(ServiceError::invalid(action, "task id is required"));
        }

        let task = self
            .repo
            .fetch(&Filter::by_identifier(task_id.to_string()))
            .await?;
        let from = task.state();

        let next = apply(task).map_err(|e| {
            debug!(task_id = %task_id, action, error = %e, "Transition rejected");
            e
        })?;
        next.validate()?;

        let saved = self.repo.update(&next).await?;
        counter!(TASK_TRANSITIONS, "action" => action).increment(1);
        info!(task_id = %task_id, action, from = %from, to = %saved.state(), "Task transitioned");
        Ok(self.respond(saved).await)
    }

    async fn upload(
        &self,
        task: &Task,
        file: Option<&FileUpload>,
    ) -> Result<Option<String>, ServiceError> {
        let Some(file) = file else {
            return Ok(None);
        };
        match self.files.upload(task.owner_id, task.task_id, file).await {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                counter!(ATTACHMENT_FAILURES, "operation" => "upload").increment(1);
                error!(task_id = %task.task_id, owner_id = %task.owner_id, error = %e, "Failed to upload task attachment");
                Err(e.into())
            }
        }
    }

    async fn discard(&self, task: &Task, relative_key: Option<&str>) {
        let Some(key) = relative_key else {
            return;
        };
        if let Err(e) = self.files.remove(task.owner_id, task.task_id, key).await {
            counter!(ATTACHMENT_FAILURES, "operation" => "delete").increment(1);
            warn!(task_id = %task.task_id, key, error = %e, "Failed to remove orphaned attachment");
        }
    }

    /// 写操作之后的响应：行已提交，签名失败只记录日志
    async fn respond(&self, task: Task) -> TaskResponse {
        let url = match task.image.as_deref() {
            Some(image) => match self.files.get(task.owner_id, task.task_id, image).await {
                Ok(url) => Some(url),
                Err(e) => {
                    counter!(ATTACHMENT_FAILURES, "operation" => "get").increment(1);
                    warn!(task_id = %task.task_id, error = %e, "Failed to sign task attachment url");
                    None
                }
            },
            None => None,
        };
        TaskResponse::new(task, url)
    }

    async fn respond_all(&self, tasks: Vec<Task>) -> Result<Vec<TaskResponse>, ServiceError> {
        let owners: HashSet<Uuid> = tasks
            .iter()
            .filter(|t| t.image.is_some())
            .map(|t| t.owner_id)
            .collect();

        let mut urls: HashMap<String, String> = HashMap::new();
        for owner in owners {
            match self.files.list(owner).await {
                Ok(listed) => urls.extend(listed),
                Err(AttachmentError::NoImagesFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let url = task.image.as_deref().and_then(|image| {
                    urls.get(&self.files.object_key(task.owner_id, task.task_id, image))
                        .cloned()
                });
                TaskResponse::new(task, url)
            })
            .collect())
    }
}
