// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::application::dto::task_request::{
    AssignTaskRequest, PauseTaskRequest, PriorityRequest, TaskModRequest, TaskRequest,
};
use crate::application::dto::task_response::TaskResponse;
use crate::domain::models::attachment::{AttachmentError, FileUpload};
use crate::domain::models::filter::Filter;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::file_store::FileStore;
use crate::domain::services::task_service::{ServiceError, TaskService};
use crate::presentation::errors::{AppError, RequestError};

/// 表单中任务JSON所在的字段名
pub const TASK_FIELD: &str = "task";
/// 表单中附件所在的字段名
pub const IMAGE_FIELD: &str = "image";

/// 读取 multipart 表单
///
/// `task` 字段为JSON编码的请求，`image` 字段为可选附件。
/// 附件按块读取，超过字节上限后不再继续读取。
async fn read_form<T: DeserializeOwned>(
    files: &FileStore,
    mut multipart: Multipart,
) -> Result<(T, Option<FileUpload>), AppError> {
    let mut request: Option<T> = None;
    let mut upload: Option<FileUpload> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            TASK_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RequestError::Multipart(e.to_string()))?;
                let parsed = serde_json::from_str(&text).map_err(|e| RequestError::Json {
                    field: TASK_FIELD,
                    source: e,
                })?;
                request = Some(parsed);
            }
            IMAGE_FIELD => {
                let filename = field
                    .file_name()
                    .map(str::to_owned)
                    .ok_or(ServiceError::Attachment(AttachmentError::MissingFilename))?;

                let mut buffer = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| RequestError::Multipart(e.to_string()))?
                {
                    buffer.extend_from_slice(&chunk);
                    if buffer.len() > files.max_bytes() {
                        break;
                    }
                }

                let file = files
                    .read_upload(&filename, buffer.as_slice())
                    .await
                    .map_err(ServiceError::Attachment)?;
                upload = Some(file);
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let request = request.ok_or(RequestError::MissingField(TASK_FIELD))?;
    Ok((request, upload))
}

/// 创建任务
///
/// 请求体为 multipart 表单：`task`（TaskRequest JSON）与可选的 `image`。
pub async fn create_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let (request, upload) = read_form::<TaskRequest>(service.files(), multipart).await?;
    let response = service.create_task(request, upload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// 分页读取任务
///
/// 查询参数 `identifier` 为所有者ID，`page` 从1开始，`limit` 不超过25。
pub async fn list_tasks<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Query(filter): Query<Filter>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let tasks = service.get_tasks(&filter).await?;
    Ok(Json(tasks))
}

pub async fn get_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, AppError> {
    let filter = Filter::by_identifier(task_id.to_string());
    match service.get_task(&filter).await? {
        Some(task) => Ok(Json(task)),
        None => Err(RequestError::NotFound(task_id).into()),
    }
}

/// 通用修改
///
/// 路径中的任务ID必须与表单中的 `taskId` 一致。
pub async fn modify_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<TaskResponse>, AppError> {
    let (request, upload) = read_form::<TaskModRequest>(service.files(), multipart).await?;
    if request.task_id != task_id {
        return Err(RequestError::IdMismatch {
            path: task_id,
            body: request.task_id,
        }
        .into());
    }
    let response = service.modify_task(request, upload).await?;
    Ok(Json(response))
}

pub async fn assign_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<AssignTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    Ok(Json(service.assign_task(task_id, request).await?))
}

pub async fn pause_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<PauseTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    Ok(Json(service.pause_task(task_id, request).await?))
}

pub async fn unpause_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, AppError> {
    Ok(Json(service.unpause_task(task_id).await?))
}

pub async fn complete_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, AppError> {
    Ok(Json(service.complete_task(task_id).await?))
}

pub async fn reprioritize_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<PriorityRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    Ok(Json(service.reprioritize(task_id, request).await?))
}

/// 批量修改优先级
///
/// 请求体为JSON数组；元素形状在服务层逐个检查，任一不合法则整批拒绝。
pub async fn bulk_reprioritize<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Json(payloads): Json<Vec<serde_json::Value>>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    Ok(Json(service.bulk_reprioritize(payloads).await?))
}

pub async fn delete_task<R: TaskRepository + 'static>(
    Extension(service): Extension<Arc<TaskService<R>>>,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_task(task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
