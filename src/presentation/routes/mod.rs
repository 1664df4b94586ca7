// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod task;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{routing::get, Extension, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::task_service::TaskService;

/// multipart 表单中除附件外的余量
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// 创建应用路由
///
/// # 参数
///
/// * `service` - 任务服务
/// * `request_timeout` - 单个请求的最长处理时间，超时即丢弃处理中的操作
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R: TaskRepository + 'static>(
    service: Arc<TaskService<R>>,
    request_timeout: Duration,
) -> Router {
    let body_limit = service.files().max_bytes() + FORM_OVERHEAD_BYTES;

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    Router::new()
        .merge(public_routes)
        .merge(task::task_routes::<R>())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(service))
        .layer(request_timeout_layer(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// 请求超时层，超时后丢弃处理中的操作并返回 408
pub fn request_timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
