// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::domain::repositories::task_repository::TaskRepository;
use crate::presentation::handlers::task_handler;

/// 创建任务相关路由
///
/// 处理器从 `Extension<Arc<TaskService<R>>>` 取得服务实例，由调用方注入。
///
/// # 返回值
///
/// 返回配置好的v1任务路由
pub fn task_routes<R: TaskRepository + 'static>() -> Router {
    Router::new()
        .route(
            "/v1/tasks",
            post(task_handler::create_task::<R>).get(task_handler::list_tasks::<R>),
        )
        .route(
            "/v1/tasks/priorities",
            patch(task_handler::bulk_reprioritize::<R>),
        )
        .route(
            "/v1/tasks/{id}",
            get(task_handler::get_task::<R>)
                .put(task_handler::modify_task::<R>)
                .delete(task_handler::delete_task::<R>),
        )
        .route("/v1/tasks/{id}/assign", post(task_handler::assign_task::<R>))
        .route("/v1/tasks/{id}/pause", post(task_handler::pause_task::<R>))
        .route(
            "/v1/tasks/{id}/unpause",
            post(task_handler::unpause_task::<R>),
        )
        .route(
            "/v1/tasks/{id}/complete",
            post(task_handler::complete_task::<R>),
        )
        .route(
            "/v1/tasks/{id}/priority",
            patch(task_handler::reprioritize_task::<R>),
        )
}
