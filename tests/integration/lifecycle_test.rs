// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_context, task_count, task_request};
use chrono::{DateTime, FixedOffset, Utc};
use lessor::application::dto::task_request::{
    AssignTaskRequest, PauseTaskRequest, PriorityRequest, TaskModRequest,
};
use lessor::application::dto::task_response::TaskResponse;
use lessor::domain::models::filter::Filter;
use lessor::domain::models::task::{DomainError, Priority, TaskState};
use lessor::domain::repositories::repository::{Fetcher, RepositoryError};
use lessor::domain::services::task_service::ServiceError;
use serde_json::json;
use uuid::Uuid;

fn now() -> DateTime<FixedOffset> {
    Utc::now().into()
}

fn mod_request(task: &TaskResponse) -> TaskModRequest {
    TaskModRequest {
        task_id: task.task_id,
        worker_id: task.worker_id,
        name: task.name.clone(),
        category: task.category.clone(),
        priority: task.priority,
        take_precedence: task.take_precedence,
        details: task.details.clone(),
        notes: task.notes.clone(),
        scheduled_at: task.scheduled_at,
        started_at: task.started_at,
        completed_at: task.completed_at,
        paused_at: task.paused_at,
        paused_reason: task.paused_reason.clone(),
        failed_at: task.failed_at,
        failed_reason: task.failed_reason.clone(),
        estimated_cost: task.estimated_cost,
        actual_cost: task.actual_cost,
        profit: task.profit,
    }
}

fn is_illegal(result: &Result<TaskResponse, ServiceError>, expected: TaskState) -> bool {
    matches!(
        result,
        Err(ServiceError::Domain(DomainError::InvalidStateTransition { state, .. })) if *state == expected
    )
}

/// 完整生命周期：创建、分配、暂停、恢复、完成，终态后拒绝所有转换
#[tokio::test]
async fn test_full_lifecycle() {
    let ctx = create_context().await;
    let service = &ctx.service;
    let worker = Uuid::new_v4();

    let created = service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();
    assert_eq!(created.state, TaskState::Draft);
    assert!(created.image_url.is_none());

    let assigned = service
        .assign_task(created.task_id, AssignTaskRequest { worker_id: worker })
        .await
        .unwrap();
    assert_eq!(assigned.state, TaskState::Assigned);
    assert_eq!(assigned.worker_id, Some(worker));

    let paused = service
        .pause_task(
            created.task_id,
            PauseTaskRequest {
                reason: "Waiting on parts".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(paused.state, TaskState::Paused);
    assert_eq!(paused.paused_reason.as_deref(), Some("Waiting on parts"));

    let completed = service.complete_task(created.task_id).await.unwrap();
    assert_eq!(completed.state, TaskState::Completed);
    assert!(completed.completed_at.is_some());
    assert!(completed.paused_at.is_none());

    assert!(is_illegal(
        &service.complete_task(created.task_id).await,
        TaskState::Completed
    ));
    assert!(is_illegal(
        &service
            .pause_task(
                created.task_id,
                PauseTaskRequest {
                    reason: "Too late".to_string(),
                },
            )
            .await,
        TaskState::Completed
    ));
    assert!(is_illegal(
        &service
            .assign_task(
                created.task_id,
                AssignTaskRequest {
                    worker_id: Uuid::new_v4(),
                },
            )
            .await,
        TaskState::Completed
    ));
    assert!(is_illegal(
        &service.unpause_task(created.task_id).await,
        TaskState::Completed
    ));

    // 终态任务仍可调整优先级
    let reprioritized = service
        .reprioritize(
            created.task_id,
            PriorityRequest {
                priority: Priority::Low,
            },
        )
        .await
        .unwrap();
    assert_eq!(reprioritized.state, TaskState::Completed);
    assert_eq!(reprioritized.priority, Priority::Low);
}

#[tokio::test]
async fn test_pause_unpause_round_trip() {
    let ctx = create_context().await;
    let service = &ctx.service;

    let created = service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();

    assert!(is_illegal(
        &service
            .pause_task(
                created.task_id,
                PauseTaskRequest {
                    reason: "Not started".to_string(),
                },
            )
            .await,
        TaskState::Draft
    ));

    let assigned = service
        .assign_task(
            created.task_id,
            AssignTaskRequest {
                worker_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
    service
        .pause_task(
            created.task_id,
            PauseTaskRequest {
                reason: "Tenant away".to_string(),
            },
        )
        .await
        .unwrap();

    let resumed = service.unpause_task(created.task_id).await.unwrap();
    assert_eq!(resumed.state, TaskState::Assigned);
    assert!(resumed.paused_at.is_none());
    assert!(resumed.paused_reason.is_none());
    assert!(resumed.started_at.unwrap() >= assigned.started_at.unwrap());

    assert!(is_illegal(
        &service.unpause_task(created.task_id).await,
        TaskState::Assigned
    ));
}

/// 修改优先级不改变任何其他字段
#[tokio::test]
async fn test_reprioritize_changes_only_priority() {
    let ctx = create_context().await;
    let created = ctx
        .service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();
    let filter = Filter::by_identifier(created.task_id.to_string());
    let before = ctx.repo.fetch(&filter).await.unwrap();

    ctx.service
        .reprioritize(
            created.task_id,
            PriorityRequest {
                priority: Priority::Immediate,
            },
        )
        .await
        .unwrap();
    let after = ctx.repo.fetch(&filter).await.unwrap();

    assert_eq!(after.priority, Priority::Immediate);
    let mut expected = before.clone();
    expected.priority = Priority::Immediate;
    assert_eq!(after, expected);
}

/// 每次创建都生成新的任务ID，删除后也不会复用
#[tokio::test]
async fn test_identifiers_are_fresh() {
    let ctx = create_context().await;
    let request = task_request(Uuid::new_v4(), Uuid::new_v4());

    let first = ctx.service.create_task(request.clone(), None).await.unwrap();
    let second = ctx.service.create_task(request.clone(), None).await.unwrap();
    assert_ne!(first.task_id, second.task_id);

    ctx.service.delete_task(first.task_id).await.unwrap();
    let third = ctx.service.create_task(request, None).await.unwrap();
    assert_ne!(third.task_id, first.task_id);
    assert_ne!(third.task_id, second.task_id);
}

/// 删除不检查生命周期状态
#[tokio::test]
async fn test_delete_is_unconditional() {
    let ctx = create_context().await;
    let created = ctx
        .service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();
    ctx.service
        .assign_task(
            created.task_id,
            AssignTaskRequest {
                worker_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
    ctx.service.complete_task(created.task_id).await.unwrap();

    ctx.service.delete_task(created.task_id).await.unwrap();
    assert_eq!(task_count(&ctx.db).await, 0);

    let filter = Filter::by_identifier(created.task_id.to_string());
    assert!(ctx.service.get_task(&filter).await.unwrap().is_none());

    let again = ctx.service.delete_task(created.task_id).await;
    assert!(matches!(
        again,
        Err(ServiceError::Repository(RepositoryError::NoResults { .. }))
    ));
}

/// 失败只能通过通用修改设置，之后生命周期不可再变
#[tokio::test]
async fn test_fail_through_modify_then_frozen() {
    let ctx = create_context().await;
    let created = ctx
        .service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();
    let assigned = ctx
        .service
        .assign_task(
            created.task_id,
            AssignTaskRequest {
                worker_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();

    let mut request = mod_request(&assigned);
    request.failed_at = Some(now());
    request.failed_reason = Some("Permit denied".to_string());
    let failed = ctx.service.modify_task(request, None).await.unwrap();
    assert_eq!(failed.state, TaskState::Failed);

    let mut revive = mod_request(&failed);
    revive.failed_at = None;
    revive.failed_reason = None;
    let result = ctx.service.modify_task(revive, None).await;
    assert!(is_illegal(&result, TaskState::Failed));

    let mut note = mod_request(&failed);
    note.notes = "Reapply next quarter".to_string();
    let noted = ctx.service.modify_task(note, None).await.unwrap();
    assert_eq!(noted.notes, "Reapply next quarter");
    assert_eq!(noted.state, TaskState::Failed);
}

#[tokio::test]
async fn test_modify_rejects_failure_without_reason() {
    let ctx = create_context().await;
    let created = ctx
        .service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();

    let mut request = mod_request(&created);
    request.failed_at = Some(now());
    let result = ctx.service.modify_task(request, None).await;

    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::ValidationError(_)))
    ));
}

/// 批量优先级：形状错误的元素使整批失败且不产生写入
#[tokio::test]
async fn test_bulk_reprioritize() {
    let ctx = create_context().await;
    let owner = Uuid::new_v4();
    let a = ctx
        .service
        .create_task(task_request(owner, Uuid::new_v4()), None)
        .await
        .unwrap();
    let b = ctx
        .service
        .create_task(task_request(owner, Uuid::new_v4()), None)
        .await
        .unwrap();

    let rejected = ctx
        .service
        .bulk_reprioritize(vec![
            json!({"taskId": a.task_id, "priority": "immediate"}),
            json!({"taskId": b.task_id, "priority": "whenever"}),
        ])
        .await;
    assert!(matches!(
        rejected,
        Err(ServiceError::UnexpectedData { .. })
    ));
    let unchanged = ctx
        .repo
        .fetch(&Filter::by_identifier(a.task_id.to_string()))
        .await
        .unwrap();
    assert_eq!(unchanged.priority, Priority::Medium);

    let updated = ctx
        .service
        .bulk_reprioritize(vec![
            json!({"taskId": a.task_id, "priority": "immediate", "name": "ignored"}),
            json!({"taskId": b.task_id, "priority": "low"}),
        ])
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[0].priority, Priority::Immediate);
    assert_eq!(updated[0].name, a.name);
    assert_eq!(updated[1].priority, Priority::Low);
}

#[tokio::test]
async fn test_get_tasks_scopes_by_owner() {
    let ctx = create_context().await;
    let owner = Uuid::new_v4();
    for _ in 0..3 {
        ctx.service
            .create_task(task_request(owner, Uuid::new_v4()), None)
            .await
            .unwrap();
    }
    ctx.service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), None)
        .await
        .unwrap();

    let page = ctx
        .service
        .get_tasks(&Filter::new(owner.to_string(), 1, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|t| t.owner_id == owner && t.image_url.is_none()));
}
