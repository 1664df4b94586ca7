// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{new_task, setup_db, task_count};
use lessor::domain::models::filter::{Filter, FilterError};
use lessor::domain::models::task::{Priority, PriorityChange};
use lessor::domain::repositories::repository::{
    Deleter, Fetcher, Inserter, RepositoryError, Updater,
};
use lessor::domain::repositories::task_repository::TaskRepository;
use lessor::infrastructure::repositories::sea_orm_repository::Record;
use lessor::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// 读取不存在的行返回 NoResults，格式错误的标识符返回 InvalidFilter
#[tokio::test]
async fn test_fetch_distinguishes_absent_from_malformed() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);

    let absent = repo
        .fetch(&Filter::by_identifier(Uuid::new_v4().to_string()))
        .await
        .unwrap_err();
    assert!(absent.is_no_results());

    let malformed = repo
        .fetch(&Filter::by_identifier("not-a-uuid"))
        .await
        .unwrap_err();
    assert!(matches!(
        malformed,
        RepositoryError::InvalidFilter(FilterError::InvalidIdentifier { .. })
    ));
}

#[tokio::test]
async fn test_insert_update_delete_round_trip() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db.clone());
    let owner = Uuid::new_v4();

    let inserted = repo.insert(&new_task(owner)).await.unwrap();
    assert!(inserted.sequence > 0);
    assert_eq!(inserted.owner_id, owner);

    let mut changed = inserted.clone();
    changed.name = "Paint hallway and stairwell".to_string();
    changed.actual_cost = 310.25;
    let updated = repo.update(&changed).await.unwrap();
    assert_eq!(updated.name, "Paint hallway and stairwell");
    assert_eq!(updated.sequence, inserted.sequence);

    let fetched = repo
        .fetch(&Filter::by_identifier(inserted.task_id.to_string()))
        .await
        .unwrap();
    assert_eq!(fetched.actual_cost, 310.25);

    repo.delete(inserted.task_id).await.unwrap();
    assert_eq!(task_count(&db).await, 0);

    let again = repo.delete(inserted.task_id).await.unwrap_err();
    assert!(again.is_no_results());

    let missing = repo.update(&changed).await.unwrap_err();
    assert!(missing.is_no_results());
}

/// 更新不会改写所有者与房产列
#[tokio::test]
async fn test_update_keeps_ownership_columns() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);
    let inserted = repo.insert(&new_task(Uuid::new_v4())).await.unwrap();

    let mut hijacked = inserted.clone();
    hijacked.owner_id = Uuid::new_v4();
    hijacked.property_id = Uuid::new_v4();
    let updated = repo.update(&hijacked).await.unwrap();

    assert_eq!(updated.owner_id, inserted.owner_id);
    assert_eq!(updated.property_id, inserted.property_id);
}

#[tokio::test]
async fn test_fetch_all_scopes_by_owner_and_paginates() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    for _ in 0..12 {
        repo.insert(&new_task(owner)).await.unwrap();
    }
    for _ in 0..3 {
        repo.insert(&new_task(other)).await.unwrap();
    }

    let page_zero = repo
        .fetch_all(&Filter::new(owner.to_string(), 0, 5).unwrap())
        .await
        .unwrap();
    let page_one = repo
        .fetch_all(&Filter::new(owner.to_string(), 1, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(page_zero, page_one);
    assert_eq!(page_one.len(), 5);
    assert!(page_one.windows(2).all(|w| w[0].sequence < w[1].sequence));

    let page_three = repo
        .fetch_all(&Filter::new(owner.to_string(), 3, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(page_three.len(), 2);
    assert!(page_three.iter().all(|t| t.owner_id == owner));

    let past_end = repo
        .fetch_all(&Filter::new(owner.to_string(), 4, 5).unwrap())
        .await
        .unwrap();
    assert!(past_end.is_empty());

    let unscoped = repo
        .fetch_all(&Filter::new("", 1, 25).unwrap())
        .await
        .unwrap();
    assert_eq!(unscoped.len(), 15);
}

#[test]
fn test_filter_boundaries() {
    assert!(Filter::new("", 1, 25).is_ok());
    assert!(matches!(
        Filter::new("", 1, 26),
        Err(FilterError::LimitTooLarge(26))
    ));
    assert!(matches!(
        Filter::new("", 1, 0),
        Err(FilterError::NonPositiveLimit)
    ));
    assert!(Filter::new("", 999, 10).is_ok());
    assert!(matches!(
        Filter::new("", 1000, 10),
        Err(FilterError::PageTooLarge(1000))
    ));
    assert_eq!(Filter::new("", -3, 10).unwrap().page(), 1);
}

/// 重复的任务ID插入失败后回滚，行数不变
#[tokio::test]
async fn test_duplicate_insert_rolls_back() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db.clone());
    let task = new_task(Uuid::new_v4());

    repo.insert(&task).await.unwrap();
    let err = repo.insert(&task).await.unwrap_err();

    assert!(matches!(err, RepositoryError::InsertFailed { model: "task", .. }));
    assert_eq!(task_count(&db).await, 1);
}

#[tokio::test]
async fn test_fetch_existing_projection() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);
    let mut task = new_task(Uuid::new_v4());
    task.image = Some("1700-hallway.jpg".to_string());
    let inserted = repo.insert(&task).await.unwrap();

    let existing = repo.fetch_existing(inserted.task_id).await.unwrap();
    assert_eq!(existing.owner_id, inserted.owner_id);
    assert_eq!(existing.property_id, inserted.property_id);
    assert_eq!(existing.image.as_deref(), Some("1700-hallway.jpg"));
    assert!(existing.terminal_state().is_none());

    let missing = repo.fetch_existing(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(
        missing,
        RepositoryError::NoResults {
            shape: "existing task",
            ..
        }
    ));
}

/// 批量优先级更新：重复ID以最后一次为准，未涉及的行保持不变
#[tokio::test]
async fn test_update_priorities_applies_last_change_per_task() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);
    let owner = Uuid::new_v4();
    let first = repo.insert(&new_task(owner)).await.unwrap();
    let second = repo.insert(&new_task(owner)).await.unwrap();
    let untouched = repo.insert(&new_task(owner)).await.unwrap();

    let updated = repo
        .update_priorities(&[
            PriorityChange {
                task_id: first.task_id,
                priority: Priority::High,
            },
            PriorityChange {
                task_id: second.task_id,
                priority: Priority::Immediate,
            },
            PriorityChange {
                task_id: first.task_id,
                priority: Priority::Medium,
            },
        ])
        .await
        .unwrap();

    assert_eq!(updated.len(), 2);
    assert_eq!(updated[0].task_id, first.task_id);
    assert_eq!(updated[0].priority, Priority::Medium);
    assert_eq!(updated[1].priority, Priority::Immediate);
    assert_eq!(updated[0].name, first.name);

    let after = repo
        .fetch(&Filter::by_identifier(untouched.task_id.to_string()))
        .await
        .unwrap();
    assert_eq!(after, untouched);
}

/// 批次中存在未知ID时整批回滚
#[tokio::test]
async fn test_update_priorities_unknown_id_rolls_back_batch() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);
    let known = repo.insert(&new_task(Uuid::new_v4())).await.unwrap();
    let unknown = Uuid::new_v4();

    let err = repo
        .update_priorities(&[
            PriorityChange {
                task_id: known.task_id,
                priority: Priority::Immediate,
            },
            PriorityChange {
                task_id: unknown,
                priority: Priority::High,
            },
        ])
        .await
        .unwrap_err();
    // 未知ID属于合法缺失，并指出缺失的任务
    assert!(err.is_no_results());
    assert!(matches!(
        &err,
        RepositoryError::NoResults { shape: "task", identifier } if *identifier == unknown.to_string()
    ));

    let after = repo
        .fetch(&Filter::by_identifier(known.task_id.to_string()))
        .await
        .unwrap();
    assert_eq!(after.priority, Priority::Low);
}

#[tokio::test]
async fn test_update_priorities_empty_batch() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db);
    assert!(repo.update_priorities(&[]).await.unwrap().is_empty());
}

/// 无法识别的存储优先级按默认优先级读取，不影响整行读取
#[tokio::test]
async fn test_unrecognised_stored_priority_reads_as_default() {
    let db = setup_db().await;
    let repo = TaskRepositoryImpl::new(db.clone());
    let mut task = new_task(Uuid::new_v4());
    task.priority = Priority::High;

    let mut active = task.insert_model();
    active.priority = Set("urgent".to_string());
    active.insert(db.as_ref()).await.unwrap();

    let fetched = repo
        .fetch(&Filter::by_identifier(task.task_id.to_string()))
        .await
        .unwrap();
    assert_eq!(fetched.priority, Priority::Low);
    assert_eq!(fetched.name, task.name);
}
