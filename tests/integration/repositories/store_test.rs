// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{new_task, setup_db, task_count};
use lessor::domain::repositories::repository::{Inserter, RepositoryError};
use lessor::infrastructure::database::store::TransactionalStore;
use lessor::infrastructure::repositories::sea_orm_repository::Record;
use lessor::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use uuid::Uuid;

/// 事务内写入成功后注入失败，回滚后行数不变
#[tokio::test]
async fn test_failure_after_write_rolls_back() {
    let db = setup_db().await;
    let store = TransactionalStore::new(db.clone());

    let txn = store.begin().await.unwrap();
    let inserted = new_task(Uuid::new_v4()).insert_model().insert(&txn).await;
    assert!(inserted.is_ok());

    let outcome: Result<(), RepositoryError> = Err(RepositoryError::NoResults {
        shape: "task",
        identifier: "injected".to_string(),
    });
    let err = store.settle("task", txn, outcome).await.unwrap_err();

    assert!(err.is_no_results());
    assert!(err.original().is_none());
    assert_eq!(task_count(&db).await, 0);
}

#[tokio::test]
async fn test_success_commits() {
    let db = setup_db().await;
    let store = TransactionalStore::new(db.clone());

    let txn = store.begin().await.unwrap();
    let model = new_task(Uuid::new_v4())
        .insert_model()
        .insert(&txn)
        .await
        .unwrap();
    let id = store.settle("task", txn, Ok(model.id)).await.unwrap();

    assert!(id > 0);
    assert_eq!(task_count(&db).await, 1);
}

/// 连接池关闭后开启事务失败，写操作在任何语句之前返回
#[tokio::test]
async fn test_begin_on_closed_pool_is_transaction_start_failure() {
    let db = setup_db().await;
    let store = TransactionalStore::new(db.clone());
    let repo = TaskRepositoryImpl::new(db.clone());
    db.close_by_ref().await.unwrap();

    assert!(matches!(
        store.begin().await,
        Err(RepositoryError::TransactionStartFailed(_))
    ));
    assert!(matches!(
        repo.insert(&new_task(Uuid::new_v4())).await,
        Err(RepositoryError::TransactionStartFailed(_))
    ));
}

/// 回滚失败时同时暴露回滚错误与原始写入错误
#[tokio::test]
async fn test_rollback_failure_keeps_both_errors() {
    let db = setup_db().await;
    let store = TransactionalStore::new(db.clone());

    let txn = store.begin().await.unwrap();
    new_task(Uuid::new_v4())
        .insert_model()
        .insert(&txn)
        .await
        .unwrap();
    // 提前结束事务，使随后的回滚失败
    txn.execute_unprepared("ROLLBACK").await.unwrap();

    let outcome: Result<(), RepositoryError> = Err(RepositoryError::NoResults {
        shape: "task",
        identifier: "write".to_string(),
    });
    let err = store.settle("task", txn, outcome).await.unwrap_err();

    assert!(matches!(err, RepositoryError::RollbackFailed { .. }));
    assert!(matches!(
        err.original(),
        Some(RepositoryError::NoResults { identifier, .. }) if identifier == "write"
    ));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<DbErr>().is_some());
    assert!(err.to_string().contains("original error"));
    assert_eq!(task_count(&db).await, 0);
}

#[tokio::test]
async fn test_commit_failure_is_reported() {
    let db = setup_db().await;
    let store = TransactionalStore::new(db.clone());

    let txn = store.begin().await.unwrap();
    txn.execute_unprepared("COMMIT").await.unwrap();

    let err = store.settle("task", txn, Ok(())).await.unwrap_err();
    assert!(matches!(err, RepositoryError::TransactionCommitFailed(_)));
    assert!(err.original().is_none());
}
