// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use tracing::{error, warn};

use crate::domain::repositories::repository::RepositoryError;
use crate::infrastructure::metrics::REPOSITORY_WRITES;

/// 事务存储
///
/// 对数据库连接池的工作单元封装。每次写操作通过 [`begin`](Self::begin)
/// 开启事务，并通过 [`settle`](Self::settle) 结束：结果为 `Ok` 时提交，
/// 为 `Err` 时回滚，保证每次调用恰好执行一次提交或回滚。
#[derive(Clone)]
pub struct TransactionalStore {
    db: Arc<DatabaseConnection>,
}

impl TransactionalStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 共享的数据库连接，用于事务外的只读查询
    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 开启事务
    ///
    /// # 返回值
    ///
    /// * `Ok(DatabaseTransaction)` - 事务句柄
    /// * `Err(RepositoryError::TransactionStartFailed)` - 连接池耗尽或连接丢失
    pub async fn begin(&self) -> Result<DatabaseTransaction, RepositoryError> {
        self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction");
            RepositoryError::TransactionStartFailed(e)
        })
    }

    /// 结束事务
    ///
    /// # 参数
    ///
    /// * `model` - 写入的模型名，用于日志与指标
    /// * `txn` - 由 [`begin`](Self::begin) 得到的事务
    /// * `outcome` - 事务内写操作的结果
    ///
    /// # 返回值
    ///
    /// * 提交成功时返回写操作的值
    /// * 提交失败时返回 `TransactionCommitFailed`
    /// * 回滚成功时原样返回写操作的错误
    /// * 回滚失败时返回 `RollbackFailed`，其中保留原始错误
    pub async fn settle<T>(
        &self,
        model: &'static str,
        txn: DatabaseTransaction,
        outcome: Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        match outcome {
            Ok(value) => match txn.commit().await {
                Ok(()) => {
                    counter!(REPOSITORY_WRITES, "model" => model, "outcome" => "committed")
                        .increment(1);
                    Ok(value)
                }
                Err(e) => {
                    counter!(REPOSITORY_WRITES, "model" => model, "outcome" => "commit_failed")
                        .increment(1);
                    error!(model, error = %e, "Failed to commit transaction");
                    Err(RepositoryError::TransactionCommitFailed(e))
                }
            },
            Err(original) => match txn.rollback().await {
                Ok(()) => {
                    counter!(REPOSITORY_WRITES, "model" => model, "outcome" => "rolled_back")
                        .increment(1);
                    warn!(model, error = %original, "Transaction rolled back");
                    Err(original)
                }
                Err(e) => {
                    counter!(REPOSITORY_WRITES, "model" => model, "outcome" => "rollback_failed")
                        .increment(1);
                    error!(model, error = %e, original = %original, "Failed to rollback transaction");
                    Err(RepositoryError::RollbackFailed {
                        source: e,
                        original: Box::new(original),
                    })
                }
            },
        }
    }
}
