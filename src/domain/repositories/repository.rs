// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::filter::{Filter, FilterError};

/// 仓库错误类型
///
/// 封闭的失败集合，每种失败都保留底层数据库错误以便向下追溯。
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 查询失败
    #[error("failed to fetch {model}: {source}")]
    FetchFailed {
        model: &'static str,
        #[source]
        source: DbErr,
    },
    /// 插入失败
    #[error("failed to insert {model}: {source}")]
    InsertFailed {
        model: &'static str,
        #[source]
        source: DbErr,
    },
    /// 更新失败
    #[error("failed to update {model}: {source}")]
    UpdateFailed {
        model: &'static str,
        #[source]
        source: DbErr,
    },
    /// 删除失败
    #[error("failed to delete {model}: {source}")]
    DeleteFailed {
        model: &'static str,
        #[source]
        source: DbErr,
    },
    /// 无法开启事务（连接池耗尽、连接丢失等）
    #[error("failed to start transaction: {0}")]
    TransactionStartFailed(#[source] DbErr),
    /// 回滚失败，同时保留触发回滚的原始错误
    #[error("failed to rollback transaction: {source} (original error: {original})")]
    RollbackFailed {
        #[source]
        source: DbErr,
        original: Box<RepositoryError>,
    },
    /// 提交失败
    #[error("failed to commit transaction: {0}")]
    TransactionCommitFailed(#[source] DbErr),
    /// 查询成功执行但没有匹配的记录
    #[error("no results found for {shape} with identifier {identifier}")]
    NoResults {
        shape: &'static str,
        identifier: String,
    },
    /// 过滤器不合法
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),
}

impl RepositoryError {
    /// 是否为"合法缺失"而非存储故障
    pub fn is_no_results(&self) -> bool {
        matches!(self, RepositoryError::NoResults { .. })
    }

    /// 回滚失败时返回被保留的原始错误
    pub fn original(&self) -> Option<&RepositoryError> {
        match self {
            RepositoryError::RollbackFailed { original, .. } => Some(original),
            _ => None,
        }
    }
}

/// 读取能力
#[async_trait]
pub trait Fetcher<T>: Send + Sync {
    /// 按过滤器标识符读取单条记录，零行时返回 `NoResults`
    async fn fetch(&self, filter: &Filter) -> Result<T, RepositoryError>;

    /// 分页读取，过滤器标识符非空时按所有者限定范围，零行时返回空列表
    async fn fetch_all(&self, filter: &Filter) -> Result<Vec<T>, RepositoryError>;
}

/// 插入能力
#[async_trait]
pub trait Inserter<T>: Send + Sync {
    async fn insert(&self, record: &T) -> Result<T, RepositoryError>;
}

/// 更新能力
///
/// 以外部标识符定位，整行替换可变列。
#[async_trait]
pub trait Updater<T>: Send + Sync {
    async fn update(&self, record: &T) -> Result<T, RepositoryError>;
}

/// 删除能力
#[async_trait]
pub trait Deleter<T>: Send + Sync {
    async fn delete(&self, identifier: Uuid) -> Result<(), RepositoryError>;
}

/// 完整的仓库能力集合
///
/// 任何同时具备四种能力的类型自动实现该特质。
pub trait Repository<T>: Fetcher<T> + Inserter<T> + Updater<T> + Deleter<T> {}

impl<T, R> Repository<T> for R where R: Fetcher<T> + Inserter<T> + Updater<T> + Deleter<T> {}
