// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::models::filter::Filter;
use crate::domain::repositories::repository::{
    Deleter, Fetcher, Inserter, RepositoryError, Updater,
};
use crate::infrastructure::database::store::TransactionalStore;

type ModelOf<R> = <<R as Record>::Entity as EntityTrait>::Model;
type ColumnOf<R> = <<R as Record>::Entity as EntityTrait>::Column;

/// 领域类型与 sea-orm 实体之间的绑定
///
/// 实现该特质的领域类型即可复用 [`SeaOrmRepository`] 的全部读写能力。
pub trait Record: Clone + Send + Sync + 'static {
    /// 对应的数据库实体
    type Entity: EntityTrait;
    /// 对应的活动模型
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + 'static;

    /// 模型名，用于错误、日志与指标
    const MODEL: &'static str;

    /// 外部唯一标识符列
    fn identifier_column() -> ColumnOf<Self>;

    /// 所有者列，分页读取按该列限定范围
    fn owner_column() -> ColumnOf<Self>;

    /// 内部序号列，分页读取按该列排序
    fn sequence_column() -> ColumnOf<Self>;

    fn identifier(&self) -> Uuid;

    fn from_model(model: ModelOf<Self>) -> Self;

    /// 插入用的活动模型，内部序号由数据库分配
    fn insert_model(&self) -> Self::ActiveModel;

    /// 更新用的活动模型，不得设置内部序号与不可变的归属列
    fn update_model(&self) -> Self::ActiveModel;
}

/// 基于 sea-orm 的通用仓库
///
/// 每个写操作都在 [`TransactionalStore`] 开启的事务内执行。
pub struct SeaOrmRepository<R: Record> {
    store: TransactionalStore,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for SeaOrmRepository<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> SeaOrmRepository<R> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_store(TransactionalStore::new(db))
    }

    pub fn with_store(store: TransactionalStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &TransactionalStore {
        &self.store
    }

    /// 在给定连接或事务上按标识符读取单条记录
    pub async fn find_one<C: ConnectionTrait>(
        db: &C,
        identifier: Uuid,
    ) -> Result<Option<R>, RepositoryError> {
        let model = R::Entity::find()
            .filter(R::identifier_column().eq(identifier))
            .one(db)
            .await
            .map_err(|e| RepositoryError::FetchFailed {
                model: R::MODEL,
                source: e,
            })?;
        Ok(model.map(R::from_model))
    }

    fn no_results(identifier: impl ToString) -> RepositoryError {
        RepositoryError::NoResults {
            shape: R::MODEL,
            identifier: identifier.to_string(),
        }
    }
}

#[async_trait]
impl<R: Record> Fetcher<R> for SeaOrmRepository<R> {
    async fn fetch(&self, filter: &Filter) -> Result<R, RepositoryError> {
        let identifier = filter.uuid()?;
        Self::find_one(self.store.connection(), identifier)
            .await?
            .ok_or_else(|| Self::no_results(identifier))
    }

    async fn fetch_all(&self, filter: &Filter) -> Result<Vec<R>, RepositoryError> {
        let mut query = R::Entity::find();
        if let Some(owner) = filter.scope()? {
            query = query.filter(R::owner_column().eq(owner));
        }

        let models = query
            .order_by_asc(R::sequence_column())
            .limit(filter.limit())
            .offset(filter.offset())
            .all(self.store.connection())
            .await
            .map_err(|e| RepositoryError::FetchFailed {
                model: R::MODEL,
                source: e,
            })?;

        debug!(model = R::MODEL, count = models.len(), page = filter.page(), "Fetched page");
        Ok(models.into_iter().map(R::from_model).collect())
    }
}

#[async_trait]
impl<R> Inserter<R> for SeaOrmRepository<R>
where
    R: Record,
    ModelOf<R>: IntoActiveModel<R::ActiveModel>,
{
    async fn insert(&self, record: &R) -> Result<R, RepositoryError> {
        let active = record.insert_model();
        let txn = self.store.begin().await?;

        let outcome = active
            .insert(&txn)
            .await
            .map(R::from_model)
            .map_err(|e| RepositoryError::InsertFailed {
                model: R::MODEL,
                source: e,
            });

        self.store.settle(R::MODEL, txn, outcome).await
    }
}

#[async_trait]
impl<R: Record> Updater<R> for SeaOrmRepository<R> {
    async fn update(&self, record: &R) -> Result<R, RepositoryError> {
        let identifier = record.identifier();
        let active = record.update_model();
        let txn = self.store.begin().await?;

        let outcome = async {
            let result = R::Entity::update_many()
                .set(active)
                .filter(R::identifier_column().eq(identifier))
                .exec(&txn)
                .await
                .map_err(|e| RepositoryError::UpdateFailed {
                    model: R::MODEL,
                    source: e,
                })?;

            if result.rows_affected == 0 {
                return Err(Self::no_results(identifier));
            }

            Self::find_one(&txn, identifier)
                .await?
                .ok_or_else(|| Self::no_results(identifier))
        }
        .await;

        self.store.settle(R::MODEL, txn, outcome).await
    }
}

#[async_trait]
impl<R: Record> Deleter<R> for SeaOrmRepository<R> {
    async fn delete(&self, identifier: Uuid) -> Result<(), RepositoryError> {
        let txn = self.store.begin().await?;

        let outcome = R::Entity::delete_many()
            .filter(R::identifier_column().eq(identifier))
            .exec(&txn)
            .await
            .map_err(|e| RepositoryError::DeleteFailed {
                model: R::MODEL,
                source: e,
            })
            .and_then(|result| {
                if result.rows_affected == 0 {
                    Err(Self::no_results(identifier))
                } else {
                    Ok(())
                }
            });

        self.store.settle(R::MODEL, txn, outcome).await
    }
}
