// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use lessor::application::dto::task_request::TaskRequest;
use lessor::domain::models::attachment::AttachmentCategory;
use lessor::domain::models::task::{Priority, Task};
use lessor::domain::repositories::storage_repository::StorageRepository;
use lessor::domain::services::file_store::FileStore;
use lessor::domain::services::task_service::TaskService;
use lessor::infrastructure::database::entities::task as task_entity;
use lessor::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use lessor::infrastructure::storage::InMemoryStorage;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// 附件上限，测试中保持很小以便构造超限文件
pub const TEST_MAX_BYTES: usize = 1024;

pub const TEST_URL_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// 创建迁移后的 SQLite 内存数据库
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

pub fn task_files(storage: Arc<dyn StorageRepository>) -> Arc<FileStore> {
    Arc::new(FileStore::new(
        storage,
        AttachmentCategory::Task,
        "tasks",
        TEST_MAX_BYTES,
        TEST_URL_TTL,
    ))
}

#[allow(dead_code)]
pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub repo: Arc<TaskRepositoryImpl>,
    pub storage: Arc<InMemoryStorage>,
    pub service: Arc<TaskService<TaskRepositoryImpl>>,
}

/// 数据库、内存对象存储与任务服务
pub async fn create_context() -> TestContext {
    let db = setup_db().await;
    let repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let storage = Arc::new(InMemoryStorage::new());
    let service = Arc::new(TaskService::new(repo.clone(), task_files(storage.clone())));
    TestContext {
        db,
        repo,
        storage,
        service,
    }
}

pub fn task_request(owner_id: Uuid, property_id: Uuid) -> TaskRequest {
    TaskRequest {
        owner_id,
        property_id,
        worker_id: None,
        name: "Replace water heater".to_string(),
        category: "plumbing".to_string(),
        priority: Priority::Medium,
        take_precedence: false,
        details: "Unit 4B water heater is leaking".to_string(),
        notes: String::new(),
        scheduled_at: None,
        estimated_cost: 850.0,
        actual_cost: 0.0,
    }
}

pub fn new_task(owner_id: Uuid) -> Task {
    let mut task = Task::new(owner_id, Uuid::new_v4(), "Paint hallway");
    task.details = "Two coats, eggshell white".to_string();
    task.category = "painting".to_string();
    task
}

pub async fn task_count(db: &DatabaseConnection) -> u64 {
    task_entity::Entity::find().count(db).await.unwrap()
}
