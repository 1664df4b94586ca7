// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use lessor::config::settings::Settings;
use lessor::domain::models::attachment::AttachmentCategory;
use lessor::domain::services::file_store::FileStore;
use lessor::domain::services::task_service::TaskService;
use lessor::infrastructure::database::connection;
use lessor::infrastructure::metrics;
use lessor::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use lessor::infrastructure::storage::create_storage_repository;
use lessor::presentation::routes;
use lessor::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(settings.telemetry.json);
    info!("Starting lessor...");
    if let Some(addr) = settings.telemetry.metrics_addr.as_deref() {
        metrics::init_metrics(addr);
    }

    // 3. Connect to database (migrations run inside create_pool when enabled)
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    // 4. Initialize object storage
    let storage = create_storage_repository(&settings.storage).await?;
    info!(storage_type = %settings.storage.storage_type, "Object storage initialized");

    // 5. Initialize services
    let files = Arc::new(FileStore::new(
        storage,
        AttachmentCategory::Task,
        settings.storage.category_root(AttachmentCategory::Task),
        settings.storage.max_upload_bytes,
        settings.storage.url_ttl(),
    ));
    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let task_service = Arc::new(TaskService::new(task_repo, files));

    // 6. Start HTTP server
    let app = routes::routes(task_service, settings.server.request_timeout());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
