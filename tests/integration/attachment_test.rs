// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{setup_db, task_count, task_files, task_request, TEST_MAX_BYTES};
use lessor::domain::models::attachment::{AttachmentError, FileUpload};
use lessor::domain::models::filter::Filter;
use lessor::domain::services::task_service::{ServiceError, TaskService};
use lessor::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use lessor::infrastructure::storage::LocalStorage;
use std::path::Path;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

fn local_service(db: Arc<sea_orm::DatabaseConnection>, root: &Path) -> TaskService<TaskRepositoryImpl> {
    let storage = Arc::new(LocalStorage::new(root));
    TaskService::new(Arc::new(TaskRepositoryImpl::new(db)), task_files(storage))
}

fn read_url(url: &str) -> Vec<u8> {
    let parsed = Url::parse(url).unwrap();
    assert_eq!(parsed.scheme(), "file");
    assert!(parsed.query_pairs().any(|(k, _)| k == "expires"));
    std::fs::read(parsed.to_file_path().unwrap()).unwrap()
}

/// 附件上传后可通过单条读取与列表读取的签名URL取回
#[tokio::test]
async fn test_attachment_round_trip_through_local_storage() {
    let dir = tempfile::tempdir().unwrap();
    let db = setup_db().await;
    let service = local_service(db, dir.path());
    let owner = Uuid::new_v4();

    let upload = FileUpload::new("leak.jpg", b"jpeg-bytes".to_vec(), TEST_MAX_BYTES).unwrap();
    let created = service
        .create_task(task_request(owner, Uuid::new_v4()), Some(upload))
        .await
        .unwrap();
    let stored_dir = dir
        .path()
        .join("tasks")
        .join(owner.to_string())
        .join(created.task_id.to_string());
    assert!(stored_dir.is_dir());

    let single = service
        .get_task(&Filter::by_identifier(created.task_id.to_string()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read_url(single.image_url.as_deref().unwrap()), b"jpeg-bytes");

    let without_image = service
        .create_task(task_request(owner, Uuid::new_v4()), None)
        .await
        .unwrap();

    let listed = service
        .get_tasks(&Filter::new(owner.to_string(), 1, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    let with_url = listed
        .iter()
        .find(|t| t.task_id == created.task_id)
        .unwrap();
    assert_eq!(read_url(with_url.image_url.as_deref().unwrap()), b"jpeg-bytes");
    let plain = listed
        .iter()
        .find(|t| t.task_id == without_image.task_id)
        .unwrap();
    assert!(plain.image_url.is_none());
}

/// 所有者名下没有附件时列表读取不报错
#[tokio::test]
async fn test_list_without_any_images_renders_no_urls() {
    let dir = tempfile::tempdir().unwrap();
    let db = setup_db().await;
    let service = local_service(db, dir.path());
    let owner = Uuid::new_v4();

    service
        .create_task(task_request(owner, Uuid::new_v4()), None)
        .await
        .unwrap();
    let listed = service
        .get_tasks(&Filter::new(owner.to_string(), 1, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert!(listed[0].image_url.is_none());
}

/// 超限文件在任何存储写入之前被拒绝
#[tokio::test]
async fn test_oversized_attachment_is_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let db = setup_db().await;
    let service = local_service(db.clone(), dir.path());

    let oversized = vec![0u8; TEST_MAX_BYTES + 1];
    let read = service
        .files()
        .read_upload("huge.bin", oversized.as_slice())
        .await;
    assert!(matches!(read, Err(AttachmentError::TooLarge { .. })));

    // 恰好等于上限的文件可以上传
    let at_limit = FileUpload::new("edge.bin", vec![0u8; TEST_MAX_BYTES], TEST_MAX_BYTES).unwrap();
    service
        .create_task(task_request(Uuid::new_v4(), Uuid::new_v4()), Some(at_limit))
        .await
        .unwrap();

    let mut big = task_request(Uuid::new_v4(), Uuid::new_v4());
    big.name = "Oversized upload".to_string();
    let too_big =
        FileUpload::new("big.bin", vec![0u8; TEST_MAX_BYTES + 1], TEST_MAX_BYTES * 2).unwrap();
    let rejected = service.create_task(big.clone(), Some(too_big)).await;
    assert!(matches!(
        rejected,
        Err(ServiceError::Attachment(AttachmentError::TooLarge { .. }))
    ));
    assert!(!dir.path().join("tasks").join(big.owner_id.to_string()).exists());
    assert_eq!(task_count(&db).await, 1);
}

/// 替换附件后旧对象被删除
#[tokio::test]
async fn test_modify_replaces_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let db = setup_db().await;
    let service = local_service(db, dir.path());
    let owner = Uuid::new_v4();

    let first = FileUpload::new("before.png", b"before".to_vec(), TEST_MAX_BYTES).unwrap();
    let created = service
        .create_task(task_request(owner, Uuid::new_v4()), Some(first))
        .await
        .unwrap();

    let request = lessor::application::dto::task_request::TaskModRequest {
        task_id: created.task_id,
        worker_id: None,
        name: created.name.clone(),
        category: created.category.clone(),
        priority: created.priority,
        take_precedence: created.take_precedence,
        details: created.details.clone(),
        notes: created.notes.clone(),
        scheduled_at: None,
        started_at: None,
        completed_at: None,
        paused_at: None,
        paused_reason: None,
        failed_at: None,
        failed_reason: None,
        estimated_cost: created.estimated_cost,
        actual_cost: created.actual_cost,
        profit: created.profit,
    };
    let second = FileUpload::new("after.png", b"after".to_vec(), TEST_MAX_BYTES).unwrap();
    let modified = service.modify_task(request, Some(second)).await.unwrap();
    assert_eq!(read_url(modified.image_url.as_deref().unwrap()), b"after");

    let object_dir = dir
        .path()
        .join("tasks")
        .join(owner.to_string())
        .join(created.task_id.to_string());
    let remaining: Vec<_> = std::fs::read_dir(object_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].ends_with("-after.png"));
}
