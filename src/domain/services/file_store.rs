// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::models::attachment::{AttachmentCategory, AttachmentError, FileUpload};
use crate::domain::repositories::storage_repository::StorageRepository;

/// 附件存储服务
///
/// 将 (类别, 所有者ID, 对象ID) 映射为对象存储中的键前缀
/// `category_root/owner_id/object_id`。上传写入带时间戳的对象，
/// 只把 `{时间戳}-{文件名}` 后缀交还给调用方持久化；读取时由
/// 所有者ID与对象ID重新推导前缀，并签发短时有效的URL。
pub struct FileStore {
    storage: Arc<dyn StorageRepository>,
    category: AttachmentCategory,
    root: String,
    max_bytes: usize,
    url_ttl: Duration,
}

impl FileStore {
    /// 创建附件存储服务
    ///
    /// # 参数
    ///
    /// * `storage` - 对象存储实现
    /// * `category` - 附件类别
    /// * `root` - 该类别在对象存储中的根目录
    /// * `max_bytes` - 单个文件的字节上限
    /// * `url_ttl` - 签名URL有效期
    pub fn new(
        storage: Arc<dyn StorageRepository>,
        category: AttachmentCategory,
        root: impl Into<String>,
        max_bytes: usize,
        url_ttl: Duration,
    ) -> Self {
        Self {
            storage,
            category,
            root: root.into().trim_matches('/').to_string(),
            max_bytes,
            url_ttl,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// 所有者级前缀：`root/owner_id`
    pub fn owner_prefix(&self, owner_id: Uuid) -> String {
        join_key(&[&self.root, &owner_id.to_string()])
    }

    /// 对象级前缀：`root/owner_id/object_id`
    pub fn prefix(&self, owner_id: Uuid, object_id: Uuid) -> String {
        join_key(&[&self.root, &owner_id.to_string(), &object_id.to_string()])
    }

    /// 由相对键重建完整键
    pub fn object_key(&self, owner_id: Uuid, object_id: Uuid, relative_key: &str) -> String {
        join_key(&[&self.prefix(owner_id, object_id), relative_key])
    }

    /// 按本服务的字节上限读取上传流
    pub async fn read_upload<R>(
        &self,
        filename: &str,
        reader: R,
    ) -> Result<FileUpload, AttachmentError>
    where
        R: AsyncRead + Unpin,
    {
        FileUpload::from_reader(filename, reader, self.max_bytes).await
    }

    /// 上传附件
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 相对键 `{unix纳秒时间戳}-{文件名}`
    /// * `Err(AttachmentError)` - 超出上限或上传失败
    pub async fn upload(
        &self,
        owner_id: Uuid,
        object_id: Uuid,
        file: &FileUpload,
    ) -> Result<String, AttachmentError> {
        if file.size() > self.max_bytes {
            return Err(AttachmentError::TooLarge {
                size: file.size(),
                max: self.max_bytes,
            });
        }

        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let relative_key = format!("{}-{}", stamp, file.filename());
        let key = self.object_key(owner_id, object_id, &relative_key);

        self.storage
            .save(&key, file.bytes())
            .await
            .map_err(AttachmentError::Upload)?;

        debug!(category = %self.category, key = %key, size = file.size(), "Uploaded attachment");
        Ok(relative_key)
    }

    /// 为已存储的相对键签发URL，不检查对象是否存在
    pub async fn get(
        &self,
        owner_id: Uuid,
        object_id: Uuid,
        relative_key: &str,
    ) -> Result<String, AttachmentError> {
        let key = self.object_key(owner_id, object_id, relative_key);
        self.storage
            .presign_get(&key, self.url_ttl)
            .await
            .map_err(AttachmentError::Get)
    }

    /// 列出所有者名下的全部附件
    ///
    /// # 返回值
    ///
    /// * `Ok(HashMap)` - 完整键到签名URL的映射
    /// * `Err(AttachmentError::NoImagesFound)` - 列举结果为空
    pub async fn list(&self, owner_id: Uuid) -> Result<HashMap<String, String>, AttachmentError> {
        let prefix = format!("{}/", self.owner_prefix(owner_id));
        let keys = self
            .storage
            .list(&prefix)
            .await
            .map_err(AttachmentError::List)?;

        if keys.is_empty() {
            return Err(AttachmentError::NoImagesFound);
        }

        let mut urls = HashMap::with_capacity(keys.len());
        for key in keys {
            match self.storage.presign_get(&key, self.url_ttl).await {
                Ok(url) => {
                    urls.insert(key, url);
                }
                Err(e) => {
                    // unsignable keys are skipped
                    warn!(key = %key, error = %e, "Failed to sign attachment url");
                }
            }
        }
        Ok(urls)
    }

    /// 删除指定附件
    pub async fn remove(
        &self,
        owner_id: Uuid,
        object_id: Uuid,
        relative_key: &str,
    ) -> Result<(), AttachmentError> {
        let key = self.object_key(owner_id, object_id, relative_key);
        self.storage
            .delete(&key)
            .await
            .map_err(AttachmentError::Delete)
    }
}

fn join_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
