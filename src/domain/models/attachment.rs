// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::domain::repositories::storage_repository::StorageError;

/// 附件类别
///
/// 每个类别对应对象存储中的一个根目录，目录名在配置中给出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentCategory {
    Property,
    Task,
    User,
}

impl fmt::Display for AttachmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttachmentCategory::Property => write!(f, "property"),
            AttachmentCategory::Task => write!(f, "task"),
            AttachmentCategory::User => write!(f, "user"),
        }
    }
}

/// 附件错误类型
#[derive(Error, Debug)]
pub enum AttachmentError {
    /// 文件超过大小上限，在任何网络调用之前拒绝
    #[error("image too large: {size} bytes exceeds max size {max}")]
    TooLarge { size: usize, max: usize },

    /// 读取上传文件流失败
    #[error("failed to read file: {0}")]
    FileRead(#[source] std::io::Error),

    /// 上传文件缺少文件名
    #[error("uploaded file has no usable filename")]
    MissingFilename,

    #[error("file upload failed: {0}")]
    Upload(#[source] StorageError),

    #[error("file listing failed: {0}")]
    List(#[source] StorageError),

    #[error("file url signing failed: {0}")]
    Get(#[source] StorageError),

    #[error("file delete failed: {0}")]
    Delete(#[source] StorageError),

    /// 列举结果为空，调用方应渲染为"无附件"而非失败
    #[error("no images found")]
    NoImagesFound,
}

/// 已读入内存的上传文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    filename: String,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// 从已缓冲的数据创建上传文件
    ///
    /// # 参数
    ///
    /// * `filename` - 原始文件名，仅保留最后一级路径
    /// * `bytes` - 文件内容
    /// * `max_bytes` - 字节上限
    pub fn new(
        filename: &str,
        bytes: impl Into<Vec<u8>>,
        max_bytes: usize,
    ) -> Result<Self, AttachmentError> {
        let bytes = bytes.into();
        if bytes.len() > max_bytes {
            return Err(AttachmentError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }
        Ok(Self {
            filename: sanitize_filename(filename)?,
            bytes,
        })
    }

    /// 从异步流读取上传文件，超过 `max_bytes` 立即停止读取
    pub async fn from_reader<R>(
        filename: &str,
        reader: R,
        max_bytes: usize,
    ) -> Result<Self, AttachmentError>
    where
        R: AsyncRead + Unpin,
    {
        let filename = sanitize_filename(filename)?;
        let mut bytes = Vec::new();
        reader
            .take(max_bytes as u64 + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(AttachmentError::FileRead)?;

        if bytes.len() > max_bytes {
            return Err(AttachmentError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }
        Ok(Self { filename, bytes })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 文件字节数
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

fn sanitize_filename(filename: &str) -> Result<String, AttachmentError> {
    // strip client supplied directories, keys must stay under the derived prefix
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AttachmentError::MissingFilename);
    }
    Ok(name.to_string())
}
