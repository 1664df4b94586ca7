// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 签名URL生成失败
    #[error("Presign error: {0}")]
    Presign(String),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 对象存储特质
///
/// 定义附件所需的对象存储访问接口。键使用 `/` 分隔的层级路径。
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 使用指定键保存数据到存储中
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 根据键从存储中删除数据
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// 列出指定前缀下的所有完整键
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// 为指定键签发有时效的读取URL，不检查对象是否存在
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
