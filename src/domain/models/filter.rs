// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 单页最大记录数
pub const MAX_LIMIT: u64 = 25;

/// 可分页的最大页码（不含）
pub const MAX_PAGE: u64 = 1000;

/// 未指定时的默认页大小
pub const DEFAULT_LIMIT: u64 = 10;

/// 过滤器错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// 页大小必须为正数
    #[error("invalid limit, must be positive number")]
    NonPositiveLimit,
    /// 页大小超过上限
    #[error("invalid limit {0}, must be at most {MAX_LIMIT}")]
    LimitTooLarge(u64),
    /// 页码超过上限
    #[error("invalid page {0}, cannot paginate {MAX_PAGE} or more pages")]
    PageTooLarge(u64),
    /// 标识符不是合法的UUID
    #[error("invalid uuid format {identifier}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },
}

/// 查询过滤器
///
/// 所有实体仓库共用的 (标识符, 页码, 页大小) 查询描述。
/// 过滤器是不可变的值类型，只能通过 [`Filter::new`] 构造，
/// 因此任何 `Filter` 实例都已通过校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter")]
pub struct Filter {
    identifier: String,
    page: u64,
    limit: u64,
}

#[derive(Deserialize)]
struct RawFilter {
    #[serde(default)]
    identifier: String,
    #[serde(default)]
    page: i64,
    #[serde(default)]
    limit: Option<i64>,
}

impl TryFrom<RawFilter> for Filter {
    type Error = FilterError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        Filter::new(
            raw.identifier,
            raw.page,
            raw.limit.unwrap_or(DEFAULT_LIMIT as i64),
        )
    }
}

impl Filter {
    /// 创建并校验过滤器
    ///
    /// # 参数
    ///
    /// * `identifier` - 查询的标识符（任务ID、所有者ID等，可为空）
    /// * `page` - 页码，0 与 1 等价
    /// * `limit` - 页大小，取值范围 (0, 25]
    ///
    /// # 返回值
    ///
    /// * `Ok(Filter)` - 合法的过滤器
    /// * `Err(FilterError)` - 参数越界
    pub fn new(identifier: impl Into<String>, page: i64, limit: i64) -> Result<Self, FilterError> {
        if limit <= 0 {
            return Err(FilterError::NonPositiveLimit);
        }
        let limit = limit as u64;
        if limit > MAX_LIMIT {
            return Err(FilterError::LimitTooLarge(limit));
        }

        // negative pages collapse onto the first page like page 0 does
        let page = page.max(0) as u64;
        if page >= MAX_PAGE {
            return Err(FilterError::PageTooLarge(page));
        }

        Ok(Self {
            identifier: identifier.into(),
            page: page.max(1),
            limit,
        })
    }

    /// 按单个标识符查询第一页的过滤器
    pub fn by_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            page: 1,
            limit: 1,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 页码（已归一化，最小为 1）
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// 分页偏移量：`limit * (page - 1)`
    pub fn offset(&self) -> u64 {
        self.limit * (self.page - 1)
    }

    /// 将标识符解析为UUID
    pub fn uuid(&self) -> Result<Uuid, FilterError> {
        Uuid::parse_str(&self.identifier).map_err(|e| FilterError::InvalidIdentifier {
            identifier: self.identifier.clone(),
            reason: e.to_string(),
        })
    }

    /// 标识符为空时返回 `None`，否则解析为UUID
    pub fn scope(&self) -> Result<Option<Uuid>, FilterError> {
        if self.identifier.is_empty() {
            Ok(None)
        } else {
            self.uuid().map(Some)
        }
    }
}
