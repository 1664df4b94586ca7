// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::task::DomainError;

/// 房产实体
///
/// 出租人名下的一处房产。房产只有增删改查，没有生命周期逻辑。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(skip)]
    pub sequence: i64,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    /// 地址（街道、城市、州、国家、邮编）
    pub address: serde_json::Value,
    pub bedrooms: f64,
    pub baths: f64,
    pub square_footage: f64,
    pub is_available: bool,
    pub status: PropertyStatus,
    pub notes: String,
    /// 附件的相对键
    pub image: Option<String>,
    pub tax_rate: f64,
    pub tax_amount_due: f64,
    pub max_occupancy: i32,
}

impl Property {
    pub fn new(owner_id: Uuid, address: serde_json::Value) -> Self {
        Self {
            sequence: 0,
            property_id: Uuid::new_v4(),
            owner_id,
            address,
            bedrooms: 0.0,
            baths: 0.0,
            square_footage: 0.0,
            is_available: false,
            status: PropertyStatus::default(),
            notes: String::new(),
            image: None,
            tax_rate: 0.0,
            tax_amount_due: 0.0,
            max_occupancy: 0,
        }
    }
}

/// 房产状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    Pending,
    InProgress,
    Completed,
    #[default]
    Unknown,
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyStatus::Pending => write!(f, "pending"),
            PropertyStatus::InProgress => write!(f, "in-progress"),
            PropertyStatus::Completed => write!(f, "completed"),
            PropertyStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PropertyStatus::Pending),
            "in-progress" => Ok(PropertyStatus::InProgress),
            "completed" => Ok(PropertyStatus::Completed),
            "unknown" => Ok(PropertyStatus::Unknown),
            other => Err(DomainError::ValidationError(format!(
                "unknown property status: {}",
                other
            ))),
        }
    }
}
