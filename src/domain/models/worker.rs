// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 工人实体
///
/// 可以被分配任务的作业人员，隶属于某个出租人。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    #[serde(skip)]
    pub sequence: i64,
    pub worker_id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub specialization: String,
    pub pay_rate: f64,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

impl Worker {
    pub fn new(owner_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            sequence: 0,
            worker_id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            specialization: String::new(),
            pay_rate: 0.0,
            start_date: None,
            end_date: None,
        }
    }
}
