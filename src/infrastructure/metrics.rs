// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 仓库写操作结果计数器，标签 `model` 与 `outcome`
pub const REPOSITORY_WRITES: &str = "lessor_repository_writes_total";

/// 任务生命周期转换计数器，标签 `action`
pub const TASK_TRANSITIONS: &str = "lessor_task_transitions_total";

/// 附件操作失败计数器，标签 `operation`
pub const ATTACHMENT_FAILURES: &str = "lessor_attachment_failures_total";

/// 初始化指标系统
///
/// 在指定地址启动 Prometheus 导出器并注册指标描述
pub fn init_metrics(addr: &str) {
    let addr: SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}. Metrics exporter disabled.", addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(
        REPOSITORY_WRITES,
        "Repository write transactions by model and outcome"
    );
    describe_counter!(TASK_TRANSITIONS, "Task lifecycle transitions by action");
    describe_counter!(
        ATTACHMENT_FAILURES,
        "Object store failures by attachment operation"
    );

    info!("Metrics exporter listening on {}", addr);
}
