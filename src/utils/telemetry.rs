// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认日志过滤规则，可由 `RUST_LOG` 覆盖
pub const DEFAULT_FILTER: &str = "info,lessor=debug";

/// 初始化日志订阅器
///
/// # 参数
///
/// * `json` - 是否输出JSON格式的结构化日志
pub fn init_telemetry(json: bool) {
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(plain)
        .with(structured)
        .init();
}
