// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 附件存储（file_store）：附件键的推导、上传、签名URL与列举
/// - 任务服务（task_service）：任务生命周期状态机
pub mod file_store;
pub mod task_service;
