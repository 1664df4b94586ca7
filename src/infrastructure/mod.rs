// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对具体技术的抽象和封装。
/// 基础设施层负责与外部系统的交互，包括数据库与对象存储。
///
/// 包含的子模块：
/// - 数据库（database）：提供数据库连接、实体映射与事务存储
/// - 指标（metrics）：提供系统监控和写入结果指标
/// - 仓库实现（repositories）：提供领域仓库接口的具体实现
/// - 存储（storage）：提供文件和对象存储功能
///
/// 基础设施层依赖于领域层的抽象接口，领域层不依赖具体技术实现。
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod storage;
