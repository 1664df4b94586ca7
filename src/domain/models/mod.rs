// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 任务（task）：房产维护任务及其生命周期
/// - 房产（property）：出租人名下的房产
/// - 工人（worker）：可被分配任务的作业人员
/// - 附件（attachment）：上传文件与附件类别
/// - 过滤器（filter）：所有查询共用的分页描述
pub mod attachment;
pub mod filter;
pub mod property;
pub mod task;
pub mod worker;
