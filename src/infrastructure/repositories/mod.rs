// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的具体实现：通用 sea-orm 仓库及各实体的绑定
pub mod property_repo_impl;
pub mod sea_orm_repository;
pub mod task_repo_impl;
pub mod worker_repo_impl;
