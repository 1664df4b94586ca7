// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 迁移命令行入口
///
/// 对 `DATABASE_URL` 指向的数据库执行 tasks、properties、workers 表的迁移，
/// 子命令（up、down、status、fresh 等）由 sea-orm-migration 提供
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
