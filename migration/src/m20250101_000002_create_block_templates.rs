// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 创建块模板表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlockTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockTemplates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlockTemplates::Name).string().not_null())
                    .col(ColumnDef::new(BlockTemplates::Platform).string().not_null())
                    .col(
                        ColumnDef::new(BlockTemplates::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(BlockTemplates::Steps).json().not_null())
                    .col(
                        ColumnDef::new(BlockTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_block_templates_platform_priority")
                    .table(BlockTemplates::Table)
                    .col(BlockTemplates::Platform)
                    .col(BlockTemplates::Priority)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockTemplates::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum BlockTemplates {
    Table,
    Id,
    Name,
    Platform,
    Priority,
    Steps,
    CreatedAt,
}
