// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::Block;
use crate::domain::repositories::operation_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 结构块仓库特质
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// 保存块
    async fn save(&self, block: &Block) -> Result<(), RepositoryError>;
    /// 按输出顺序列出操作的所有块
    async fn list_by_operation(&self, operation_id: Uuid) -> Result<Vec<Block>, RepositoryError>;
}
