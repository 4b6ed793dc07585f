// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::block::{Block, BlockContent, BlockType, Platform};
use crate::domain::repositories::block_repository::BlockRepository;
use crate::domain::repositories::operation_repository::RepositoryError;
use crate::infrastructure::database::entities::block as block_entity;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 结构块仓库实现
pub struct BlockRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl BlockRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<block_entity::Model> for Block {
    type Error = RepositoryError;

    fn try_from(m: block_entity::Model) -> Result<Self, Self::Error> {
        let invalid = |e: crate::domain::models::operation::DomainError| {
            RepositoryError::Serialization(e.to_string())
        };
        let content: BlockContent = serde_json::from_value(m.content)?;

        Ok(Block {
            id: m.id,
            operation_id: m.operation_id,
            block_type: m.block_type.parse::<BlockType>().map_err(invalid)?,
            platform: m.platform.parse::<Platform>().map_err(invalid)?,
            content,
            html: m.html,
            position: m.position,
            created_at: m.created_at,
        })
    }
}

#[async_trait]
impl BlockRepository for BlockRepositoryImpl {
    async fn save(&self, block: &Block) -> Result<(), RepositoryError> {
        let model = block_entity::ActiveModel {
            id: Set(block.id),
            operation_id: Set(block.operation_id),
            block_type: Set(block.block_type.to_string()),
            platform: Set(block.platform.to_string()),
            content: Set(serde_json::to_value(&block.content)?),
            html: Set(block.html.clone()),
            position: Set(block.position),
            created_at: Set(block.created_at),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn list_by_operation(&self, operation_id: Uuid) -> Result<Vec<Block>, RepositoryError> {
        block_entity::Entity::find()
            .filter(block_entity::Column::OperationId.eq(operation_id))
            .order_by_asc(block_entity::Column::Position)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Block::try_from)
            .collect()
    }
}
