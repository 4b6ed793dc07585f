// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::{Block, BlockContent, BlockType, Platform};
use crate::domain::models::operation::{Operation, OperationStatus};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 操作响应数据传输对象
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OperationResponseDto {
    pub id: Uuid,
    pub url: String,
    pub status: OperationStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// 按输出顺序排列的块，提交响应中为空
    #[serde(default)]
    pub blocks: Vec<BlockDto>,
}

/// 块响应数据传输对象
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BlockDto {
    pub id: Uuid,
    pub block_type: BlockType,
    pub platform: Platform,
    pub position: i32,
    pub content: BlockContent,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub html: String,
}

impl From<Block> for BlockDto {
    fn from(block: Block) -> Self {
        Self {
            id: block.id,
            block_type: block.block_type,
            platform: block.platform,
            position: block.position,
            content: block.content,
            html: block.html,
        }
    }
}

impl OperationResponseDto {
    /// 构建带块的响应
    pub fn with_blocks(operation: Operation, blocks: Vec<Block>) -> Self {
        let mut dto = Self::from(operation);
        dto.blocks = blocks.into_iter().map(BlockDto::from).collect();
        dto
    }
}

impl From<Operation> for OperationResponseDto {
    fn from(operation: Operation) -> Self {
        Self {
            id: operation.id,
            url: operation.url,
            status: operation.status,
            created_at: operation.created_at,
            updated_at: operation.updated_at,
            blocks: Vec::new(),
        }
    }
}
