// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::operation::{Operation, OperationStatus};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 状态转换不被允许（记录已处于更靠后的状态）
    #[error("Operation {id} cannot move to {to}")]
    InvalidTransition { id: Uuid, to: OperationStatus },
    /// 存储数据无法映射为领域模型
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// 操作仓库特质
///
/// 定义解析操作的数据访问接口
#[async_trait]
pub trait OperationRepository: Send + Sync {
    /// 为URL创建新的待处理操作
    async fn create(&self, url: &str) -> Result<Operation, RepositoryError>;
    /// 原子地推进操作状态，只允许向前转换
    async fn update_status(
        &self,
        id: Uuid,
        status: OperationStatus,
    ) -> Result<Operation, RepositoryError>;
    /// 根据ID查找操作
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, RepositoryError>;
}
