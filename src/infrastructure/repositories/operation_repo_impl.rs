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

use crate::domain::models::operation::{Operation, OperationStatus};
use crate::domain::repositories::operation_repository::{OperationRepository, RepositoryError};
use crate::infrastructure::database::entities::operation as operation_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

/// 操作仓库实现
pub struct OperationRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl OperationRepositoryImpl {
    /// 创建新的操作仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<operation_entity::Model> for Operation {
    type Error = RepositoryError;

    fn try_from(m: operation_entity::Model) -> Result<Self, Self::Error> {
        let status = m
            .status
            .parse::<OperationStatus>()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        Ok(Operation {
            id: m.id,
            url: m.url,
            status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

#[async_trait]
impl OperationRepository for OperationRepositoryImpl {
    async fn create(&self, url: &str) -> Result<Operation, RepositoryError> {
        let operation = Operation::new(url.to_string());

        let model = operation_entity::ActiveModel {
            id: Set(operation.id),
            url: Set(operation.url.clone()),
            status: Set(operation.status.to_string()),
            created_at: Set(operation.created_at),
            updated_at: Set(operation.updated_at),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(operation)
    }

    /// 条件更新：只有当前状态属于目标状态的前驱时才写入
    async fn update_status(
        &self,
        id: Uuid,
        status: OperationStatus,
    ) -> Result<Operation, RepositoryError> {
        let predecessors: Vec<String> = status
            .predecessors()
            .iter()
            .map(ToString::to_string)
            .collect();
        if predecessors.is_empty() {
            return Err(RepositoryError::InvalidTransition { id, to: status });
        }

        let now: DateTime<FixedOffset> = Utc::now().into();
        let result = operation_entity::Entity::update_many()
            .col_expr(operation_entity::Column::Status, Expr::value(status.to_string()))
            .col_expr(operation_entity::Column::UpdatedAt, Expr::value(now))
            .filter(operation_entity::Column::Id.eq(id))
            .filter(operation_entity::Column::Status.is_in(predecessors))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(RepositoryError::InvalidTransition { id, to: status }),
                None => Err(RepositoryError::NotFound),
            };
        }

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, RepositoryError> {
        operation_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Operation::try_from)
            .transpose()
    }
}
