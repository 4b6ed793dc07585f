// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::Platform;
use crate::domain::models::template::BlockTemplate;
use crate::domain::repositories::operation_repository::RepositoryError;
use async_trait::async_trait;

/// 块模板仓库特质
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// 按优先级升序返回平台的模板，无效模板被跳过
    async fn find_by_platform(
        &self,
        platform: Platform,
    ) -> Result<Vec<BlockTemplate>, RepositoryError>;
    /// 保存模板
    async fn save(&self, template: &BlockTemplate) -> Result<(), RepositoryError>;
}
