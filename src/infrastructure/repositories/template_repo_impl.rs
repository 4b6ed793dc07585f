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

use crate::domain::models::block::Platform;
use crate::domain::models::template::BlockTemplate;
use crate::domain::repositories::operation_repository::RepositoryError;
use crate::domain::repositories::template_repository::TemplateRepository;
use crate::infrastructure::database::entities::block_template as template_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;
use tracing::warn;

/// 块模板仓库实现
pub struct TemplateRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TemplateRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TemplateRepository for TemplateRepositoryImpl {
    async fn find_by_platform(
        &self,
        platform: Platform,
    ) -> Result<Vec<BlockTemplate>, RepositoryError> {
        let rows = template_entity::Entity::find()
            .filter(template_entity::Column::Platform.eq(platform.to_string()))
            .order_by_asc(template_entity::Column::Priority)
            .order_by_asc(template_entity::Column::CreatedAt)
            .order_by_asc(template_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        let templates = rows
            .into_iter()
            .filter_map(|row| {
                match BlockTemplate::from_json(row.id, row.name.clone(), platform, row.priority, &row.steps) {
                    Ok(template) => Some(template),
                    Err(e) => {
                        warn!(template = %row.name, id = %row.id, error = %e, "Skipping malformed template");
                        None
                    }
                }
            })
            .collect();

        Ok(templates)
    }

    async fn save(&self, template: &BlockTemplate) -> Result<(), RepositoryError> {
        let model = template_entity::ActiveModel {
            id: Set(template.id),
            name: Set(template.name.clone()),
            platform: Set(template.platform.to_string()),
            priority: Set(template.priority),
            steps: Set(template.steps_json()),
            created_at: Set(Utc::now().into()),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }
}
