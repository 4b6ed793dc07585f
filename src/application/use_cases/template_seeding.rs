// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::template::TemplateSeed;
use crate::domain::repositories::operation_repository::RepositoryError;
use crate::domain::repositories::template_repository::TemplateRepository;
use tracing::{info, warn};

/// 将模板种子写入仓库
///
/// 同一平台下已存在同名模板时跳过，步骤无效的种子记录警告后跳过
///
/// # 返回值
///
/// 新写入的模板数量
pub async fn seed_templates<T>(repo: &T, seeds: Vec<TemplateSeed>) -> Result<usize, RepositoryError>
where
    T: TemplateRepository + ?Sized,
{
    let mut inserted = 0;

    for seed in seeds {
        let name = seed.name.clone();
        let template = match seed.into_template() {
            Ok(template) => template,
            Err(e) => {
                warn!(template = %name, "Skipping invalid template seed: {}", e);
                continue;
            }
        };

        let existing = repo.find_by_platform(template.platform).await?;
        if existing.iter().any(|t| t.name == template.name) {
            continue;
        }

        repo.save(&template).await?;
        inserted += 1;
    }

    info!("Seeded {} block templates", inserted);
    Ok(inserted)
}
