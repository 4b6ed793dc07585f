// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::memory_db;
use pageblocks::domain::models::block::Platform;
use pageblocks::domain::models::template::BlockTemplate;
use pageblocks::domain::repositories::template_repository::TemplateRepository;
use pageblocks::infrastructure::database::entities::block_template;
use pageblocks::infrastructure::repositories::template_repo_impl::TemplateRepositoryImpl;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use uuid::Uuid;

fn template(name: &str, priority: i32) -> BlockTemplate {
    BlockTemplate::from_json(
        Uuid::new_v4(),
        name.to_string(),
        Platform::Html5,
        priority,
        &json!({ "step1": "<h2", "step2": ["a|b", "c"] }),
    )
    .unwrap()
}

#[tokio::test]
async fn test_templates_ordered_by_priority() {
    let db = memory_db().await;
    let repo = TemplateRepositoryImpl::new(db);

    repo.save(&template("Low", 10)).await.unwrap();
    repo.save(&template("High", 1)).await.unwrap();
    let mut tilda = template("Other platform", 0);
    tilda.platform = Platform::Tilda;
    repo.save(&tilda).await.unwrap();

    let found = repo.find_by_platform(Platform::Html5).await.unwrap();
    let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["High", "Low"]);
    assert_eq!(found[0].steps, template("High", 1).steps);
}

#[tokio::test]
async fn test_malformed_rows_are_skipped() {
    let db = memory_db().await;
    let repo = TemplateRepositoryImpl::new(db.clone());
    repo.save(&template("Valid", 0)).await.unwrap();

    block_template::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("No first step".to_string()),
        platform: Set("html5".to_string()),
        priority: Set(0),
        steps: Set(json!({ "step2": "x" })),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(db.as_ref())
    .await
    .unwrap();

    let found = repo.find_by_platform(Platform::Html5).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Valid");
}
