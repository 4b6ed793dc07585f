// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::stub_renderer::{FailingRenderer, HangingRenderer, StaticRenderer};
use super::helpers::{create_test_app, wait_for_terminal};
use axum::http::StatusCode;
use pageblocks::application::dto::operation_response::OperationResponseDto;
use pageblocks::domain::models::block::{BlockType, ComponentValue, Platform};
use pageblocks::domain::models::operation::OperationStatus;
use pageblocks::domain::models::template::BlockTemplate;
use pageblocks::domain::repositories::block_repository::BlockRepository;
use pageblocks::domain::repositories::template_repository::TemplateRepository;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const TILDA_URL: &str = "https://studio.example.com/";
const LANDING_URL: &str = "https://landing.example.com/";

const TILDA_PAGE: &str = r#"<!DOCTYPE html><html><head>
<script src="https://static.tildacdn.com/js/tilda-scripts.min.js"></script></head>
<body class="t-body"><div id="allrecords">
  <div class="t-header">
    <img class="t-logo__img" src="https://static.tildacdn.com/logo.svg">
    <ul class="t-menu__list"><li><a href="/">Главная</a></li><li><a href="/price">Цены</a></li></ul>
    <a href="tel:+74951234567">+7 (495) 123-45-67</a>
    <div class="t706__carticon"></div>
  </div>
  <div class="t-rec">Content</div>
  <div class="t-footer">
    <div class="t-copyright">© 2024 Studio</div>
    <div class="t-sociallinks"><a href="https://vk.com/studio">VK</a></div>
  </div>
</div></body></html>"#;

const LANDING_PAGE: &str = r#"<!DOCTYPE html><html lang="en"><body>
<header><a href="/">Brand</a></header>
<section><h2>Our prices</h2><table class="pricing"></table></section>
<div style="display: none"><h2>Hidden promo</h2><table class="pricing"></table></div>
<section><p>Plain text</p></section>
<footer>Contacts</footer>
</body></html>"#;

async fn submit(app: &super::helpers::TestApp, url: &str) -> Uuid {
    let response = app.server.post("/v1/parse").json(&json!({ "url": url })).await;
    response.assert_status(StatusCode::ACCEPTED);
    let body: OperationResponseDto = response.json();
    body.id
}

#[tokio::test]
async fn test_tilda_page_end_to_end() {
    let renderer = StaticRenderer::default().with_page(TILDA_URL, TILDA_PAGE);
    let app = create_test_app(Arc::new(renderer)).await;

    let id = submit(&app, TILDA_URL).await;
    let operation = wait_for_terminal(app.operation_repo.as_ref(), id).await;
    assert_eq!(operation.status, OperationStatus::Completed);

    let response = app.server.get(&format!("/v1/operations/{}", id)).await;
    response.assert_status_ok();
    let body: OperationResponseDto = response.json();

    assert_eq!(body.status, OperationStatus::Completed);
    assert_eq!(body.blocks.len(), 2);

    let header = &body.blocks[0];
    assert_eq!(header.block_type, BlockType::Header);
    assert_eq!(header.platform, Platform::Tilda);
    assert_eq!(header.position, 0);
    assert_eq!(
        header.content.get("logo"),
        Some(&ComponentValue::Text("https://static.tildacdn.com/logo.svg".to_string()))
    );
    assert_eq!(
        header.content.get("menu"),
        Some(&ComponentValue::List(vec!["Главная".to_string(), "Цены".to_string()]))
    );
    assert_eq!(header.content.get("cart"), Some(&ComponentValue::Flag(true)));
    assert_eq!(header.content.get("search"), Some(&ComponentValue::Flag(false)));

    let footer = &body.blocks[1];
    assert_eq!(footer.block_type, BlockType::Footer);
    assert_eq!(footer.position, 1);
    assert_eq!(
        footer.content.get("copyright"),
        Some(&ComponentValue::Text("© 2024 Studio".to_string()))
    );
}

#[tokio::test]
async fn test_generic_page_uses_stored_templates() {
    let renderer = StaticRenderer::default().with_page(LANDING_URL, LANDING_PAGE);
    let app = create_test_app(Arc::new(renderer)).await;

    let pricing = BlockTemplate::from_json(
        Uuid::new_v4(),
        "Pricing".to_string(),
        Platform::Html5,
        1,
        &json!({ "step1": "<h2>", "step2": ["pricing", "tariff"] }),
    )
    .unwrap();
    app.template_repo.save(&pricing).await.unwrap();

    let id = submit(&app, LANDING_URL).await;
    let operation = wait_for_terminal(app.operation_repo.as_ref(), id).await;
    assert_eq!(operation.status, OperationStatus::Completed);

    let blocks = app.block_repo.list_by_operation(id).await.unwrap();
    let names: Vec<Option<&str>> = blocks.iter().map(|b| b.text("template_name")).collect();
    assert_eq!(
        names,
        vec![Some("Header"), Some("Pricing"), None, None, Some("Footer")]
    );
    assert!(blocks.iter().all(|b| b.platform == Platform::Html5));
    assert!(blocks.windows(2).all(|w| w[0].position < w[1].position));
}

#[tokio::test]
async fn test_render_failure_ends_in_error_without_blocks() {
    let app = create_test_app(Arc::new(FailingRenderer)).await;

    let id = submit(&app, TILDA_URL).await;
    let operation = wait_for_terminal(app.operation_repo.as_ref(), id).await;
    assert_eq!(operation.status, OperationStatus::Error);

    let body: OperationResponseDto = app
        .server
        .get(&format!("/v1/operations/{}", id))
        .await
        .json();
    assert!(body.blocks.is_empty());
}

#[tokio::test]
async fn test_render_timeout_ends_in_error() {
    let app = create_test_app(Arc::new(HangingRenderer)).await;

    let id = submit(&app, TILDA_URL).await;
    let operation = wait_for_terminal(app.operation_repo.as_ref(), id).await;
    assert_eq!(operation.status, OperationStatus::Error);
}

#[tokio::test]
async fn test_concurrent_operations_all_finish() {
    let renderer = StaticRenderer::default()
        .with_page(TILDA_URL, TILDA_PAGE)
        .with_page(LANDING_URL, LANDING_PAGE);
    let app = create_test_app(Arc::new(renderer)).await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(submit(&app, TILDA_URL).await);
        ids.push(submit(&app, LANDING_URL).await);
    }

    for id in ids {
        let operation = wait_for_terminal(app.operation_repo.as_ref(), id).await;
        assert_eq!(operation.status, OperationStatus::Completed);
        assert!(!app.block_repo.list_by_operation(id).await.unwrap().is_empty());
    }
}
