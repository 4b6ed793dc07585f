// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::memory_db;
use pageblocks::domain::models::block::{Block, BlockContent, BlockType, ComponentValue, Platform};
use pageblocks::domain::repositories::block_repository::BlockRepository;
use pageblocks::domain::repositories::operation_repository::OperationRepository;
use pageblocks::infrastructure::repositories::block_repo_impl::BlockRepositoryImpl;
use pageblocks::infrastructure::repositories::operation_repo_impl::OperationRepositoryImpl;

fn header_block() -> Block {
    let mut content = BlockContent::new();
    content.insert("logo".into(), ComponentValue::Text("/logo.png".into()));
    content.insert(
        "menu".into(),
        ComponentValue::List(vec!["Home".into(), "Blog".into()]),
    );
    content.insert("search".into(), ComponentValue::Flag(true));
    Block::new(
        BlockType::Header,
        Platform::WordPress,
        content,
        "<header>…</header>".to_string(),
    )
}

#[tokio::test]
async fn test_blocks_round_trip_in_position_order() {
    let db = memory_db().await;
    let operations = OperationRepositoryImpl::new(db.clone());
    let blocks = BlockRepositoryImpl::new(db);
    let op = operations.create("https://example.com").await.unwrap();

    let footer = Block::new(
        BlockType::Footer,
        Platform::WordPress,
        BlockContent::new(),
        String::new(),
    )
    .attach(op.id, 1);
    let header = header_block().attach(op.id, 0);

    // Insert out of order; listing sorts by position
    blocks.save(&footer).await.unwrap();
    blocks.save(&header).await.unwrap();

    let stored = blocks.list_by_operation(op.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, header.id);
    assert_eq!(stored[0].content, header.content);
    assert_eq!(stored[0].html, header.html);
    assert_eq!(stored[0].flag("search"), Some(true));
    assert_eq!(stored[1].block_type, BlockType::Footer);
}

#[tokio::test]
async fn test_blocks_are_scoped_to_operation() {
    let db = memory_db().await;
    let operations = OperationRepositoryImpl::new(db.clone());
    let blocks = BlockRepositoryImpl::new(db);
    let first = operations.create("https://a.example.com").await.unwrap();
    let second = operations.create("https://b.example.com").await.unwrap();

    blocks.save(&header_block().attach(first.id, 0)).await.unwrap();

    assert_eq!(blocks.list_by_operation(first.id).await.unwrap().len(), 1);
    assert!(blocks.list_by_operation(second.id).await.unwrap().is_empty());
}
