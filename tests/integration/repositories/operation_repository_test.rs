// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::memory_db;
use pageblocks::domain::models::operation::OperationStatus;
use pageblocks::domain::repositories::operation_repository::{
    OperationRepository, RepositoryError,
};
use pageblocks::infrastructure::repositories::operation_repo_impl::OperationRepositoryImpl;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_find() {
    let repo = OperationRepositoryImpl::new(memory_db().await);

    let created = repo.create("https://example.com/page").await.unwrap();
    assert_eq!(created.status, OperationStatus::Pending);

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.url, "https://example.com/page");
    assert_eq!(found.status, OperationStatus::Pending);

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_status_moves_forward_only() {
    let repo = OperationRepositoryImpl::new(memory_db().await);
    let op = repo.create("https://example.com").await.unwrap();

    let op = repo
        .update_status(op.id, OperationStatus::Processing)
        .await
        .unwrap();
    assert_eq!(op.status, OperationStatus::Processing);

    let op = repo
        .update_status(op.id, OperationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(op.status, OperationStatus::Completed);
    assert!(op.updated_at >= op.created_at);

    for target in [
        OperationStatus::Pending,
        OperationStatus::Processing,
        OperationStatus::Error,
        OperationStatus::Completed,
    ] {
        let err = repo.update_status(op.id, target).await.unwrap_err();
        assert!(
            matches!(err, RepositoryError::InvalidTransition { .. }),
            "{target} should be rejected"
        );
    }

    let stored = repo.find_by_id(op.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OperationStatus::Completed);
}

#[tokio::test]
async fn test_pending_can_fail_directly() {
    let repo = OperationRepositoryImpl::new(memory_db().await);
    let op = repo.create("https://example.com").await.unwrap();

    let op = repo.update_status(op.id, OperationStatus::Error).await.unwrap();
    assert_eq!(op.status, OperationStatus::Error);
}

#[tokio::test]
async fn test_update_missing_operation() {
    let repo = OperationRepositoryImpl::new(memory_db().await);
    let err = repo
        .update_status(Uuid::new_v4(), OperationStatus::Processing)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn test_concurrent_completion_has_single_winner() {
    let repo = Arc::new(OperationRepositoryImpl::new(memory_db().await));
    let op = repo.create("https://example.com").await.unwrap();
    repo.update_status(op.id, OperationStatus::Processing)
        .await
        .unwrap();

    let a = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.update_status(op.id, OperationStatus::Completed).await })
    };
    let b = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.update_status(op.id, OperationStatus::Error).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
}
