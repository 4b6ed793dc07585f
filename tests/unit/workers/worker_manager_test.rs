// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器管理器测试模块
///
/// 验证工作器的启动与关闭
use crate::integration::helpers::memory_db;
use crate::integration::helpers::stub_renderer::{FailingRenderer, HangingRenderer};
use pageblocks::config::rules::RuleBook;
use pageblocks::domain::models::operation::OperationStatus;
use pageblocks::domain::repositories::operation_repository::OperationRepository;
use pageblocks::domain::services::structural_extractor::StructuralExtractor;
use pageblocks::engines::traits::Renderer;
use pageblocks::infrastructure::repositories::block_repo_impl::BlockRepositoryImpl;
use pageblocks::infrastructure::repositories::operation_repo_impl::OperationRepositoryImpl;
use pageblocks::infrastructure::repositories::template_repo_impl::TemplateRepositoryImpl;
use pageblocks::queue::job_queue::{ChannelJobQueue, JobQueue, ParseJob};
use pageblocks::workers::manager::WorkerManager;
use pageblocks::workers::parse_worker::ParseWorker;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

type Manager = WorkerManager<
    ChannelJobQueue,
    OperationRepositoryImpl,
    BlockRepositoryImpl,
    TemplateRepositoryImpl,
>;

async fn setup(
    renderer: Arc<dyn Renderer>,
    render_timeout: Duration,
) -> (Manager, Arc<ChannelJobQueue>, Arc<OperationRepositoryImpl>) {
    let db = memory_db().await;
    let operations = Arc::new(OperationRepositoryImpl::new(db.clone()));
    let queue = Arc::new(ChannelJobQueue::new(8));
    let prototype = ParseWorker::new(
        operations.clone(),
        Arc::new(BlockRepositoryImpl::new(db.clone())),
        Arc::new(TemplateRepositoryImpl::new(db)),
        renderer,
        Arc::new(StructuralExtractor::new(&RuleBook::builtin())),
        render_timeout,
    );
    (WorkerManager::new(queue.clone(), prototype), queue, operations)
}

async fn submit(
    operations: &OperationRepositoryImpl,
    queue: &ChannelJobQueue,
    url: &str,
) -> Uuid {
    let operation = operations.create(url).await.unwrap();
    operations
        .update_status(operation.id, OperationStatus::Processing)
        .await
        .unwrap();
    queue
        .try_enqueue(ParseJob {
            operation_id: operation.id,
            url: url.to_string(),
        })
        .unwrap();
    operation.id
}

async fn status_of(operations: &OperationRepositoryImpl, id: Uuid) -> OperationStatus {
    operations.find_by_id(id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn test_start_and_shutdown_idle_workers() {
    let (mut manager, queue, _) = setup(Arc::new(FailingRenderer), Duration::from_secs(1)).await;
    manager.start_workers(3);
    assert_eq!(manager.worker_count(), 3);

    let abandoned = tokio::time::timeout(
        Duration::from_secs(2),
        manager.shutdown(Duration::from_secs(5)),
    )
    .await
    .expect("idle workers should stop once the queue closes");

    assert_eq!(abandoned, 0);
    assert_eq!(manager.worker_count(), 0);
    assert!(queue.is_closed());
}

#[tokio::test]
async fn test_shutdown_drains_queued_jobs() {
    let (mut manager, queue, operations) =
        setup(Arc::new(FailingRenderer), Duration::from_secs(1)).await;
    let first = submit(&operations, &queue, "https://one.test/").await;
    let second = submit(&operations, &queue, "https://two.test/").await;

    manager.start_workers(1);
    let abandoned = manager.shutdown(Duration::from_secs(5)).await;

    assert_eq!(abandoned, 0);
    assert_eq!(queue.pending(), 0);
    // Processed to a terminal state, not left behind in processing
    assert_eq!(status_of(&operations, first).await, OperationStatus::Error);
    assert_eq!(status_of(&operations, second).await, OperationStatus::Error);
}

#[tokio::test]
async fn test_unfinished_operations_fail_after_grace_period() {
    let (mut manager, queue, operations) =
        setup(Arc::new(HangingRenderer), Duration::from_secs(3600)).await;
    let in_flight = submit(&operations, &queue, "https://slow.test/a").await;
    let queued = submit(&operations, &queue, "https://slow.test/b").await;

    manager.start_workers(1);
    // Let the worker pick up the first job and block in render
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.pending(), 1);

    let abandoned = manager.shutdown(Duration::from_millis(100)).await;

    assert_eq!(abandoned, 2);
    assert_eq!(manager.worker_count(), 0);
    assert_eq!(status_of(&operations, in_flight).await, OperationStatus::Error);
    assert_eq!(status_of(&operations, queued).await, OperationStatus::Error);
}
