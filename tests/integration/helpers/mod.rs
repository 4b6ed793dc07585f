// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.


use axum_test::TestServer;
use pageblocks::application::use_cases::crawl_use_case::CrawlUseCase;
use pageblocks::application::use_cases::parse_use_case::ParseUseCase;
use pageblocks::config::rules::RuleBook;
use pageblocks::config::settings::{DatabaseSettings, ScraperSettings};
use pageblocks::domain::models::operation::Operation;
use pageblocks::domain::repositories::operation_repository::OperationRepository;
use pageblocks::domain::services::crawl_service::CrawlerService;
use pageblocks::domain::services::structural_extractor::StructuralExtractor;
use pageblocks::engines::traits::Renderer;
use pageblocks::infrastructure::database::connection;
use pageblocks::infrastructure::repositories::block_repo_impl::BlockRepositoryImpl;
use pageblocks::infrastructure::repositories::operation_repo_impl::OperationRepositoryImpl;
use pageblocks::infrastructure::repositories::template_repo_impl::TemplateRepositoryImpl;
use pageblocks::presentation::routes;
use pageblocks::queue::job_queue::ChannelJobQueue;
use pageblocks::workers::manager::WorkerManager;
use pageblocks::workers::parse_worker::ParseWorker;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub type TestWorkerManager = WorkerManager<
    ChannelJobQueue,
    OperationRepositoryImpl,
    BlockRepositoryImpl,
    TemplateRepositoryImpl,
>;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db_pool: Arc<DatabaseConnection>,
    pub operation_repo: Arc<OperationRepositoryImpl>,
    pub block_repo: Arc<BlockRepositoryImpl>,
    pub template_repo: Arc<TemplateRepositoryImpl>,
    pub queue: Arc<ChannelJobQueue>,
    pub worker_manager: Option<TestWorkerManager>,
}

/// 创建迁移完成的内存数据库
pub async fn memory_db() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: None,
        min_connections: None,
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = connection::create_pool(&settings)
        .await
        .expect("Failed to open in-memory database");
    connection::run_migrations(&db)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

/// 创建带工作器的测试应用
pub async fn create_test_app(renderer: Arc<dyn Renderer>) -> TestApp {
    create_test_app_with_options(renderer, true, 16).await
}

/// 创建不启动工作器的测试应用，提交的任务留在队列中
pub async fn create_test_app_no_worker(queue_capacity: usize) -> TestApp {
    create_test_app_with_options(
        Arc::new(stub_renderer::FailingRenderer),
        false,
        queue_capacity,
    )
    .await
}

async fn create_test_app_with_options(
    renderer: Arc<dyn Renderer>,
    start_worker: bool,
    queue_capacity: usize,
) -> TestApp {
    let db_pool = memory_db().await;
    let operation_repo = Arc::new(OperationRepositoryImpl::new(db_pool.clone()));
    let block_repo = Arc::new(BlockRepositoryImpl::new(db_pool.clone()));
    let template_repo = Arc::new(TemplateRepositoryImpl::new(db_pool.clone()));
    let queue = Arc::new(ChannelJobQueue::new(queue_capacity));

    let worker_manager = if start_worker {
        let prototype = ParseWorker::new(
            operation_repo.clone(),
            block_repo.clone(),
            template_repo.clone(),
            renderer,
            Arc::new(StructuralExtractor::new(&RuleBook::builtin())),
            Duration::from_secs(2),
        );
        let mut manager = WorkerManager::new(queue.clone(), prototype);
        manager.start_workers(2);
        Some(manager)
    } else {
        None
    };

    let parse_use_case = Arc::new(ParseUseCase::new(
        operation_repo.clone(),
        block_repo.clone(),
        queue.clone(),
    ));
    let scraper = ScraperSettings {
        allowed_domains: vec!["127.0.0.1".to_string()],
        timeout_secs: 5,
        ..ScraperSettings::default()
    };
    let crawler = Arc::new(CrawlerService::new(&scraper).expect("Failed to build crawler"));
    let crawl_use_case = Arc::new(CrawlUseCase::new(crawler, scraper.max_depth));

    let server = TestServer::new(routes::routes(parse_use_case, crawl_use_case))
        .expect("Failed to start test server");

    TestApp {
        server,
        db_pool,
        operation_repo,
        block_repo,
        template_repo,
        queue,
        worker_manager,
    }
}

/// 轮询直到操作进入终态
pub async fn wait_for_terminal<O>(repo: &O, id: Uuid) -> Operation
where
    O: OperationRepository,
{
    for _ in 0..100 {
        if let Some(operation) = repo.find_by_id(id).await.expect("lookup failed") {
            if operation.status.is_terminal() {
                return operation;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("Operation {} did not finish in time", id);
}
