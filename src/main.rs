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

use pageblocks::application::use_cases::crawl_use_case::CrawlUseCase;
use pageblocks::application::use_cases::parse_use_case::ParseUseCase;
use pageblocks::application::use_cases::template_seeding::seed_templates;
use pageblocks::config::rules::{load_template_seeds, RuleBook};
use pageblocks::config::settings::{RendererKind, Settings};
use pageblocks::domain::services::crawl_service::CrawlerService;
use pageblocks::domain::services::structural_extractor::StructuralExtractor;
use pageblocks::engines::chrome_renderer::ChromeRenderer;
use pageblocks::engines::http_renderer::HttpRenderer;
use pageblocks::engines::traits::Renderer;
use pageblocks::infrastructure::database::connection;
use pageblocks::infrastructure::metrics::init_metrics;
use pageblocks::infrastructure::repositories::block_repo_impl::BlockRepositoryImpl;
use pageblocks::infrastructure::repositories::operation_repo_impl::OperationRepositoryImpl;
use pageblocks::infrastructure::repositories::template_repo_impl::TemplateRepositoryImpl;
use pageblocks::presentation::routes;
use pageblocks::queue::job_queue::ChannelJobQueue;
use pageblocks::utils::telemetry;
use pageblocks::workers::manager::WorkerManager;
use pageblocks::workers::parse_worker::ParseWorker;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting pageblocks...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_addr);
    }

    // 3. Connect to database and migrate
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");
    connection::run_migrations(&db).await?;
    info!("Database migrations applied");

    // 4. Selector rules and templates
    let rule_book = RuleBook::load(settings.rules.selectors_path.as_deref())?;
    let extractor = Arc::new(StructuralExtractor::new(&rule_book));

    let operation_repo = Arc::new(OperationRepositoryImpl::new(db.clone()));
    let block_repo = Arc::new(BlockRepositoryImpl::new(db.clone()));
    let template_repo = Arc::new(TemplateRepositoryImpl::new(db.clone()));

    if let Some(path) = settings.rules.templates_path.as_deref() {
        let seeds = load_template_seeds(path)?;
        seed_templates(template_repo.as_ref(), seeds).await?;
    }

    // 5. Renderer
    let renderer: Arc<dyn Renderer> = match settings.renderer.kind {
        RendererKind::Chrome => Arc::new(ChromeRenderer::new(&settings.renderer)),
        RendererKind::Http => Arc::new(HttpRenderer::new(
            &settings.scraper.user_agent,
            settings.renderer.timeout(),
        )?),
    };
    info!("Using {} renderer", renderer.name());

    // 6. Start workers
    let queue = Arc::new(ChannelJobQueue::new(settings.workers.queue_capacity));
    let prototype = ParseWorker::new(
        operation_repo.clone(),
        block_repo.clone(),
        template_repo.clone(),
        renderer,
        extractor,
        settings.renderer.timeout(),
    );
    let mut worker_manager = WorkerManager::new(queue.clone(), prototype);
    worker_manager.start_workers(settings.workers.count);

    // 7. Start HTTP server
    let parse_use_case = Arc::new(ParseUseCase::new(operation_repo, block_repo, queue.clone()));
    let crawler = Arc::new(CrawlerService::new(&settings.scraper)?);
    let crawl_use_case = Arc::new(CrawlUseCase::new(crawler, settings.scraper.max_depth));
    let app = routes::routes(parse_use_case, crawl_use_case);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    worker_manager
        .wait_for_shutdown(settings.workers.shutdown_grace())
        .await;
    server.abort();

    Ok(())
}
