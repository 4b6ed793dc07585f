// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::crawl_use_case::CrawlUseCase;
use crate::application::use_cases::parse_use_case::ParseUseCase;
use crate::domain::repositories::block_repository::BlockRepository;
use crate::domain::repositories::operation_repository::OperationRepository;
use crate::presentation::handlers::{crawl_handler, parse_handler};
use crate::queue::job_queue::JobQueue;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `parse_use_case` - 解析用例
/// * `crawl_use_case` - 爬取用例
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<O, B, Q>(
    parse_use_case: Arc<ParseUseCase<O, B, Q>>,
    crawl_use_case: Arc<CrawlUseCase>,
) -> Router
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    Q: JobQueue + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/v1/parse", post(parse_handler::submit_parse::<O, B, Q>))
        .route(
            "/v1/operations/{id}",
            get(parse_handler::get_operation::<O, B, Q>),
        )
        .route("/v1/crawl", post(crawl_handler::create_crawl))
        .layer(Extension(parse_use_case))
        .layer(Extension(crawl_use_case));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
