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

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::{
    application::{
        dto::crawl_request::CrawlRequestDto,
        use_cases::crawl_use_case::{CrawlUseCase, CrawlUseCaseError},
    },
    domain::services::crawl_service::CrawlError,
};

/// 爬取站点并返回发现的页面
pub async fn create_crawl(
    Extension(use_case): Extension<Arc<CrawlUseCase>>,
    Json(payload): Json<CrawlRequestDto>,
) -> impl IntoResponse {
    match use_case.execute(payload).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

impl From<CrawlUseCaseError> for (StatusCode, String) {
    fn from(err: CrawlUseCaseError) -> Self {
        let status = match &err {
            CrawlUseCaseError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CrawlUseCaseError::Crawl(CrawlError::InvalidUrl { .. })
            | CrawlUseCaseError::Crawl(CrawlError::DomainNotAllowed(_)) => StatusCode::BAD_REQUEST,
            CrawlUseCaseError::Crawl(CrawlError::SeedFetch { .. }) => StatusCode::BAD_GATEWAY,
            CrawlUseCaseError::Crawl(CrawlError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, err.to_string())
    }
}
