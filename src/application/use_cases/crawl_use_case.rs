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

use crate::application::dto::crawl_request::{CrawlRequestDto, CrawlResponseDto};
use crate::domain::services::crawl_service::{CrawlError, CrawlerService};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use validator::Validate;

#[derive(Error, Debug)]
pub enum CrawlUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Crawl(#[from] CrawlError),
}

/// 爬取用例
///
/// 同步执行爬取并返回发现的页面列表
pub struct CrawlUseCase {
    crawler: Arc<CrawlerService>,
    default_max_depth: u32,
}

impl CrawlUseCase {
    pub fn new(crawler: Arc<CrawlerService>, default_max_depth: u32) -> Self {
        Self {
            crawler,
            default_max_depth,
        }
    }

    /// 执行爬取
    ///
    /// # 参数
    ///
    /// * `dto` - 爬取请求，`max_depth` 缺省时使用配置值
    pub async fn execute(&self, dto: CrawlRequestDto) -> Result<CrawlResponseDto, CrawlUseCaseError> {
        dto.validate()
            .map_err(|e| CrawlUseCaseError::ValidationError(e.to_string()))?;

        let depth = dto.max_depth.unwrap_or(self.default_max_depth);
        let links = self.crawler.crawl(&dto.url, depth).await?;
        info!(url = %dto.url, depth, pages = links.len(), "Crawl finished");

        Ok(CrawlResponseDto::new(dto.url, links))
    }
}
