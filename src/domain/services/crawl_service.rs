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

use crate::config::settings::ScraperSettings;
use crate::utils::url_utils::{is_url_allowed, normalize_link};
use futures::future::{join_all, BoxFuture, FutureExt};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// 爬取错误类型
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 种子URL格式错误
    #[error("Invalid seed URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// 种子URL不在允许的域名内
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),
    /// 种子页面抓取失败
    #[error("Failed to fetch seed {url}: {reason}")]
    SeedFetch { url: String, reason: String },
    /// HTTP 客户端构建失败
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("fetch limiter closed")]
    Closed,
}

/// 单次爬取的上下文
///
/// 持有已访问集合、成功抓取的URL和并发抓取许可，贯穿每一层递归。
pub struct CrawlContext {
    visited: Mutex<HashSet<String>>,
    fetched: Mutex<Vec<String>>,
    permits: Semaphore,
}

impl CrawlContext {
    pub fn new(max_concurrent_fetches: usize) -> Self {
        Self {
            visited: Mutex::new(HashSet::new()),
            fetched: Mutex::new(Vec::new()),
            permits: Semaphore::new(max_concurrent_fetches.max(1)),
        }
    }

    /// 原子地占用URL，首次占用返回 `true`
    pub fn claim(&self, url: &Url) -> bool {
        self.visited.lock().insert(url.to_string())
    }

    /// 已占用的URL数量
    pub fn visited_count(&self) -> usize {
        self.visited.lock().len()
    }

    fn record(&self, url: &Url) {
        self.fetched.lock().push(url.to_string());
    }

    fn into_fetched(self) -> Vec<String> {
        self.fetched.into_inner()
    }
}

/// 爬虫服务
///
/// 从种子URL出发，在允许的域名内按深度限制并发遍历页面
pub struct CrawlerService {
    client: reqwest::Client,
    allowed_domains: Vec<String>,
    max_concurrent_fetches: usize,
}

impl CrawlerService {
    /// 创建新的爬虫服务实例
    ///
    /// # 参数
    ///
    /// * `settings` - 爬虫配置
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlerService)` - 爬虫服务
    /// * `Err(CrawlError)` - HTTP 客户端构建失败
    pub fn new(settings: &ScraperSettings) -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            allowed_domains: settings.allowed_domains.clone(),
            max_concurrent_fetches: settings.max_concurrent_fetches,
        })
    }

    /// 允许的域名列表
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    /// 判断URL是否属于允许的域名
    pub fn is_allowed_domain(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|u| is_url_allowed(&u, &self.allowed_domains))
            .unwrap_or(false)
    }

    /// 执行爬取
    ///
    /// `max_depth = 0` 不抓取任何页面；`max_depth = 1` 只抓取种子页面。
    ///
    /// # 参数
    ///
    /// * `seed_url` - 种子URL
    /// * `max_depth` - 最大深度
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 成功抓取的URL，种子在首位
    /// * `Err(CrawlError)` - 种子URL无效、不允许或抓取失败
    #[instrument(skip(self))]
    pub async fn crawl(&self, seed_url: &str, max_depth: u32) -> Result<Vec<String>, CrawlError> {
        let seed = parse_seed(seed_url)?;
        if !is_url_allowed(&seed, &self.allowed_domains) {
            return Err(CrawlError::DomainNotAllowed(seed_url.to_string()));
        }
        if max_depth == 0 {
            return Ok(Vec::new());
        }

        let ctx = CrawlContext::new(self.max_concurrent_fetches);
        ctx.claim(&seed);

        let body = self
            .fetch(&ctx, &seed)
            .await
            .map_err(|e| CrawlError::SeedFetch {
                url: seed.to_string(),
                reason: e.to_string(),
            })?;
        ctx.record(&seed);
        metrics::counter!("crawl_pages_fetched_total").increment(1);

        if let Some(html) = body {
            self.expand(&ctx, &seed, html, max_depth - 1).await;
        }

        let fetched = ctx.into_fetched();
        info!(count = fetched.len(), "Crawl finished");
        Ok(fetched)
    }

    fn expand<'a>(
        &'a self,
        ctx: &'a CrawlContext,
        page_url: &'a Url,
        html: String,
        depth: u32,
    ) -> BoxFuture<'a, ()> {
        async move {
            if depth == 0 {
                return;
            }

            let children: Vec<Url> = LinkDiscoverer::extract_links(&html, page_url)
                .into_iter()
                .filter(|link| is_url_allowed(link, &self.allowed_domains))
                .filter(|link| ctx.claim(link))
                .collect();

            debug!(page = %page_url, children = children.len(), depth, "Expanding page");
            join_all(children.into_iter().map(|child| self.visit(ctx, child, depth))).await;
        }
        .boxed()
    }

    async fn visit(&self, ctx: &CrawlContext, url: Url, depth: u32) {
        match self.fetch(ctx, &url).await {
            Ok(body) => {
                ctx.record(&url);
                metrics::counter!("crawl_pages_fetched_total").increment(1);
                if let Some(html) = body {
                    self.expand(ctx, &url, html, depth - 1).await;
                }
            }
            Err(e) => warn!(url = %url, error = %e, "Skipping branch"),
        }
    }

    /// 抓取页面，非HTML响应返回 `Ok(None)`
    async fn fetch(&self, ctx: &CrawlContext, url: &Url) -> Result<Option<String>, FetchError> {
        let _permit = ctx.permits.acquire().await.map_err(|_| FetchError::Closed)?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"));
        if !is_html {
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

fn parse_seed(seed_url: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidUrl {
        url: seed_url.to_string(),
        reason,
    };
    let mut url = Url::parse(seed_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    url.set_fragment(None);
    Ok(url)
}

/// 链接发现器
///
/// 负责从HTML内容中提取可爬取的链接
pub struct LinkDiscoverer;

impl LinkDiscoverer {
    /// 从HTML内容中提取链接
    ///
    /// # 参数
    ///
    /// * `html_content` - HTML内容
    /// * `base_url` - 页面URL
    ///
    /// # 返回值
    ///
    /// 去重后的绝对URL，保持文档顺序
    pub fn extract_links(html_content: &str, base_url: &Url) -> Vec<Url> {
        let document = Html::parse_document(html_content);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| normalize_link(base_url, href))
            .filter(|url| seen.insert(url.to_string()))
            .collect()
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
