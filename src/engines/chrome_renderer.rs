// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RendererSettings;
use crate::engines::traits::{RenderError, Renderer};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

// Shared browser, launched or connected on first use.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

/// 获取或初始化共享浏览器实例
///
/// 配置了远程调试地址时连接已有实例，否则启动本地无头 Chrome
pub async fn get_browser(remote_debugging_url: Option<&str>) -> Result<&'static Browser, RenderError> {
    BROWSER_INSTANCE
        .get_or_try_init(|| async {
            let (browser, mut handler) = if let Some(url) = remote_debugging_url {
                info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url).await.map_err(|e| {
                    RenderError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            } else {
                let config = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()
                    .map_err(RenderError::Browser)?;

                Browser::launch(config)
                    .await
                    .map_err(|e| RenderError::Browser(e.to_string()))?
            };

            // Drive browser events until the connection closes
            tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            Ok(browser)
        })
        .await
}

/// Chrome渲染器
///
/// 基于chromiumoxide加载页面，等待页面稳定后返回最终DOM
pub struct ChromeRenderer {
    remote_debugging_url: Option<String>,
    settle: Duration,
    timeout: Duration,
}

impl ChromeRenderer {
    pub fn new(settings: &RendererSettings) -> Self {
        Self {
            remote_debugging_url: settings.remote_debugging_url.clone(),
            settle: Duration::from_millis(settings.settle_ms),
            timeout: settings.timeout(),
        }
    }

    async fn load(&self, page: &Page) -> Result<String, RenderError> {
        page.wait_for_navigation()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        // Let client-side scripts finish mutating the DOM
        tokio::time::sleep(self.settle).await;

        page.content()
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))
    }
}

/// 可关闭的浏览器标签页
#[async_trait]
trait Tab: Send + 'static {
    async fn close_tab(self) -> Result<(), String>;
}

#[async_trait]
impl Tab for Page {
    async fn close_tab(self) -> Result<(), String> {
        self.close().await.map_err(|e| e.to_string())
    }
}

/// 标签页守卫
///
/// 正常路径显式关闭标签页；若渲染future在关闭前被丢弃，
/// 在后台任务中关闭，共享浏览器中不会残留标签页
struct PageGuard<P: Tab> {
    page: Option<P>,
}

impl<P: Tab> PageGuard<P> {
    fn new(page: P) -> Self {
        Self { page: Some(page) }
    }

    async fn close(mut self, url: &str) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close_tab().await {
                warn!(url, error = %e, "Failed to close page");
            }
        }
    }
}

impl<P: Tab> Drop for PageGuard<P> {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = page.close_tab().await {
                        warn!(error = %e, "Failed to close abandoned page");
                    }
                });
            }
        }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    /// 渲染页面
    ///
    /// # 参数
    ///
    /// * `url` - 页面URL
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 渲染后的HTML
    /// * `Err(RenderError)` - 浏览器错误或超时
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let start = Instant::now();
        let browser = get_browser(self.remote_debugging_url.as_deref()).await?;

        let page = tokio::time::timeout(self.timeout, browser.new_page(url))
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))?
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        let guard = PageGuard::new(page.clone());

        let result = tokio::time::timeout(self.timeout, self.load(&page))
            .await
            .unwrap_or(Err(RenderError::Timeout(self.timeout)));

        guard.close(url).await;

        if let Ok(content) = &result {
            debug!(
                url,
                bytes = content.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Page rendered"
            );
        }
        result
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}
