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

use crate::engines::traits::{RenderError, Renderer};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// HTTP渲染器
///
/// 基于reqwest直接获取页面源码，不执行JavaScript
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    /// 创建新的HTTP渲染器
    ///
    /// # 参数
    ///
    /// * `user_agent` - 请求使用的 User-Agent
    /// * `timeout` - 请求超时时间
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, RenderError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    /// 获取页面源码
    ///
    /// # 参数
    ///
    /// * `url` - 页面URL
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 页面HTML
    /// * `Err(RenderError)` - 请求失败或非2xx状态码
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status(status.as_u16()));
        }

        let content = response.text().await?;
        debug!(
            url,
            bytes = content.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Page fetched"
        );
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
