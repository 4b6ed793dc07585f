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

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// 渲染错误类型
#[derive(Error, Debug)]
pub enum RenderError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 超时
    #[error("Render timed out after {0:?}")]
    Timeout(Duration),
}

/// 页面渲染器特质
///
/// 返回页面最终的DOM标记
#[async_trait]
pub trait Renderer: Send + Sync {
    /// 渲染页面
    async fn render(&self, url: &str) -> Result<String, RenderError>;

    /// 渲染器名称
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: Renderer + ?Sized> Renderer for Arc<T> {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        (**self).render(url).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
