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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// 默认允许爬取的域名
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 5] = [
    "botcreators.ru",
    "structura.app",
    "automatisation.art",
    "mindbox.ru",
    "skillfactory.ru",
];

/// 应用程序配置设置
///
/// 包含服务器、数据库、爬虫、渲染器、工作器、规则和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 爬虫配置
    pub scraper: ScraperSettings,
    /// 渲染器配置
    pub renderer: RendererSettings,
    /// 工作器配置
    pub workers: WorkerSettings,
    /// 规则文件配置
    #[serde(default)]
    pub rules: RulesSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 单次抓取超时时间（秒）
    pub timeout_secs: u64,
    /// 默认最大爬取深度
    pub max_depth: u32,
    /// 允许爬取的域名列表
    pub allowed_domains: Vec<String>,
    /// 同时进行的最大抓取数
    pub max_concurrent_fetches: usize,
}

impl ScraperSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_depth: 2,
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            max_concurrent_fetches: 8,
        }
    }
}

/// 渲染器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// 无头 Chrome 渲染
    Chrome,
    /// 纯HTTP抓取
    Http,
}

/// 渲染器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RendererSettings {
    /// 渲染器类型
    pub kind: RendererKind,
    /// 渲染超时时间（秒）
    pub timeout_secs: u64,
    /// 页面加载后的等待时间（毫秒）
    pub settle_ms: u64,
    /// 远程调试地址，设置后连接已有的 Chrome 实例
    pub remote_debugging_url: Option<String>,
}

impl RendererSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 工作器数量
    pub count: usize,
    /// 任务队列容量
    pub queue_capacity: usize,
    /// 关闭时等待剩余任务完成的秒数
    pub shutdown_grace_secs: u64,
}

impl WorkerSettings {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// 规则文件配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesSettings {
    /// 选择器规则覆盖文件（YAML）
    pub selectors_path: Option<String>,
    /// 块模板种子文件（YAML）
    pub templates_path: Option<String>,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次合并默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `PAGEBLOCKS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PAGEBLOCKS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scraper.allowed_domains")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        let scraper = ScraperSettings::default();
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.url", "sqlite::memory:")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Crawler
            .set_default("scraper.user_agent", scraper.user_agent)?
            .set_default("scraper.timeout_secs", scraper.timeout_secs)?
            .set_default("scraper.max_depth", scraper.max_depth as u64)?
            .set_default("scraper.allowed_domains", scraper.allowed_domains)?
            .set_default(
                "scraper.max_concurrent_fetches",
                scraper.max_concurrent_fetches as u64,
            )?
            // Renderer
            .set_default("renderer.kind", "chrome")?
            .set_default("renderer.timeout_secs", 30)?
            .set_default("renderer.settle_ms", 2000)?
            // Workers
            .set_default("workers.count", 4)?
            .set_default("workers.queue_capacity", 64)?
            .set_default("workers.shutdown_grace_secs", 30)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
