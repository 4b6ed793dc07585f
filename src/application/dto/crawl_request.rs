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

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 爬取请求数据传输对象
#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct CrawlRequestDto {
    /// 起始URL
    #[validate(url)]
    pub url: String,
    /// 最大深度，缺省时使用配置值
    #[validate(range(min = 0, max = 5))]
    pub max_depth: Option<u32>,
}

/// 爬取响应数据传输对象
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CrawlResponseDto {
    /// 起始URL
    pub url: String,
    /// 按抓取顺序排列的页面
    pub links: Vec<String>,
    /// 页面数量
    pub count: usize,
}

impl CrawlResponseDto {
    pub fn new(url: String, links: Vec<String>) -> Self {
        Self {
            url,
            count: links.len(),
            links,
        }
    }
}
