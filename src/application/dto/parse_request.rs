// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 解析请求数据传输对象
#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct ParseRequestDto {
    /// 要解析的页面URL
    #[validate(url)]
    pub url: String,
}
