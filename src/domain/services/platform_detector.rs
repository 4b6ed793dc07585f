// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::Platform;
use tracing::debug;

/// 平台签名匹配器
pub trait SignatureMatcher: Send + Sync {
    /// 匹配成功时返回的平台
    fn platform(&self) -> Platform;
    /// 判断页面是否带有该平台的签名
    fn matches(&self, markup: &str) -> bool;
}

/// 基于字面量子串的签名匹配器
pub struct LiteralSignatures {
    platform: Platform,
    patterns: &'static [&'static str],
    case_insensitive: bool,
}

impl LiteralSignatures {
    pub const fn new(platform: Platform, patterns: &'static [&'static str]) -> Self {
        Self {
            platform,
            patterns,
            case_insensitive: false,
        }
    }

    /// 大小写不敏感匹配，模式须为小写
    pub const fn case_insensitive(platform: Platform, patterns: &'static [&'static str]) -> Self {
        Self {
            platform,
            patterns,
            case_insensitive: true,
        }
    }
}

impl SignatureMatcher for LiteralSignatures {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn matches(&self, markup: &str) -> bool {
        let hit = if self.case_insensitive {
            let lowered = markup.to_lowercase();
            self.patterns.iter().find(|p| lowered.contains(*p))
        } else {
            self.patterns.iter().find(|p| markup.contains(*p))
        };

        if let Some(pattern) = hit {
            debug!(platform = %self.platform, pattern, "Platform signature detected");
            return true;
        }
        false
    }
}

const WORDPRESS_SIGNATURES: &[&str] = &[
    "wp-content",
    "wp-includes",
    "wp-json",
    r#"<meta name="generator" content="WordPress"#,
    r#"class="wordpress""#,
    "/wp-admin/",
    "/wp-login.php",
];

const TILDA_SIGNATURES: &[&str] = &[
    "tilda.ws",
    "tildacdn.com",
    r#"<meta name="generator" content="Tilda"#,
    "data-tilda",
    r#"class="t-body"#,
    r#"id="allrecords""#,
];

const BITRIX_SIGNATURES: &[&str] = &[
    "bitrix/js",
    "bitrix/templates",
    r#"<meta name="generator" content="Bitrix"#,
    "BX.",
    "b24-widget",
    r#"class="bx-"#,
];

const HTML5_SIGNATURES: &[&str] = &["<!doctype html>", r#"<meta charset="utf-8">"#, "<html lang"];

/// 平台检测器
///
/// 按顺序执行签名匹配器，第一个匹配的平台胜出；
/// 具体平台排在通用 HTML5 之前。
pub struct PlatformDetector {
    matchers: Vec<Box<dyn SignatureMatcher>>,
}

impl PlatformDetector {
    /// 使用默认签名级联创建检测器
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(LiteralSignatures::new(Platform::WordPress, WORDPRESS_SIGNATURES)),
            Box::new(LiteralSignatures::new(Platform::Tilda, TILDA_SIGNATURES)),
            Box::new(LiteralSignatures::new(Platform::Bitrix, BITRIX_SIGNATURES)),
            Box::new(LiteralSignatures::case_insensitive(Platform::Html5, HTML5_SIGNATURES)),
        ])
    }

    pub fn with_matchers(matchers: Vec<Box<dyn SignatureMatcher>>) -> Self {
        Self { matchers }
    }

    /// 检测页面所属平台
    ///
    /// # 参数
    ///
    /// * `markup` - 页面HTML
    ///
    /// # 返回值
    ///
    /// 第一个匹配的平台，均不匹配时返回 `Platform::Unknown`
    pub fn detect(&self, markup: &str) -> Platform {
        self.matchers
            .iter()
            .find(|m| m.matches(markup))
            .map(|m| m.platform())
            .unwrap_or(Platform::Unknown)
    }
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self::new()
    }
}
