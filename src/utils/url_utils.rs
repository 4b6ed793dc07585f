// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 将页面中的链接规范化为可爬取的绝对URL
///
/// 忽略锚点、`mailto:`、`javascript:`、`tel:` 链接；相对链接按页面URL解析；
/// 去除片段；只保留 http/https。
///
/// # 参数
///
/// * `base_url` - 链接所在页面的URL
/// * `href` - 原始链接
///
/// # 返回值
///
/// 可爬取时返回规范化后的URL，否则返回 `None`
pub fn normalize_link(base_url: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    let lowered = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lowered.starts_with("mailto:")
        || lowered.starts_with("javascript:")
        || lowered.starts_with("tel:")
    {
        return None;
    }

    let mut url = resolve_url(base_url, href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// 规范化主机名：小写并去掉末尾的点
pub fn normalize_host(host: &str) -> String {
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// 判断主机名是否属于允许的域名
///
/// 主机名与域名相同，或以 `"." + 域名` 结尾时视为允许。
pub fn host_matches_domain(host: &str, domain: &str) -> bool {
    let host = normalize_host(host);
    let domain = normalize_host(domain);
    if domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// 判断URL是否属于允许的域名列表
pub fn is_url_allowed(url: &Url, allowed_domains: &[String]) -> bool {
    match url.host_str() {
        Some(host) => allowed_domains
            .iter()
            .any(|domain| host_matches_domain(host, domain)),
        None => false,
    }
}
