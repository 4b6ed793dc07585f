// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::rules::RuleBook;
use crate::domain::models::block::{Block, BlockContent, BlockType, ComponentValue, Platform};
use crate::domain::models::rule_set::{FooterRules, HeaderRules, SelectorRuleSet};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

static PHONE_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d\s().\-]{3,}\d").expect("phone pattern is valid"));

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("anchor selector is valid"));

static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("img selector is valid"));

const COPYRIGHT_MARKERS: [&str; 3] = ["©", "&copy;", "(c)"];

/// 提取错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// 页面内容为空
    #[error("markup is empty")]
    EmptyMarkup,
    /// 平台没有选择器规则集
    #[error("no selector rule set for platform {0}")]
    MissingRuleSet(Platform),
}

/// 编译后的选择器链，保留原始文本用于日志
struct SelectorChain(Vec<(String, Selector)>);

impl SelectorChain {
    fn compile(platform: Platform, component: &str, sources: &[String]) -> Self {
        let compiled = sources
            .iter()
            .filter_map(|source| match Selector::parse(source) {
                Ok(selector) => Some((source.clone(), selector)),
                Err(e) => {
                    warn!(%platform, component, selector = %source, error = %e, "Skipping invalid selector");
                    None
                }
            })
            .collect();
        Self(compiled)
    }

    fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.0.iter().map(|(_, s)| s)
    }

    /// 第一个有匹配的选择器的首个匹配
    fn first_in_document<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors().find_map(|s| document.select(s).next())
    }

    /// 第一个有匹配的选择器的全部匹配
    fn first_matching_set<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.selectors()
            .map(|s| scope.select(s).collect::<Vec<_>>())
            .find(|matches| !matches.is_empty())
            .unwrap_or_default()
    }

    /// 按顺序取第一个非空的单值
    fn single_value(&self, scope: ElementRef<'_>) -> String {
        self.selectors()
            .filter_map(|s| scope.select(s).next())
            .map(element_value)
            .find(|v| !v.is_empty())
            .unwrap_or_default()
    }

    fn present(&self, scope: ElementRef<'_>) -> bool {
        self.selectors().any(|s| scope.select(s).next().is_some())
    }
}

struct CompiledHeader {
    container: SelectorChain,
    logo: SelectorChain,
    menu: SelectorChain,
    search: SelectorChain,
    phones: SelectorChain,
    cart: SelectorChain,
    auth: SelectorChain,
}

impl CompiledHeader {
    fn compile(platform: Platform, rules: &HeaderRules) -> Self {
        let chain = |name: &str, sources: &[String]| SelectorChain::compile(platform, name, sources);
        Self {
            container: chain("header.container", &rules.container),
            logo: chain("header.logo", &rules.logo),
            menu: chain("header.menu", &rules.menu),
            search: chain("header.search", &rules.search),
            phones: chain("header.phones", &rules.phones),
            cart: chain("header.cart", &rules.cart),
            auth: chain("header.auth", &rules.auth),
        }
    }
}

struct CompiledFooter {
    container: SelectorChain,
    copyright: SelectorChain,
    menu: SelectorChain,
    contacts: SelectorChain,
    social: SelectorChain,
    developer: SelectorChain,
}

impl CompiledFooter {
    fn compile(platform: Platform, rules: &FooterRules) -> Self {
        let chain = |name: &str, sources: &[String]| SelectorChain::compile(platform, name, sources);
        Self {
            container: chain("footer.container", &rules.container),
            copyright: chain("footer.copyright", &rules.copyright),
            menu: chain("footer.menu", &rules.menu),
            contacts: chain("footer.contacts", &rules.contacts),
            social: chain("footer.social", &rules.social),
            developer: chain("footer.developer", &rules.developer),
        }
    }
}

struct CompiledRuleSet {
    header: CompiledHeader,
    footer: CompiledFooter,
}

impl CompiledRuleSet {
    fn compile(platform: Platform, set: &SelectorRuleSet) -> Self {
        Self {
            header: CompiledHeader::compile(platform, &set.header),
            footer: CompiledFooter::compile(platform, &set.footer),
        }
    }
}

/// 结构化提取器
///
/// 按平台持有编译后的选择器规则，从页面中提取页眉和页脚块。
/// 规则只编译一次，之后只读共享。
pub struct StructuralExtractor {
    rules: HashMap<Platform, CompiledRuleSet>,
}

impl StructuralExtractor {
    /// 从规则集合编译提取器，无效选择器会被跳过并记录警告
    pub fn new(book: &RuleBook) -> Self {
        let rules = Platform::EXTRACTABLE
            .iter()
            .filter_map(|&platform| {
                book.get(platform)
                    .map(|set| (platform, CompiledRuleSet::compile(platform, set)))
            })
            .collect();
        Self { rules }
    }

    /// 是否拥有平台规则
    pub fn supports(&self, platform: Platform) -> bool {
        self.rules.contains_key(&platform)
    }

    fn rule_set(&self, platform: Platform, markup: &str) -> Result<&CompiledRuleSet, ExtractionError> {
        if markup.trim().is_empty() {
            return Err(ExtractionError::EmptyMarkup);
        }
        self.rules
            .get(&platform)
            .ok_or(ExtractionError::MissingRuleSet(platform))
    }

    /// 提取页眉
    ///
    /// # 参数
    ///
    /// * `platform` - 页面平台
    /// * `markup` - 页面HTML
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Block))` - 找到页眉容器
    /// * `Ok(None)` - 没有匹配的容器
    /// * `Err(ExtractionError)` - 页面为空或平台没有规则
    pub fn parse_header(
        &self,
        platform: Platform,
        markup: &str,
    ) -> Result<Option<Block>, ExtractionError> {
        let rules = &self.rule_set(platform, markup)?.header;
        let document = Html::parse_document(markup);
        let Some(container) = rules.container.first_in_document(&document) else {
            return Ok(None);
        };

        let mut content = BlockContent::new();
        content.insert("logo".into(), ComponentValue::Text(rules.logo.single_value(container)));
        content.insert(
            "menu".into(),
            ComponentValue::List(anchor_texts(&rules.menu.first_matching_set(container))),
        );
        content.insert("search".into(), ComponentValue::Flag(rules.search.present(container)));
        content.insert(
            "phones".into(),
            ComponentValue::List(phone_numbers(&rules.phones.first_matching_set(container))),
        );
        content.insert("cart".into(), ComponentValue::Flag(rules.cart.present(container)));
        content.insert("auth".into(), ComponentValue::Flag(rules.auth.present(container)));

        let block = Block::new(BlockType::Header, platform, content, container.html());
        if block.text("logo").map_or(true, str::is_empty) {
            warn!(%platform, "Header has no logo");
        }
        if block.list("menu").map_or(true, |menu| menu.is_empty()) {
            warn!(%platform, "Header has no menu");
        }
        Ok(Some(block))
    }

    /// 提取页脚
    ///
    /// # 参数
    ///
    /// * `platform` - 页面平台
    /// * `markup` - 页面HTML
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Block))` - 找到页脚容器
    /// * `Ok(None)` - 没有匹配的容器
    /// * `Err(ExtractionError)` - 页面为空或平台没有规则
    pub fn parse_footer(
        &self,
        platform: Platform,
        markup: &str,
    ) -> Result<Option<Block>, ExtractionError> {
        let rules = &self.rule_set(platform, markup)?.footer;
        let document = Html::parse_document(markup);
        let Some(container) = rules.container.first_in_document(&document) else {
            return Ok(None);
        };

        let mut copyright = rules.copyright.single_value(container);
        if copyright.is_empty() {
            copyright = copyright_phrase(container).unwrap_or_default();
        }

        let mut content = BlockContent::new();
        content.insert("copyright".into(), ComponentValue::Text(copyright));
        content.insert(
            "menu".into(),
            ComponentValue::List(anchor_texts(&rules.menu.first_matching_set(container))),
        );
        content.insert(
            "contacts".into(),
            ComponentValue::List(element_texts(&rules.contacts.first_matching_set(container))),
        );
        content.insert(
            "social".into(),
            ComponentValue::List(anchor_hrefs(&rules.social.first_matching_set(container))),
        );
        content.insert(
            "developer".into(),
            ComponentValue::Text(rules.developer.single_value(container)),
        );

        let block = Block::new(BlockType::Footer, platform, content, container.html());
        if block.text("copyright").map_or(true, str::is_empty) {
            warn!(%platform, "Footer has no copyright");
        }
        Ok(Some(block))
    }
}

/// 校验电话号码：去掉数字和 `+` 以外的字符后，至少保留一段连续5位数字
pub fn is_valid_phone(candidate: &str) -> bool {
    let stripped: String = candidate
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    stripped.split('+').any(|run| run.len() >= 5)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// 元素的值：文本，其次是自身或首个后代图片的 `src`，最后是 `href`
fn element_value(element: ElementRef<'_>) -> String {
    let text = text_of(element);
    if !text.is_empty() {
        return text;
    }

    let src = element
        .value()
        .attr("src")
        .or_else(|| element.select(&IMAGE).find_map(|img| img.value().attr("src")));
    if let Some(src) = src.map(str::trim).filter(|s| !s.is_empty()) {
        return src.to_string();
    }

    element
        .value()
        .attr("href")
        .map(|h| h.trim().to_string())
        .unwrap_or_default()
}

/// 元素自身为链接时返回自身，否则返回其后代链接
fn anchors<'a>(element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    if element.value().name() == "a" {
        vec![element]
    } else {
        element.select(&ANCHOR).collect()
    }
}

fn anchor_texts(elements: &[ElementRef<'_>]) -> Vec<String> {
    elements
        .iter()
        .flat_map(|e| anchors(*e))
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect()
}

fn anchor_hrefs(elements: &[ElementRef<'_>]) -> Vec<String> {
    elements
        .iter()
        .flat_map(|e| anchors(*e))
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty() && !h.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn element_texts(elements: &[ElementRef<'_>]) -> Vec<String> {
    elements
        .iter()
        .map(|e| text_of(*e))
        .filter(|t| !t.is_empty())
        .collect()
}

fn phone_numbers(elements: &[ElementRef<'_>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phones = Vec::new();
    let mut push = |raw: &str| {
        let raw = raw.trim();
        let key: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if is_valid_phone(raw) && seen.insert(key) {
            phones.push(raw.to_string());
        }
    };

    for element in elements {
        for anchor in anchors(*element) {
            if let Some(number) = anchor
                .value()
                .attr("href")
                .and_then(|h| h.trim().strip_prefix("tel:"))
            {
                push(number);
            }
        }
        for candidate in PHONE_CANDIDATE.find_iter(&text_of(*element)) {
            push(candidate.as_str());
        }
    }
    phones
}

/// 容器文本中第一个带版权标记的文本片段
fn copyright_phrase(container: ElementRef<'_>) -> Option<String> {
    container
        .text()
        .map(collapse_whitespace)
        .find(|fragment| {
            let lowered = fragment.to_lowercase();
            COPYRIGHT_MARKERS.iter().any(|m| lowered.contains(m))
        })
}

#[cfg(test)]
#[path = "structural_extractor_test.rs"]
mod tests;
