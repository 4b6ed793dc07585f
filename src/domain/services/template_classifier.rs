// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::{Block, BlockContent, BlockType, ComponentValue, Platform};
use crate::domain::models::template::BlockTemplate;
use once_cell::sync::Lazy;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("header").expect("header selector is valid"));

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// Children of these elements are serialized verbatim
const RAW_TEXT_ELEMENTS: [&str; 7] = [
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// 页眉块的模板名
pub const HEADER_TEMPLATE: &str = "Header";
/// 页脚块的模板名
pub const FOOTER_TEMPLATE: &str = "Footer";

/// 通用模板分类器
///
/// 在第一个 `<header>` 与其后的 `<footer>` 之间，逐个对同级的
/// `<section>`/`<div>` 按步骤模板进行分类。
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateClassifier;

impl TemplateClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 对页面进行分类
    ///
    /// # 参数
    ///
    /// * `markup` - 页面HTML
    /// * `templates` - 按优先级排列的模板
    /// * `platform` - 写入块的平台
    ///
    /// # 返回值
    ///
    /// 按文档顺序排列的块；页面没有 `<header>` 时为空
    pub fn classify(
        &self,
        markup: &str,
        templates: &[BlockTemplate],
        platform: Platform,
    ) -> Vec<Block> {
        let document = Html::parse_document(markup);
        let Some(header) = document.select(&HEADER).next() else {
            debug!("No <header> element, nothing to classify");
            return Vec::new();
        };

        let mut blocks = vec![named_block(BlockType::Header, platform, HEADER_TEMPLATE)];

        for sibling in header.next_siblings().filter_map(ElementRef::wrap) {
            match sibling.value().name() {
                "footer" => {
                    blocks.push(named_block(BlockType::Footer, platform, FOOTER_TEMPLATE));
                    break;
                }
                "section" | "div" => {
                    let html = visible_html(sibling);
                    let block = match self.match_block(&html, templates) {
                        Some(template) => {
                            debug!(template = %template.name, "Block matched template");
                            named_block(BlockType::Content, platform, &template.name)
                        }
                        None => Block::new(
                            BlockType::Content,
                            platform,
                            BlockContent::new(),
                            String::new(),
                        ),
                    };
                    blocks.push(block);
                }
                _ => {}
            }
        }

        blocks
    }

    /// 返回第一个所有步骤都成立的模板
    pub fn match_block<'t>(
        &self,
        html: &str,
        templates: &'t [BlockTemplate],
    ) -> Option<&'t BlockTemplate> {
        templates.iter().find(|t| t.matches(html))
    }
}

fn named_block(block_type: BlockType, platform: Platform, name: &str) -> Block {
    let mut content = BlockContent::new();
    content.insert(
        "template_name".to_string(),
        ComponentValue::Text(name.to_string()),
    );
    Block::new(block_type, platform, content, String::new())
}

/// 内联样式中含 `visibility:hidden` 或 `display:none` 的元素视为不可见
pub fn is_hidden(element: &Element) -> bool {
    element.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("visibility:hidden") || compact.contains("display:none")
    })
}

/// 序列化元素，去掉所有不可见的子树
pub fn visible_html(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_visible(element, &mut out);
    out
}

fn write_visible(element: ElementRef<'_>, out: &mut String) {
    let value = element.value();
    if is_hidden(value) {
        return;
    }

    let name = value.name();
    out.push('<');
    out.push_str(name);
    for (attr, attr_value) in value.attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(attr_value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_visible(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            let raw: &str = text;
            if RAW_TEXT_ELEMENTS.contains(&name) {
                out.push_str(raw);
            } else {
                out.push_str(&html_escape::encode_text(raw));
            }
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
