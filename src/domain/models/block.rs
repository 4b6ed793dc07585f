// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::operation::DomainError;

/// 块内容：组件名 → 组件值
pub type BlockContent = BTreeMap<String, ComponentValue>;

/// 结构块实体
///
/// 页面中一个语义区域（页眉、页脚或通用内容段）的提取结果。
/// 块创建后不再修改，按 `position` 顺序读取。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 块唯一标识符
    pub id: Uuid,
    /// 所属操作ID
    pub operation_id: Uuid,
    /// 块类型
    pub block_type: BlockType,
    /// 来源平台
    pub platform: Platform,
    /// 组件内容
    pub content: BlockContent,
    /// 块的原始HTML，通用分类器产生的块为空
    pub html: String,
    /// 在操作内的输出序号（从0开始）
    pub position: i32,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

impl Block {
    /// 创建一个尚未归属操作的块
    ///
    /// # 参数
    ///
    /// * `block_type` - 块类型
    /// * `platform` - 来源平台
    /// * `content` - 组件内容
    /// * `html` - 原始HTML
    pub fn new(
        block_type: BlockType,
        platform: Platform,
        content: BlockContent,
        html: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_id: Uuid::nil(),
            block_type,
            platform,
            content,
            html,
            position: 0,
            created_at: Utc::now().into(),
        }
    }

    /// 将块绑定到操作并设置输出序号
    pub fn attach(mut self, operation_id: Uuid, position: i32) -> Self {
        self.operation_id = operation_id;
        self.position = position;
        self
    }

    /// 读取文本组件
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.content.get(key) {
            Some(ComponentValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 读取列表组件
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.content.get(key) {
            Some(ComponentValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// 读取标志组件
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.content.get(key) {
            Some(ComponentValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }
}

/// 组件值
///
/// JSON中以无标签形式序列化：字符串、数组或布尔值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
}

impl ComponentValue {
    /// 判断组件值是否为空
    pub fn is_empty(&self) -> bool {
        match self {
            ComponentValue::Text(s) => s.is_empty(),
            ComponentValue::List(items) => items.is_empty(),
            ComponentValue::Flag(b) => !b,
        }
    }
}

/// 块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Header,
    Footer,
    Content,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockType::Header => write!(f, "header"),
            BlockType::Footer => write!(f, "footer"),
            BlockType::Content => write!(f, "content"),
        }
    }
}

impl FromStr for BlockType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(BlockType::Header),
            "footer" => Ok(BlockType::Footer),
            "content" => Ok(BlockType::Content),
            other => Err(DomainError::ValidationError(format!(
                "unknown block type: {}",
                other
            ))),
        }
    }
}

/// 内容管理平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    WordPress,
    Tilda,
    Bitrix,
    Html5,
    Unknown,
}

impl Platform {
    /// 拥有选择器规则集的平台
    pub const EXTRACTABLE: [Platform; 3] = [Platform::WordPress, Platform::Tilda, Platform::Bitrix];

    /// 是否由结构化提取器处理
    pub fn has_rule_set(&self) -> bool {
        Self::EXTRACTABLE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WordPress => "wordpress",
            Platform::Tilda => "tilda",
            Platform::Bitrix => "bitrix",
            Platform::Html5 => "html5",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wordpress" => Ok(Platform::WordPress),
            "tilda" => Ok(Platform::Tilda),
            "bitrix" => Ok(Platform::Bitrix),
            "html5" => Ok(Platform::Html5),
            "unknown" => Ok(Platform::Unknown),
            other => Err(DomainError::ValidationError(format!(
                "unknown platform: {}",
                other
            ))),
        }
    }
}
