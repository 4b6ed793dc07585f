// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::block::Platform;

/// 模板解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// 步骤定义不是JSON对象
    #[error("template steps must be an object")]
    NotAnObject,
    /// 缺少 step1
    #[error("template has no step1")]
    MissingFirstStep,
    /// 步骤类型无效
    #[error("step {step} is neither a string nor a list of strings")]
    InvalidStep { step: String },
}

/// 模板步骤
///
/// 单个字面量令牌，或若干备选令牌（任一出现即满足）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateStep {
    Token(String),
    AnyOf(Vec<String>),
}

impl TemplateStep {
    /// 解析单个步骤
    ///
    /// 空令牌（如 `"A|"` 中的空备选）会匹配任意块，因此视为无效步骤
    fn parse(key: &str, value: &Value) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidStep {
            step: key.to_string(),
        };
        let token = |t: &str| {
            if t.is_empty() {
                Err(invalid())
            } else {
                Ok(t.to_string())
            }
        };

        match value {
            Value::String(s) if s.contains('|') => s
                .split('|')
                .map(token)
                .collect::<Result<Vec<_>, _>>()
                .map(TemplateStep::AnyOf),
            Value::String(s) => token(s).map(TemplateStep::Token),
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| item.as_str().ok_or_else(invalid).and_then(token))
                .collect::<Result<Vec<_>, _>>()
                .map(TemplateStep::AnyOf),
            _ => Err(invalid()),
        }
    }

    /// 判断步骤是否在HTML中成立
    pub fn matches(&self, html: &str) -> bool {
        match self {
            TemplateStep::Token(token) => html.contains(token.as_str()),
            TemplateStep::AnyOf(tokens) => tokens.iter().any(|t| html.contains(t.as_str())),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            TemplateStep::Token(token) => Value::String(token.clone()),
            TemplateStep::AnyOf(tokens) => {
                Value::Array(tokens.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// 块模板
///
/// 由有序步骤 `step1..stepN` 组成，所有步骤都成立时模板匹配。
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTemplate {
    pub id: Uuid,
    pub name: String,
    pub platform: Platform,
    pub priority: i32,
    pub steps: Vec<TemplateStep>,
}

impl BlockTemplate {
    /// 从存储的JSON步骤定义构建模板
    ///
    /// 步骤从 `step1` 开始连续读取，遇到第一个缺失的序号即停止。
    ///
    /// # 参数
    ///
    /// * `id` - 模板ID
    /// * `name` - 模板名称
    /// * `platform` - 所属平台
    /// * `priority` - 优先级，数值越小越先匹配
    /// * `steps` - JSON步骤对象
    ///
    /// # 返回值
    ///
    /// * `Ok(BlockTemplate)` - 解析成功
    /// * `Err(TemplateError)` - 步骤定义无效
    pub fn from_json(
        id: Uuid,
        name: String,
        platform: Platform,
        priority: i32,
        steps: &Value,
    ) -> Result<Self, TemplateError> {
        let object = steps.as_object().ok_or(TemplateError::NotAnObject)?;
        if !object.contains_key("step1") {
            return Err(TemplateError::MissingFirstStep);
        }

        let mut parsed = Vec::new();
        for index in 1.. {
            let key = format!("step{}", index);
            match object.get(&key) {
                Some(value) => parsed.push(TemplateStep::parse(&key, value)?),
                None => break,
            }
        }

        Ok(Self {
            id,
            name,
            platform,
            priority,
            steps: parsed,
        })
    }

    /// 将步骤序列化为存储格式
    pub fn steps_json(&self) -> Value {
        let mut object = Map::new();
        for (index, step) in self.steps.iter().enumerate() {
            object.insert(format!("step{}", index + 1), step.to_json());
        }
        Value::Object(object)
    }

    /// 判断HTML是否满足所有步骤
    pub fn matches(&self, html: &str) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|step| step.matches(html))
    }
}

/// 模板种子定义
///
/// 启动时从YAML文件加载，写入模板仓库。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateSeed {
    pub name: String,
    pub platform: Platform,
    #[serde(default)]
    pub priority: i32,
    pub steps: Value,
}

impl TemplateSeed {
    /// 转换为模板实体
    pub fn into_template(self) -> Result<BlockTemplate, TemplateError> {
        BlockTemplate::from_json(
            Uuid::new_v4(),
            self.name,
            self.platform,
            self.priority,
            &self.steps,
        )
    }
}
