// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 平台选择器规则集
///
/// 每个语义组件对应一组按声明顺序尝试的CSS选择器。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorRuleSet {
    #[serde(default)]
    pub header: HeaderRules,
    #[serde(default)]
    pub footer: FooterRules,
}

/// 页眉规则
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderRules {
    pub container: Vec<String>,
    pub logo: Vec<String>,
    pub menu: Vec<String>,
    pub search: Vec<String>,
    pub phones: Vec<String>,
    pub cart: Vec<String>,
    pub auth: Vec<String>,
}

/// 页脚规则
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterRules {
    pub container: Vec<String>,
    pub copyright: Vec<String>,
    pub menu: Vec<String>,
    pub contacts: Vec<String>,
    pub social: Vec<String>,
    pub developer: Vec<String>,
}
