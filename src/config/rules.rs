// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::models::block::Platform;
use crate::domain::models::rule_set::{FooterRules, HeaderRules, SelectorRuleSet};
use crate::domain::models::template::TemplateSeed;

/// 规则文件加载错误
#[derive(Error, Debug)]
pub enum RulesError {
    /// 文件读取失败
    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML 解析失败
    #[error("Invalid rules YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// 平台不支持选择器规则
    #[error("Platform {0} has no selector rule set")]
    UnsupportedPlatform(Platform),
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 各平台的选择器规则集合
///
/// 默认使用内置规则，可通过 YAML 文件按平台整体覆盖。
#[derive(Debug, Clone)]
pub struct RuleBook {
    sets: HashMap<Platform, SelectorRuleSet>,
}

impl RuleBook {
    /// 内置规则
    pub fn builtin() -> Self {
        let mut sets = HashMap::new();
        sets.insert(Platform::WordPress, wordpress_rules());
        sets.insert(Platform::Tilda, tilda_rules());
        sets.insert(Platform::Bitrix, bitrix_rules());
        Self { sets }
    }

    /// 在内置规则之上应用 YAML 覆盖
    ///
    /// YAML 顶层为 `平台名 → 规则集` 的映射，出现的平台整体替换内置规则。
    ///
    /// # 参数
    ///
    /// * `yaml` - YAML 文本
    ///
    /// # 返回值
    ///
    /// * `Ok(RuleBook)` - 合并后的规则
    /// * `Err(RulesError)` - 解析失败或平台不支持规则集
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RulesError> {
        let overrides: HashMap<Platform, SelectorRuleSet> = serde_yaml::from_str(yaml)?;
        let mut book = Self::builtin();
        for (platform, set) in overrides {
            if !platform.has_rule_set() {
                return Err(RulesError::UnsupportedPlatform(platform));
            }
            info!("Overriding selector rules for platform {}", platform);
            book.sets.insert(platform, set);
        }
        Ok(book)
    }

    /// 加载规则，未配置路径时使用内置规则
    pub fn load(path: Option<&str>) -> Result<Self, RulesError> {
        match path {
            Some(path) => Self::from_yaml_str(&read_file(path)?),
            None => Ok(Self::builtin()),
        }
    }

    /// 获取平台规则集
    pub fn get(&self, platform: Platform) -> Option<&SelectorRuleSet> {
        self.sets.get(&platform)
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 从 YAML 文件加载模板种子
///
/// # 参数
///
/// * `path` - 文件路径，内容为模板种子列表
pub fn load_template_seeds(path: &str) -> Result<Vec<TemplateSeed>, RulesError> {
    parse_template_seeds(&read_file(path)?)
}

/// 解析模板种子 YAML 文本
pub fn parse_template_seeds(yaml: &str) -> Result<Vec<TemplateSeed>, RulesError> {
    Ok(serde_yaml::from_str(yaml)?)
}

fn read_file(path: &str) -> Result<String, RulesError> {
    std::fs::read_to_string(Path::new(path)).map_err(|source| RulesError::Io {
        path: path.to_string(),
        source,
    })
}

fn wordpress_rules() -> SelectorRuleSet {
    SelectorRuleSet {
        header: HeaderRules {
            container: list(&["header#masthead", "header.site-header", ".site-header", "#header", "header"]),
            logo: list(&[".custom-logo-link", ".site-logo", ".site-title a", "a.logo", "[class*=logo] img"]),
            menu: list(&["#site-navigation", ".main-navigation", "nav .menu", "nav"]),
            search: list(&["form.search-form", "form[role=search]", "input[type=search]"]),
            phones: list(&["a[href^='tel:']", ".header-phone", ".phone"]),
            cart: list(&[".cart-contents", ".site-header-cart", "a[href*=cart]"]),
            auth: list(&["a[href*='wp-login.php']", "a[href*=my-account]", ".login"]),
        },
        footer: FooterRules {
            container: list(&["footer#colophon", "footer.site-footer", ".site-footer", "#footer", "footer"]),
            copyright: list(&[".site-info", ".copyright", "[class*=copyright]"]),
            menu: list(&[".footer-navigation", ".footer-menu", "nav"]),
            contacts: list(&[".footer-contacts", ".contact", "address"]),
            social: list(&[".social-navigation", ".social-links", "[class*=social]"]),
            developer: list(&["a[rel=designer]", ".developer"]),
        },
    }
}

fn tilda_rules() -> SelectorRuleSet {
    SelectorRuleSet {
        header: HeaderRules {
            container: list(&[".t-header", ".tn-header", "[data-record-type='257']", "header"]),
            logo: list(&[".t-logo__img", ".t-logo", ".t228__logo", ".tn-atom img"]),
            menu: list(&[".t-menu__list", ".t228__list", ".t-menu", ".t-menu__wrapper"]),
            search: list(&[".t-search", ".t-site-search-input"]),
            phones: list(&["a[href^='tel:']", ".t-phone", ".t228__right_descr"]),
            cart: list(&[".t706__carticon", ".t-cart"]),
            auth: list(&[".t-auth", "a[href*=members]"]),
        },
        footer: FooterRules {
            container: list(&[".t-footer", ".tn-footer", "[data-record-type='420']", "footer"]),
            copyright: list(&[".t-copyright", ".t420__text", ".t-text_xs"]),
            menu: list(&[".t-footer__menu", ".t420__col", "nav"]),
            contacts: list(&[".t-address", ".t-contacts", ".t420__descr"]),
            social: list(&[".t-sociallinks", ".t-social", "[class*=social]"]),
            developer: list(&[".t-developer", "a[href*='tilda.cc']"]),
        },
    }
}

fn bitrix_rules() -> SelectorRuleSet {
    SelectorRuleSet {
        header: HeaderRules {
            container: list(&["header", "#header", ".bx-header", ".header"]),
            logo: list(&[".bx-logo", "#logo", ".logo"]),
            menu: list(&[".bx-top-nav", ".bx-menu", ".main-menu", ".bx-menu-container", "nav"]),
            search: list(&[".bx-search-form", "form[name=search]", ".search-form", "input[name=q]"]),
            phones: list(&["a[href^='tel:']", ".bx-phone", ".phone"]),
            cart: list(&[".bx-basket", ".basket-line", "a[href*=basket]"]),
            auth: list(&[".bx-auth", ".bx-login", "a[href*=login]", "a[href*=auth]"]),
        },
        footer: FooterRules {
            container: list(&["footer", "#footer", ".bx-footer", ".footer"]),
            copyright: list(&[".bx-copyright", ".copyright"]),
            menu: list(&[".bx-footer-menu", ".footer-menu", "nav"]),
            contacts: list(&[".bx-contacts", ".contacts", "address"]),
            social: list(&[".bx-social", ".social", "[class*=social]"]),
            developer: list(&[".bx-developer", ".developer", "a[href*='1c-bitrix']"]),
        },
    }
}
