// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pageblocks::config::rules::{load_template_seeds, RuleBook, RulesError};
use pageblocks::domain::models::block::Platform;
use std::path::PathBuf;
use uuid::Uuid;

fn write_temp(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pageblocks-{}.yaml", Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_without_path_uses_builtin_rules() {
    let book = RuleBook::load(None).unwrap();
    for platform in Platform::EXTRACTABLE {
        assert!(book.get(platform).is_some());
    }
}

#[test]
fn test_load_selector_file() {
    let path = write_temp(
        r#"
bitrix:
  header:
    container: [".shop-header"]
    logo: [".shop-logo"]
"#,
    );

    let book = RuleBook::load(path.to_str()).unwrap();
    let bitrix = book.get(Platform::Bitrix).unwrap();
    assert_eq!(bitrix.header.container, vec![".shop-header".to_string()]);
    assert!(bitrix.footer.container.is_empty());
    assert!(!book.get(Platform::WordPress).unwrap().header.container.is_empty());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_reports_path() {
    let err = RuleBook::load(Some("/nonexistent/pageblocks/rules.yaml")).unwrap_err();
    match err {
        RulesError::Io { path, .. } => assert_eq!(path, "/nonexistent/pageblocks/rules.yaml"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_template_seed_file() {
    let path = write_temp(
        r#"
- name: Hero
  platform: html5
  priority: 1
  steps:
    step1: "<h1|<h2"
    step2: ["button", "cta"]
- name: Gallery
  platform: html5
  steps:
    step1: "<img"
"#,
    );

    let seeds = load_template_seeds(path.to_str().unwrap()).unwrap();
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[1].priority, 0);

    let hero = seeds[0].clone().into_template().unwrap();
    assert!(hero.matches("<h2>Hi</h2><a class=\"cta\">Go</a>"));
    assert!(!hero.matches("<h2>Hi</h2>"));

    std::fs::remove_file(path).ok();
}
