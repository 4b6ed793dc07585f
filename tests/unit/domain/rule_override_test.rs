// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pageblocks::config::rules::RuleBook;
use pageblocks::domain::models::block::{BlockType, Platform};
use pageblocks::domain::services::platform_detector::PlatformDetector;
use pageblocks::domain::services::structural_extractor::StructuralExtractor;

const BITRIX_SHOP: &str = r#"<!DOCTYPE html><html><head>
<script src="/bitrix/js/main/core/core.js"></script></head><body>
<div class="shop-header">
  <span class="shop-logo">Мебель</span>
  <ul class="shop-menu"><li><a href="/catalog/">Каталог</a></li><li><a href="/delivery/">Доставка</a></li></ul>
</div>
<footer><div class="copyright">© 2015-2024 Мебель</div></footer>
</body></html>"#;

#[test]
fn test_custom_rules_drive_extraction() {
    let book = RuleBook::from_yaml_str(
        r#"
bitrix:
  header:
    container: [".shop-header"]
    logo: [".shop-logo"]
    menu: [".shop-menu"]
"#,
    )
    .unwrap();
    let extractor = StructuralExtractor::new(&book);

    let platform = PlatformDetector::new().detect(BITRIX_SHOP);
    assert_eq!(platform, Platform::Bitrix);

    let header = extractor
        .parse_header(platform, BITRIX_SHOP)
        .unwrap()
        .expect("header container");
    assert_eq!(header.block_type, BlockType::Header);
    assert_eq!(header.text("logo"), Some("Мебель"));
    assert_eq!(
        header.list("menu"),
        Some(&["Каталог".to_string(), "Доставка".to_string()][..])
    );
    assert_eq!(header.flag("cart"), Some(false));

    // Footer rules were replaced together with the header, so nothing matches
    assert!(extractor.parse_footer(platform, BITRIX_SHOP).unwrap().is_none());
}

#[test]
fn test_builtin_rules_miss_custom_markup() {
    let extractor = StructuralExtractor::new(&RuleBook::builtin());
    assert!(extractor
        .parse_header(Platform::Bitrix, BITRIX_SHOP)
        .unwrap()
        .is_none());
    assert!(extractor
        .parse_footer(Platform::Bitrix, BITRIX_SHOP)
        .unwrap()
        .is_some());
}
