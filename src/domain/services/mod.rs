// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 爬取服务（crawl_service）：域名受限、按深度去重的并发页面遍历
/// - 平台检测（platform_detector）：按签名级联识别内容管理平台
/// - 结构化提取（structural_extractor）：按平台选择器链提取页眉和页脚
/// - 模板分类（template_classifier）：用步骤模板分类通用页面中的块
///
/// 这些服务都是同步或只依赖HTTP传输的纯逻辑，不接触持久化。
pub mod crawl_service;
pub mod platform_detector;
pub mod structural_extractor;
pub mod template_classifier;
