// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 渲染引擎模块
///
/// 提供页面渲染器特质及其实现：
/// - Chrome渲染器：执行JavaScript后返回最终DOM
/// - HTTP渲染器：直接返回页面源码
pub mod chrome_renderer;
pub mod http_renderer;
pub mod traits;
