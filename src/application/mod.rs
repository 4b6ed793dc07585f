// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含用例与数据传输对象，连接表示层与领域层
pub mod dto;
pub mod use_cases;
