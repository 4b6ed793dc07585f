// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 解析操作（operation）：一次页面解析请求及其生命周期
/// - 结构块（block）：页面中提取出的语义区域
/// - 块模板（template）：通用分类器使用的步骤序列模板
/// - 选择器规则集（rule_set）：各平台的声明式选择器链
pub mod block;
pub mod operation;
pub mod rule_set;
pub mod template;
