// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 操作仓库（operation_repository）：管理解析操作及其状态
/// - 块仓库（block_repository）：管理提取出的结构块
/// - 模板仓库（template_repository）：管理通用分类器的块模板
pub mod block_repository;
pub mod operation_repository;
pub mod template_repository;
