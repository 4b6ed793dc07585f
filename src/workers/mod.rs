// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 从任务队列消费解析任务并管理工作器生命周期
pub mod manager;
pub mod parse_worker;
