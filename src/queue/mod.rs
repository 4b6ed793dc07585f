// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供有界任务队列，把提交的解析操作分发给工作器
pub mod job_queue;
