// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 解析操作实体
///
/// 表示一次针对单个URL的页面结构解析请求。操作在提交时创建，
/// 之后仅由编排器推进状态，核心逻辑从不删除操作。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// 操作唯一标识符
    pub id: Uuid,
    /// 目标URL
    pub url: String,
    /// 当前状态
    pub status: OperationStatus,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 最后更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 操作状态枚举
///
/// 状态只能向前推进：
/// Pending → Processing → Completed/Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// 已创建，尚未开始处理
    #[default]
    Pending,
    /// 处理中
    Processing,
    /// 处理完成，所有块均已持久化
    Completed,
    /// 处理失败
    Error,
}

impl OperationStatus {
    /// 判断是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Error)
    }

    /// 返回允许转换到当前状态的前驱状态
    ///
    /// # 返回值
    ///
    /// 前驱状态列表，`Pending` 没有前驱
    pub fn predecessors(&self) -> &'static [OperationStatus] {
        match self {
            OperationStatus::Pending => &[],
            OperationStatus::Processing => &[OperationStatus::Pending],
            // Submission failures (queue full) go straight from pending to error
            OperationStatus::Error => &[OperationStatus::Pending, OperationStatus::Processing],
            OperationStatus::Completed => &[OperationStatus::Processing],
        }
    }

    /// 检查是否可以转换到目标状态
    pub fn can_transition_to(&self, next: OperationStatus) -> bool {
        next.predecessors().contains(self)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::Processing => write!(f, "processing"),
            OperationStatus::Completed => write!(f, "completed"),
            OperationStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for OperationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OperationStatus::Pending),
            "processing" => Ok(OperationStatus::Processing),
            "completed" => Ok(OperationStatus::Completed),
            "error" => Ok(OperationStatus::Error),
            other => Err(DomainError::ValidationError(format!(
                "unknown operation status: {}",
                other
            ))),
        }
    }
}

/// 领域错误类型
///
/// 表示在领域层可能发生的错误情况，包括状态转换错误和验证失败。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: OperationStatus,
        to: OperationStatus,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Operation {
    /// 创建一个新的待处理操作
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// 返回状态为 `Pending` 的新操作
    pub fn new(url: String) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            url,
            status: OperationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// 推进操作状态
    ///
    /// # 参数
    ///
    /// * `next` - 目标状态
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 状态已更新
    /// * `Err(DomainError)` - 不允许的状态转换
    pub fn transition_to(&mut self, next: OperationStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now().into();
        Ok(())
    }
}
