// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::Block;
use crate::domain::models::operation::{Operation, OperationStatus};
use crate::domain::repositories::block_repository::BlockRepository;
use crate::domain::repositories::operation_repository::{OperationRepository, RepositoryError};
use crate::infrastructure::metrics::{OPERATIONS_FAILED, OPERATIONS_SUBMITTED};
use crate::queue::job_queue::{JobQueue, ParseJob, QueueError};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Job queue is full, operation {operation_id} marked as error")]
    QueueFull { operation_id: Uuid },
    #[error("Job queue is closed, operation {operation_id} marked as error")]
    QueueClosed { operation_id: Uuid },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 解析用例
///
/// 负责提交解析操作与查询操作结果，提交后立即返回，不等待流水线完成
pub struct ParseUseCase<O, B, Q>
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    Q: JobQueue + ?Sized + 'static,
{
    operations: Arc<O>,
    blocks: Arc<B>,
    queue: Arc<Q>,
}

impl<O, B, Q> ParseUseCase<O, B, Q>
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    Q: JobQueue + ?Sized + 'static,
{
    pub fn new(operations: Arc<O>, blocks: Arc<B>, queue: Arc<Q>) -> Self {
        Self {
            operations,
            blocks,
            queue,
        }
    }

    /// 提交解析操作
    ///
    /// # 参数
    ///
    /// * `url` - 要解析的页面URL，须为 http/https
    ///
    /// # 返回值
    ///
    /// * `Ok(Operation)` - 处于 `processing` 状态的操作
    /// * `Err(SubmitError)` - URL无效、队列不可用或存储失败
    pub async fn submit(&self, url: &str) -> Result<Operation, SubmitError> {
        validate_url(url)?;

        let operation = self.operations.create(url).await?;
        let operation = self
            .operations
            .update_status(operation.id, OperationStatus::Processing)
            .await?;

        let job = ParseJob {
            operation_id: operation.id,
            url: operation.url.clone(),
        };

        if let Err(e) = self.queue.try_enqueue(job) {
            warn!(operation_id = %operation.id, "Failed to enqueue parse job: {}", e);
            if let Err(err) = self
                .operations
                .update_status(operation.id, OperationStatus::Error)
                .await
            {
                error!(operation_id = %operation.id, "Failed to mark operation as error: {}", err);
            }
            counter!(OPERATIONS_FAILED).increment(1);

            return Err(match e {
                QueueError::Full => SubmitError::QueueFull {
                    operation_id: operation.id,
                },
                QueueError::Closed => SubmitError::QueueClosed {
                    operation_id: operation.id,
                },
            });
        }

        counter!(OPERATIONS_SUBMITTED).increment(1);
        info!(operation_id = %operation.id, url = %operation.url, "Parse operation submitted");
        Ok(operation)
    }

    /// 查询操作及其按顺序排列的块
    ///
    /// # 返回值
    ///
    /// * `Ok((Operation, Vec<Block>))` - 操作与块
    /// * `Err(RepositoryError::NotFound)` - 操作不存在
    pub async fn get_operation_result(
        &self,
        id: Uuid,
    ) -> Result<(Operation, Vec<Block>), RepositoryError> {
        let operation = self
            .operations
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let blocks = self.blocks.list_by_operation(id).await?;
        Ok((operation, blocks))
    }
}

fn validate_url(url: &str) -> Result<(), SubmitError> {
    let invalid = |reason: String| SubmitError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(invalid("missing host".to_string())),
        scheme => Err(invalid(format!("unsupported scheme {}", scheme))),
    }
}

#[cfg(test)]
#[path = "parse_use_case_test.rs"]
mod tests;
