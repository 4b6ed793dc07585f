// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::block::{Block, Platform};
use crate::domain::models::operation::OperationStatus;
use crate::domain::repositories::block_repository::BlockRepository;
use crate::domain::repositories::operation_repository::{OperationRepository, RepositoryError};
use crate::domain::repositories::template_repository::TemplateRepository;
use crate::domain::services::platform_detector::PlatformDetector;
use crate::domain::services::structural_extractor::StructuralExtractor;
use crate::domain::services::template_classifier::TemplateClassifier;
use crate::engines::traits::{RenderError, Renderer};
use crate::infrastructure::metrics::{BLOCKS_EXTRACTED, OPERATIONS_COMPLETED, OPERATIONS_FAILED};
use crate::queue::job_queue::{JobQueue, ParseJob};
use metrics::counter;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 流水线致命错误
///
/// 出现时操作进入 `error` 状态，后续阶段不再执行
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 渲染失败或超时
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    /// 持久化失败
    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

/// 解析工作器
///
/// 从任务队列取出解析任务，依次执行渲染、平台检测、块提取与持久化
pub struct ParseWorker<O, B, T>
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    T: TemplateRepository + 'static,
{
    operations: Arc<O>,
    blocks: Arc<B>,
    templates: Arc<T>,
    renderer: Arc<dyn Renderer>,
    detector: Arc<PlatformDetector>,
    extractor: Arc<StructuralExtractor>,
    classifier: TemplateClassifier,
    render_timeout: Duration,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    worker_id: Uuid,
}

impl<O, B, T> ParseWorker<O, B, T>
where
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    T: TemplateRepository + 'static,
{
    /// 创建新的解析工作器
    ///
    /// # 参数
    ///
    /// * `operations` - 操作仓库
    /// * `blocks` - 块仓库
    /// * `templates` - 模板仓库
    /// * `renderer` - 页面渲染器
    /// * `extractor` - 平台提取器
    /// * `render_timeout` - 单次渲染的超时时间
    pub fn new(
        operations: Arc<O>,
        blocks: Arc<B>,
        templates: Arc<T>,
        renderer: Arc<dyn Renderer>,
        extractor: Arc<StructuralExtractor>,
        render_timeout: Duration,
    ) -> Self {
        Self {
            operations,
            blocks,
            templates,
            renderer,
            detector: Arc::new(PlatformDetector::new()),
            extractor,
            classifier: TemplateClassifier::new(),
            render_timeout,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            worker_id: Uuid::new_v4(),
        }
    }

    /// 复制一个共享组件、拥有独立ID的工作器
    pub fn fork(&self) -> Self {
        Self {
            operations: self.operations.clone(),
            blocks: self.blocks.clone(),
            templates: self.templates.clone(),
            renderer: self.renderer.clone(),
            detector: self.detector.clone(),
            extractor: self.extractor.clone(),
            classifier: self.classifier,
            render_timeout: self.render_timeout,
            in_flight: self.in_flight.clone(),
            worker_id: Uuid::new_v4(),
        }
    }

    pub fn worker_id(&self) -> Uuid {
        self.worker_id
    }

    /// 所有复制出的工作器当前正在处理的操作
    pub fn in_flight(&self) -> Vec<Uuid> {
        self.in_flight.lock().iter().copied().collect()
    }

    /// 将因关闭而未完成的操作标记为错误
    pub async fn abandon(&self, operation_id: Uuid) {
        warn!(%operation_id, "Operation abandoned during shutdown");
        self.in_flight.lock().remove(&operation_id);
        self.fail(operation_id).await;
    }

    /// 运行工作器循环，队列关闭后退出
    pub async fn run<Q>(&self, queue: Arc<Q>)
    where
        Q: JobQueue + ?Sized,
    {
        info!("Parse worker {} started", self.worker_id);

        while let Some(job) = queue.dequeue().await {
            self.process(job).await;
        }

        info!("Parse worker {} stopped, queue closed", self.worker_id);
    }

    /// 处理单个解析任务
    ///
    /// # 返回值
    ///
    /// 操作的最终状态
    #[instrument(skip(self, job), fields(operation_id = %job.operation_id, url = %job.url, worker_id = %self.worker_id))]
    pub async fn process(&self, job: ParseJob) -> OperationStatus {
        info!("Processing parse job");
        self.in_flight.lock().insert(job.operation_id);

        let status = match self.execute(&job).await {
            Ok(count) => {
                match self
                    .operations
                    .update_status(job.operation_id, OperationStatus::Completed)
                    .await
                {
                    Ok(_) => {
                        counter!(OPERATIONS_COMPLETED).increment(1);
                        info!(blocks = count, "Operation completed");
                        OperationStatus::Completed
                    }
                    Err(e) => {
                        error!("Failed to mark operation completed: {}", e);
                        self.fail(job.operation_id).await
                    }
                }
            }
            Err(e) => {
                error!("Operation failed: {}", e);
                self.fail(job.operation_id).await
            }
        };

        self.in_flight.lock().remove(&job.operation_id);
        status
    }

    async fn execute(&self, job: &ParseJob) -> Result<usize, PipelineError> {
        let markup = self.render(&job.url).await?;

        let platform = self.detector.detect(&markup);
        info!(%platform, "Platform detected");

        let blocks = self.extract(platform, &markup).await;
        let count = blocks.len();

        for (position, block) in blocks.into_iter().enumerate() {
            let block = block.attach(job.operation_id, position as i32);
            self.blocks.save(&block).await?;
            counter!(BLOCKS_EXTRACTED).increment(1);
            debug!(block_type = %block.block_type, position, "Block saved");
        }

        Ok(count)
    }

    async fn render(&self, url: &str) -> Result<String, RenderError> {
        match tokio::time::timeout(self.render_timeout, self.renderer.render(url)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(self.render_timeout)),
        }
    }

    async fn extract(&self, platform: Platform, markup: &str) -> Vec<Block> {
        if self.extractor.supports(platform) {
            let header = self
                .extractor
                .parse_header(platform, markup)
                .unwrap_or_else(|e| {
                    warn!("Header extraction failed: {}", e);
                    None
                });
            let footer = self
                .extractor
                .parse_footer(platform, markup)
                .unwrap_or_else(|e| {
                    warn!("Footer extraction failed: {}", e);
                    None
                });
            return header.into_iter().chain(footer).collect();
        }

        let templates = match self.templates.find_by_platform(Platform::Html5).await {
            Ok(templates) => templates,
            Err(e) => {
                warn!("Template lookup failed, classifying without templates: {}", e);
                Vec::new()
            }
        };

        self.classifier.classify(markup, &templates, platform)
    }

    async fn fail(&self, operation_id: Uuid) -> OperationStatus {
        counter!(OPERATIONS_FAILED).increment(1);
        if let Err(e) = self
            .operations
            .update_status(operation_id, OperationStatus::Error)
            .await
        {
            error!("Failed to mark operation as error: {}", e);
        }
        OperationStatus::Error
    }
}

#[cfg(test)]
#[path = "parse_worker_test.rs"]
mod tests;
