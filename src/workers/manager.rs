// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::block_repository::BlockRepository;
use crate::domain::repositories::operation_repository::OperationRepository;
use crate::domain::repositories::template_repository::TemplateRepository;
use crate::queue::job_queue::JobQueue;
use crate::workers::parse_worker::ParseWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 工作管理器
pub struct WorkerManager<Q, O, B, T>
where
    Q: JobQueue + 'static,
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    T: TemplateRepository + 'static,
{
    queue: Arc<Q>,
    prototype: ParseWorker<O, B, T>,
    handles: Vec<JoinHandle<()>>,
}

impl<Q, O, B, T> WorkerManager<Q, O, B, T>
where
    Q: JobQueue + 'static,
    O: OperationRepository + 'static,
    B: BlockRepository + 'static,
    T: TemplateRepository + 'static,
{
    /// 创建工作管理器
    ///
    /// # 参数
    ///
    /// * `queue` - 共享任务队列
    /// * `prototype` - 每个工作器由它复制而来
    pub fn new(queue: Arc<Q>, prototype: ParseWorker<O, B, T>) -> Self {
        Self {
            queue,
            prototype,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量，至少为1
    pub fn start_workers(&mut self, count: usize) {
        for _ in 0..count.max(1) {
            let worker = self.prototype.fork();
            let queue = self.queue.clone();
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }
        info!("Started {} parse workers", self.handles.len());
    }

    /// 正在运行的工作进程数
    pub fn worker_count(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// # 参数
    ///
    /// * `grace` - 等待已排队任务处理完毕的最长时间
    pub async fn wait_for_shutdown(&mut self, grace: Duration) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
        self.shutdown(grace).await;
    }

    /// 关闭队列并在宽限期内等待工作进程处理完剩余任务
    ///
    /// 宽限期结束后中止仍在运行的工作进程，未完成的操作
    /// （正在处理或仍在队列中）标记为 `error`
    ///
    /// # 返回值
    ///
    /// 被标记为错误的操作数
    pub async fn shutdown(&mut self, grace: Duration) -> usize {
        info!("Shutting down workers...");
        self.queue.close();

        let mut handles: Vec<JoinHandle<()>> = self.handles.drain(..).collect();
        let drained = tokio::time::timeout(grace, async {
            for handle in handles.iter_mut() {
                let _ = handle.await;
            }
        })
        .await;

        if drained.is_ok() {
            info!("Workers shut down successfully");
            return 0;
        }

        warn!("Shutdown grace period elapsed, aborting workers");
        for handle in &handles {
            handle.abort();
        }
        for handle in handles {
            let _ = handle.await;
        }

        let mut abandoned = self.prototype.in_flight();
        while let Some(job) = self.queue.dequeue().await {
            abandoned.push(job.operation_id);
        }
        for operation_id in &abandoned {
            self.prototype.abandon(*operation_id).await;
        }

        warn!(count = abandoned.len(), "Unfinished operations marked as error");
        abandoned.len()
    }
}
