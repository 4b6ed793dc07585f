// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, Notify};
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// 队列已满
    #[error("Queue is full")]
    Full,
    /// 队列已关闭
    #[error("Queue is closed")]
    Closed,
}

/// 解析任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJob {
    /// 所属操作ID
    pub operation_id: Uuid,
    /// 目标URL
    pub url: String,
}

/// 任务队列特质
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 非阻塞入队，队列已满时立即返回错误
    fn try_enqueue(&self, job: ParseJob) -> Result<(), QueueError>;

    /// 出队任务，队列关闭且为空时返回 `None`
    async fn dequeue(&self) -> Option<ParseJob>;

    /// 当前排队的任务数
    fn pending(&self) -> usize;

    /// 关闭队列：拒绝新任务，已排队的任务仍可出队
    fn close(&self);
}

/// 基于有界 mpsc 通道的任务队列
///
/// 多个工作器共享同一个接收端。关闭不需要接收端的锁，
/// 因此空闲工作器正在等待时也能关闭
pub struct ChannelJobQueue {
    sender: mpsc::Sender<ParseJob>,
    receiver: Mutex<mpsc::Receiver<ParseJob>>,
    closed: AtomicBool,
    close_signal: Notify,
}

impl ChannelJobQueue {
    /// 创建新的任务队列
    ///
    /// # 参数
    ///
    /// * `capacity` - 队列容量，至少为1
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Mutex::new(receiver),
            closed: AtomicBool::new(false),
            close_signal: Notify::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    fn try_enqueue(&self, job: ParseJob) -> Result<(), QueueError> {
        if self.is_closed() {
            return Err(QueueError::Closed);
        }
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    async fn dequeue(&self) -> Option<ParseJob> {
        let mut receiver = self.receiver.lock().await;

        let closed = self.close_signal.notified();
        tokio::pin!(closed);
        // Register before checking the flag so a concurrent close is not missed
        closed.as_mut().enable();

        if self.is_closed() {
            return receiver.try_recv().ok();
        }

        tokio::select! {
            biased;
            job = receiver.recv() => job,
            _ = &mut closed => receiver.try_recv().ok(),
        }
    }

    fn pending(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.close_signal.notify_waiters();
    }
}
