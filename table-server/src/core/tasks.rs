//! 后台任务管理
//!
//! 所有后台任务共享一个 [`CancellationToken`]，关闭时统一取消并限时等待。
//!
//! | 类型 | 任务 |
//! |------|------|
//! | [`TaskKind::Worker`] | 自动推进调度器 |
//! | [`TaskKind::Listener`] | 桌台事件日志 |
//! | [`TaskKind::Periodic`] | 占用率快照 |

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Worker,
    Listener,
    Periodic,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Worker => "worker",
            TaskKind::Listener => "listener",
            TaskKind::Periodic => "periodic",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 每种类型的任务数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub worker: usize,
    pub listener: usize,
    pub periodic: usize,
}

struct TaskEntry {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// 后台任务管理器
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// tasks.spawn("auto_advance", TaskKind::Worker, scheduler.run());
/// tasks.spawn_periodic("snapshot", Duration::from_secs(60), || log_stats());
///
/// tasks.shutdown(Duration::from_secs(10)).await;
/// ```
pub struct BackgroundTasks {
    entries: Vec<TaskEntry>,
    shutdown: CancellationToken,
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 任务内部监听关闭信号用
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 启动任务，panic 会被捕获并记录，不会影响其他任务
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(supervise(name, kind, self.shutdown.clone(), future));
        tracing::debug!(task = name, kind = %kind, "Background task spawned");
        self.entries.push(TaskEntry { name, kind, handle });
    }

    /// 每隔 `period` 调用一次 `tick` (启动时不立即执行)
    pub fn spawn_periodic<F>(&mut self, name: &'static str, period: Duration, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        let token = self.shutdown.clone();
        self.spawn(name, TaskKind::Periodic, async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => tick(),
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> TaskSummary {
        self.entries
            .iter()
            .fold(TaskSummary::default(), |mut summary, entry| {
                match entry.kind {
                    TaskKind::Worker => summary.worker += 1,
                    TaskKind::Listener => summary.listener += 1,
                    TaskKind::Periodic => summary.periodic += 1,
                }
                summary
            })
    }

    pub fn log_summary(&self) {
        let summary = self.summary();
        tracing::info!(
            total = self.entries.len(),
            worker = summary.worker,
            listener = summary.listener,
            periodic = summary.periodic,
            "Background tasks running"
        );
    }

    /// 取消所有任务并等待，超时的任务被强制中止
    pub async fn shutdown(self, timeout: Duration) {
        tracing::info!(tasks = self.entries.len(), "Stopping background tasks");
        self.shutdown.cancel();

        let deadline = tokio::time::Instant::now() + timeout;
        for TaskEntry { name, handle, .. } in self.entries {
            let abort = handle.abort_handle();
            if tokio::time::timeout_at(deadline, handle).await.is_err() {
                tracing::warn!(task = name, "Background task ignored shutdown, aborting");
                abort.abort();
            }
        }

        tracing::info!("Background tasks stopped");
    }
}

async fn supervise<F>(name: &'static str, kind: TaskKind, token: CancellationToken, future: F)
where
    F: Future<Output = ()>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(()) if token.is_cancelled() => {
            tracing::debug!(task = name, kind = %kind, "Background task stopped");
        }
        Ok(()) => {
            tracing::warn!(task = name, kind = %kind, "Background task exited before shutdown");
        }
        Err(payload) => {
            tracing::error!(
                task = name,
                kind = %kind,
                panic = %panic_message(payload.as_ref()),
                "Background task panicked"
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
