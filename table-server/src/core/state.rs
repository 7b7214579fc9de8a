use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, ServerError};
use crate::services::HttpsService;
use crate::tables::scheduler::ArmReceiver;
use crate::tables::{AutoAdvanceScheduler, Clock, SystemClock, TableEvent, TableManager};
use crate::upstream::{HttpOrderFeed, OrderFeed, UpstreamError};

/// 占用率快照日志间隔
const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(60);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | tables | Arc<TableManager> | 桌台生命周期管理 |
/// | feed | Option<Arc<dyn OrderFeed>> | 外部订单 API (同步模式) |
/// | https | HttpsService | HTTP 服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 桌台管理器
    pub tables: Arc<TableManager>,
    /// 外部订单数据源，未配置时为 None
    pub feed: Option<Arc<dyn OrderFeed>>,
    /// HTTP 服务
    pub https: HttpsService,
    /// 调度器接收端，启动后台任务时取走
    scheduler_rx: Arc<Mutex<Option<ArmReceiver>>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("tables", &self.tables)
            .field("feed", &self.feed.as_ref().map(|_| "<OrderFeed>"))
            .finish()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 校验配置
    /// 2. 外部订单客户端 (仅当配置了 UPSTREAM_BASE_URL)
    /// 3. 桌台管理器和 HTTP 路由
    pub fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;

        let feed: Option<Arc<dyn OrderFeed>> = match &config.upstream_base_url {
            Some(url) => {
                let feed = HttpOrderFeed::new(url.clone(), config.upstream_timeout())
                    .map_err(|e| ServerError::Config(format!("upstream client: {}", e)))?;
                tracing::info!(url = %url, "Synced mode enabled");
                let feed: Arc<dyn OrderFeed> = Arc::new(feed);
                Some(feed)
            }
            None => {
                tracing::info!("UPSTREAM_BASE_URL not set, external routes disabled");
                None
            }
        };

        Ok(Self::from_parts(config.clone(), Arc::new(SystemClock), feed))
    }

    /// 用指定时钟和数据源构造 (测试用)
    pub fn from_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        feed: Option<Arc<dyn OrderFeed>>,
    ) -> Self {
        let (manager, rx) = TableManager::new(config.manager_options(), clock);
        let https = HttpsService::new(config.clone());
        let state = Self {
            config,
            tables: Arc::new(manager),
            feed,
            https: https.clone(),
            scheduler_rx: Arc::new(Mutex::new(Some(rx))),
        };

        // HttpsService 需要完整的 state
        https.initialize(state.clone());
        state
    }

    /// 外部订单数据源
    pub fn order_feed(&self) -> std::result::Result<&Arc<dyn OrderFeed>, UpstreamError> {
        self.feed.as_ref().ok_or(UpstreamError::Disabled)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用，只能调用一次。
    ///
    /// 启动的任务：
    /// - 自动推进调度器 (Worker)
    /// - 桌台事件日志 (Listener)
    /// - 占用率快照 (Periodic)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        match self.scheduler_rx.lock().take() {
            Some(rx) => {
                let scheduler =
                    AutoAdvanceScheduler::new(self.tables.clone(), rx, tasks.shutdown_token());
                tasks.spawn("auto_advance", TaskKind::Worker, scheduler.run());
            }
            None => tracing::warn!("Auto-advance scheduler already started"),
        }

        let events = self.tables.subscribe();
        tasks.spawn(
            "table_events",
            TaskKind::Listener,
            log_table_events(events, tasks.shutdown_token()),
        );

        let tables = self.tables.clone();
        tasks.spawn_periodic("occupancy_snapshot", SNAPSHOT_INTERVAL, move || {
            let stats = tables.stats();
            tracing::info!(
                total = stats.total,
                available = stats.available,
                reserved = stats.reserved,
                occupied = stats.occupied,
                needs_cleaning = stats.needs_cleaning,
                cleaning = stats.cleaning,
                "Occupancy snapshot"
            );
        });

        tasks.log_summary();
        tasks
    }
}

async fn log_table_events(
    mut events: tokio::sync::broadcast::Receiver<TableEvent>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = events.recv() => match received {
                Ok(event) => {
                    tracing::info!(
                        target: "table_events",
                        table_id = %event.table_id,
                        number = event.number,
                        event = %event.event,
                        from = %event.from,
                        to = %event.to,
                        trigger = event.trigger.as_str(),
                        at = event.at,
                        "Table transition"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "table_events", skipped, "Event listener lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}
