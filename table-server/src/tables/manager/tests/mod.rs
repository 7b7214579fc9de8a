use super::*;
use crate::tables::clock::ManualClock;
use crate::tables::scheduler::AutoAdvanceScheduler;
use tokio_util::sync::CancellationToken;

const MINUTE: Duration = Duration::from_secs(60);

/// 2025-01-01 12:00:00 UTC
const T0: Timestamp = 1_735_732_800_000;

fn create_test_manager() -> (TableManager, Arc<ManualClock>) {
    let (manager, clock, _rx) = create_manager_with(true);
    (manager, clock)
}

fn create_manager_with(enforce_windows: bool) -> (TableManager, Arc<ManualClock>, ArmReceiver) {
    let clock = Arc::new(ManualClock::new(T0));
    let options = ManagerOptions {
        enforce_windows,
        ..Default::default()
    };
    let (manager, rx) = TableManager::new(options, clock.clone());
    (manager, clock, rx)
}

/// Manager with a running scheduler. Call from a `start_paused` runtime.
fn spawn_manager(enforce_windows: bool) -> (Arc<TableManager>, Arc<ManualClock>, CancellationToken) {
    let (manager, clock, rx) = create_manager_with(enforce_windows);
    let manager = Arc::new(manager);
    let shutdown = CancellationToken::new();
    tokio::spawn(AutoAdvanceScheduler::new(manager.clone(), rx, shutdown.clone()).run());
    (manager, clock, shutdown)
}

/// Move the stamp clock and tokio time forward together
async fn advance(clock: &ManualClock, by: Duration) {
    clock.advance(by);
    tokio::time::sleep(by).await;
}

fn status_of(manager: &TableManager, id: &str) -> TableStatus {
    manager.get_table(id).unwrap().table.status
}

/// Drive a table to `needs-cleaning`
fn seat_and_finish(manager: &TableManager, id: &str) {
    manager.reserve_table(id, Some("Alice")).unwrap();
    manager.occupy_table(id).unwrap();
    manager.finish_table(id).unwrap();
}

mod test_core;
