use super::*;

#[test]
fn test_initial_tables() {
    let (manager, _) = create_test_manager();
    let tables = manager.list_tables();

    assert_eq!(tables.len(), 12);
    for view in &tables {
        assert_eq!(view.table.status, TableStatus::Available);
        assert_eq!(view.table.customer_name, None);
        assert_eq!(view.time_remaining, None);
        assert_eq!(view.elapsed, None);
    }
    assert_eq!(manager.stats().available, 12);
    assert!(!manager.epoch().is_empty());
}

#[test]
fn test_get_table_by_id_and_number() {
    let (manager, _) = create_test_manager();

    let view = manager.get_table("table-5").unwrap();
    assert_eq!(view.table.number, 5);
    assert_eq!(view.table.capacity, 4);

    let view = manager.get_table_by_number(9).unwrap();
    assert_eq!(view.table.id, "table-9");

    assert_eq!(
        manager.get_table("table-13").unwrap_err(),
        TableError::NotFound("table-13".into())
    );
    assert!(manager.get_table_by_number(13).is_err());
}

#[test]
fn test_reserve_sets_customer_and_stamp() {
    let (manager, _) = create_test_manager();
    let table = manager.reserve_table("table-3", Some("Alice")).unwrap();

    assert_eq!(table.status, TableStatus::Reserved);
    assert_eq!(table.customer_name.as_deref(), Some("Alice"));
    assert_eq!(table.reserved_at, Some(T0));
    assert_eq!(manager.get_table("table-3").unwrap().table, table);
}

#[test]
fn test_reserve_requires_customer_name() {
    let (manager, _) = create_test_manager();

    for name in [None, Some(""), Some("   ")] {
        let err = manager.reserve_table("table-1", name).unwrap_err();
        assert_eq!(err, TableError::MissingInput("customerName"));
    }
    assert_eq!(status_of(&manager, "table-1"), TableStatus::Available);
}

#[test]
fn test_not_found_checked_before_input() {
    let (manager, _) = create_test_manager();
    let err = manager.reserve_table("nope", None).unwrap_err();
    assert_eq!(err, TableError::NotFound("nope".into()));
}

#[test]
fn test_missing_input_checked_before_guard() {
    let (manager, _) = create_test_manager();
    manager.reserve_table("table-1", Some("Alice")).unwrap();

    let err = manager.reserve_table("table-1", None).unwrap_err();
    assert_eq!(err, TableError::MissingInput("customerName"));
}

#[test]
fn test_occupy_available_table_rejected() {
    let (manager, _) = create_test_manager();
    let before = manager.get_table("table-5").unwrap();

    let err = manager.occupy_table("table-5").unwrap_err();
    assert_eq!(
        err,
        TableError::InvalidTransition {
            status: TableStatus::Available,
            event: LifecycleEvent::Occupy,
        }
    );
    assert_eq!(manager.get_table("table-5").unwrap(), before);
}

#[test]
fn test_only_reserve_succeeds_from_available() {
    let (manager, _) = create_test_manager();

    assert!(manager.occupy_table("table-2").is_err());
    assert!(manager.finish_table("table-2").is_err());
    assert!(manager.start_cleaning("table-2").is_err());
    assert_eq!(status_of(&manager, "table-2"), TableStatus::Available);

    assert!(manager.reserve_table("table-2", Some("Bob")).is_ok());
}

#[test]
fn test_double_reserve_rejected() {
    let (manager, _) = create_test_manager();
    manager.reserve_table("table-1", Some("Alice")).unwrap();

    let err = manager.reserve_table("table-1", Some("Bob")).unwrap_err();
    assert_eq!(
        err,
        TableError::InvalidTransition {
            status: TableStatus::Reserved,
            event: LifecycleEvent::Reserve,
        }
    );
    let table = manager.get_table("table-1").unwrap().table;
    assert_eq!(table.customer_name.as_deref(), Some("Alice"));
}

#[test]
fn test_complete_cleaning_is_idempotent() {
    let (manager, _) = create_test_manager();
    let before = manager.get_table("table-4").unwrap().table;

    let first = manager.complete_cleaning("table-4").unwrap();
    let second = manager.complete_cleaning("table-4").unwrap();
    assert_eq!(first, before);
    assert_eq!(second, before);

    assert!(manager.complete_cleaning("table-40").is_err());
}

#[test]
fn test_complete_cleaning_does_not_skip_states() {
    let (manager, _) = create_test_manager();
    manager.reserve_table("table-4", Some("Alice")).unwrap();

    let table = manager.complete_cleaning("table-4").unwrap();
    assert_eq!(table.status, TableStatus::Reserved);
}

#[test]
fn test_time_remaining_floors_at_zero() {
    let (manager, clock) = create_test_manager();
    manager.reserve_table("table-1", Some("Alice")).unwrap();

    clock.advance(11 * MINUTE);
    let view = manager.get_table("table-1").unwrap();
    assert_eq!(view.time_remaining, Some(0));
    assert_eq!(view.elapsed, Some((11 * MINUTE).as_millis() as i64));
}

#[test]
fn test_stats_and_status_filter() {
    let (manager, _) = create_test_manager();
    manager.reserve_table("table-1", Some("A")).unwrap();
    manager.reserve_table("table-2", Some("B")).unwrap();
    seat_and_finish(&manager, "table-3");

    let stats = manager.stats();
    assert_eq!(stats.total, 12);
    assert_eq!(stats.available, 9);
    assert_eq!(stats.reserved, 2);
    assert_eq!(stats.needs_cleaning, 1);

    let reserved = manager.tables_by_status(TableStatus::Reserved);
    let ids: Vec<_> = reserved.iter().map(|v| v.table.id.as_str()).collect();
    assert_eq!(ids, vec!["table-1", "table-2"]);
}

#[test]
fn test_events_broadcast() {
    let (manager, _) = create_test_manager();
    let mut rx = manager.subscribe();

    manager.reserve_table("table-6", Some("Alice")).unwrap();
    assert!(manager.occupy_table("table-1").is_err());

    let event = rx.try_recv().unwrap();
    assert_eq!(event.table_id, "table-6");
    assert_eq!(event.number, 6);
    assert_eq!(event.event, LifecycleEvent::Reserve);
    assert_eq!(event.from, TableStatus::Available);
    assert_eq!(event.to, TableStatus::Reserved);
    assert_eq!(event.at, T0);
    assert_eq!(event.trigger, Trigger::Manual);

    // Rejected commands publish nothing
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_timers_armed_per_timed_status() {
    let (manager, _, mut rx) = create_manager_with(true);

    manager.reserve_table("table-1", Some("Alice")).unwrap();
    let armed = rx.try_recv().unwrap();
    assert_eq!(armed.table_id, "table-1");
    assert_eq!(armed.status, TableStatus::Reserved);
    assert_eq!(armed.entered_at, T0);

    manager.occupy_table("table-1").unwrap();
    assert_eq!(rx.try_recv().unwrap().status, TableStatus::Occupied);

    manager.finish_table("table-1").unwrap();
    assert!(rx.try_recv().is_err());

    manager.start_cleaning("table-1").unwrap();
    assert_eq!(rx.try_recv().unwrap().status, TableStatus::Cleaning);
}

#[test]
fn test_advisory_windows_only_arm_cleaning() {
    let (manager, _, mut rx) = create_manager_with(false);

    seat_and_finish(&manager, "table-1");
    assert!(rx.try_recv().is_err());

    manager.start_cleaning("table-1").unwrap();
    assert_eq!(rx.try_recv().unwrap().status, TableStatus::Cleaning);
}

#[test]
fn test_out_of_range_window_skips_timer() {
    let clock = Arc::new(ManualClock::new(T0));
    let options = ManagerOptions {
        timings: LifecycleTimings {
            reservation_window: Duration::from_secs(u64::MAX),
            ..Default::default()
        },
        ..Default::default()
    };
    let (manager, mut timers) = TableManager::new(options, clock);
    let mut events = manager.subscribe();

    let table = manager.reserve_table("table-1", Some("Alice")).unwrap();
    assert_eq!(table.status, TableStatus::Reserved);
    assert!(timers.try_recv().is_err());
    assert_eq!(events.try_recv().unwrap().to, TableStatus::Reserved);

    let view = manager.get_table("table-1").unwrap();
    assert_eq!(view.time_remaining, Some(i64::MAX));

    // Later windows still arm
    manager.occupy_table("table-1").unwrap();
    assert_eq!(timers.try_recv().unwrap().status, TableStatus::Occupied);
}
