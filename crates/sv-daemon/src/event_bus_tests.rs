// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use sv_core::Event;

#[tokio::test]
async fn dispatches_to_registered_handler() {
    let bus = EventBus::new(10);
    let seen = Arc::new(AtomicUsize::new(0));
    let seen2 = seen.clone();
    bus.register(
        EventKind::Running,
        Arc::new(move |_event| {
            seen2.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }),
    );
    let _dispatcher = bus.spawn_dispatcher();

    bus.publish(Event::new(EventKind::Running, "web", "pid 1"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(seen.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn ignores_kinds_with_no_handler() {
    let bus = EventBus::new(10);
    let _dispatcher = bus.spawn_dispatcher();
    bus.publish(Event::new(EventKind::Fatal, "web", "no handler here"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(bus.queued_count(), 0);
}

#[test]
fn overflow_drops_oldest_and_counts() {
    let bus = EventBus::new(2);
    bus.publish(Event::new(EventKind::Starting, "a", "1"));
    bus.publish(Event::new(EventKind::Starting, "b", "2"));
    bus.publish(Event::new(EventKind::Starting, "c", "3"));

    assert_eq!(bus.dropped_count(), 1);
    assert_eq!(bus.queued_count(), 2);
}

#[test]
fn failing_handler_does_not_panic_dispatch() {
    let bus = EventBus::new(10);
    bus.register(EventKind::Fatal, Arc::new(|_event| Err("boom".to_string())));
    bus.publish(Event::new(EventKind::Fatal, "web", "oops"));
    // dispatch() is exercised indirectly by the dispatcher task in the
    // async tests above; here we only confirm publish() itself never
    // panics even with a registered handler that will fail.
    assert_eq!(bus.queued_count(), 1);
}
