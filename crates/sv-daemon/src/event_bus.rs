// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded event bus (§4.A).
//!
//! A `parking_lot::Mutex`-guarded `VecDeque` plus a `tokio::sync::Notify`
//! wakes a single dispatcher task, which fans each event out to the
//! handlers registered for its `EventKind`. Overflow drops the oldest
//! entry rather than blocking the publisher or the new event.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use sv_core::{Event, EventKind};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// A handler invoked for every event of the `EventKind`(s) it was
/// registered for. Handlers report failures via `Result` rather than
/// panicking; the dispatcher logs and keeps going.
pub type Handler = Arc<dyn Fn(&Event) -> Result<(), String> + Send + Sync>;

struct Inner {
    queue: Mutex<VecDeque<Event>>,
    capacity: usize,
    dropped: AtomicU64,
    notify: Notify,
    handlers: Mutex<HashMap<EventKind, Vec<Handler>>>,
}

/// Handle to the event bus. Cheap to clone; all clones share the same
/// queue and handler registry.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::with_capacity(capacity.min(4096))),
                capacity,
                dropped: AtomicU64::new(0),
                notify: Notify::new(),
                handlers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a handler for one `EventKind`. Call once per kind of
    /// interest; a handler interested in several kinds should register
    /// itself under each.
    pub fn register(&self, kind: EventKind, handler: Handler) {
        self.inner.handlers.lock().entry(kind).or_default().push(handler);
    }

    /// Publish an event. Never blocks: on overflow, drops the oldest
    /// queued event and logs on the first drop and every 100th
    /// thereafter.
    pub fn publish(&self, event: Event) {
        let mut queue = self.inner.queue.lock();
        if queue.len() >= self.inner.capacity {
            queue.pop_front();
            let dropped = self.inner.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            if dropped == 1 || dropped % 100 == 0 {
                tracing::warn!(dropped, capacity = self.inner.capacity, "event bus overflow, dropping oldest event");
            }
        }
        queue.push_back(event);
        drop(queue);
        self.inner.notify.notify_one();
    }

    pub fn dropped_count(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    pub fn queued_count(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Spawn the dispatcher task. Runs until the returned handle is
    /// aborted; intended to live for the daemon's lifetime.
    pub fn spawn_dispatcher(&self) -> JoinHandle<()> {
        let bus = self.clone();
        tokio::spawn(async move {
            loop {
                let event = loop {
                    if let Some(event) = bus.inner.queue.lock().pop_front() {
                        break event;
                    }
                    bus.inner.notify.notified().await;
                };
                bus.dispatch(&event);
            }
        })
    }

    fn dispatch(&self, event: &Event) {
        let handlers = self.inner.handlers.lock();
        if let Some(handlers) = handlers.get(&event.kind) {
            for handler in handlers {
                if let Err(message) = handler(event) {
                    tracing::error!(
                        kind = ?event.kind,
                        instance = %event.payload.instance,
                        error = %message,
                        "event handler failed"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
