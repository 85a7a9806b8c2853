//! Application lifecycle events and the pool driver.
//!
//! [`LifecycleBus`] wraps a [`tokio::sync::broadcast`] channel. The
//! embedding process publishes [`LifecycleEvent`]s (suspend on shutdown or
//! host sleep, resume on wake) and [`spawn_lifecycle_driver`] translates
//! them into en-masse pool operations: suspend force-disconnects every
//! managed connection, resume restarts them. Both directions are
//! fire-and-forget; registry membership never changes across a cycle.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::pool::ConnectionPool;

/// Host-process lifecycle transition relevant to network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The process is going quiet; all sockets should close.
    Suspended,
    /// The process is active again; connections should be re-established.
    Resumed,
}

/// Broadcast bus for [`LifecycleEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct LifecycleBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleBus {
    /// Creates a new `LifecycleBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: LifecycleEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Spawns the task that applies lifecycle events to the pool.
///
/// Ends when the bus is dropped. Suspend/resume sweeps are issued
/// fire-and-forget, matching the pool's en-masse contract.
pub fn spawn_lifecycle_driver(
    pool: ConnectionPool,
    mut events: broadcast::Receiver<LifecycleEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LifecycleEvent::Suspended) => {
                    tracing::info!("suspending network activity");
                    pool.disconnect_all();
                }
                Ok(LifecycleEvent::Resumed) => {
                    tracing::info!("resuming network activity");
                    pool.connect_all();
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "lifecycle driver lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
