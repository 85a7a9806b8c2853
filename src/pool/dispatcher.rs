//! FIFO delivery queue for state notifications.
//!
//! The pool snapshots a chain's subscriber list under its registry lock,
//! releases the lock, then enqueues the notification here. A single spawned
//! task drains the queue, so deliveries preserve per-chain ordering and a
//! subscriber callback can never deadlock against the registry lock.

use std::sync::Weak;

use tokio::sync::mpsc;

use super::subscriber::ConnectionStateSubscriber;
use crate::domain::{ChainId, ConnectionState};

/// One queued fan-out: a state for a chain, addressed to a snapshot of its
/// subscribers. Dead weak targets are skipped at delivery time.
#[derive(Debug)]
pub(crate) struct StateNotification {
    pub(crate) chain_id: ChainId,
    pub(crate) state: ConnectionState,
    pub(crate) targets: Vec<Weak<dyn ConnectionStateSubscriber>>,
}

/// Handle to the dispatcher task.
///
/// Dropping the last handle closes the queue and ends the task.
#[derive(Debug)]
pub(crate) struct StateDispatcher {
    queue: mpsc::UnboundedSender<StateNotification>,
}

impl StateDispatcher {
    /// Spawns the drain task on the current runtime.
    pub(crate) fn spawn() -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(rx));
        Self { queue }
    }

    /// Enqueues a notification. Delivery is asynchronous and in FIFO order.
    pub(crate) fn enqueue(&self, notification: StateNotification) {
        // Send only fails once the drain task is gone, i.e. at shutdown.
        let _ = self.queue.send(notification);
    }
}

async fn drain(mut rx: mpsc::UnboundedReceiver<StateNotification>) {
    while let Some(notification) = rx.recv().await {
        for target in &notification.targets {
            if let Some(subscriber) = target.upgrade() {
                subscriber.on_state_change(&notification.chain_id, &notification.state);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    #[derive(Default)]
    struct Probe {
        seen: Mutex<Vec<(ChainId, ConnectionState)>>,
    }

    impl Probe {
        fn seen(&self) -> Vec<(ChainId, ConnectionState)> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl ConnectionStateSubscriber for Probe {
        fn on_state_change(&self, chain_id: &ChainId, state: &ConnectionState) {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((chain_id.clone(), state.clone()));
        }
    }

    async fn settle<F: Fn() -> bool>(condition: F) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not met within deadline");
    }

    fn notification(
        chain: &str,
        state: ConnectionState,
        probe: &Arc<Probe>,
    ) -> StateNotification {
        let shared = Arc::clone(probe);
        let target: Arc<dyn ConnectionStateSubscriber> = shared;
        StateNotification {
            chain_id: ChainId::from(chain),
            state,
            targets: vec![Arc::downgrade(&target)],
        }
    }

    #[tokio::test]
    async fn delivers_in_enqueue_order() {
        let dispatcher = StateDispatcher::spawn();
        let probe = Arc::new(Probe::default());

        let url = url::Url::parse("ws://127.0.0.1:9944/").ok().unwrap_or_else(|| {
            panic!("valid url");
        });
        dispatcher.enqueue(notification(
            "polkadot",
            ConnectionState::Connecting { url: url.clone() },
            &probe,
        ));
        dispatcher.enqueue(notification(
            "polkadot",
            ConnectionState::Connected { url },
            &probe,
        ));

        settle(|| probe.seen().len() == 2).await;
        let seen = probe.seen();
        assert_eq!(
            seen.first().map(|(_, state)| state.status_str()),
            Some("connecting")
        );
        assert_eq!(
            seen.get(1).map(|(_, state)| state.status_str()),
            Some("connected")
        );
    }

    #[tokio::test]
    async fn dead_targets_are_skipped() {
        let dispatcher = StateDispatcher::spawn();
        let live = Arc::new(Probe::default());

        let dead: Arc<dyn ConnectionStateSubscriber> = Arc::new(Probe::default());
        let dead_ref = Arc::downgrade(&dead);
        drop(dead);

        let shared = Arc::clone(&live);
        let live_target: Arc<dyn ConnectionStateSubscriber> = shared;
        dispatcher.enqueue(StateNotification {
            chain_id: ChainId::from("polkadot"),
            state: ConnectionState::idle(),
            targets: vec![dead_ref, Arc::downgrade(&live_target)],
        });

        settle(|| live.seen().len() == 1).await;
    }
}
