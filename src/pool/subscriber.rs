//! Weak observer registry for connection-state push notification.
//!
//! Subscribers are held as `Weak` trait objects so the pool never extends a
//! subscriber's lifetime. A deallocated subscriber is treated as a filter
//! predicate during fan-out; its registry entry is physically removed only
//! on the next explicit subscribe/unsubscribe call for that chain id (lazy
//! cleanup, no background sweep).

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::domain::{ChainId, ConnectionState};

/// Observer of one chain's connectivity state.
///
/// Invoked by the pool's dispatcher task, strictly after the registry lock
/// has been released. Implementations must therefore be `Send + Sync`; they
/// may freely call back into the pool.
pub trait ConnectionStateSubscriber: Send + Sync {
    /// Called with every state transition of the given chain, in the order
    /// the transport raised them.
    fn on_state_change(&self, chain_id: &ChainId, state: &ConnectionState);
}

/// Subscriber that logs every transition through `tracing`.
///
/// Registered by the daemon for each managed chain so operators see
/// connectivity changes without attaching a debugger.
#[derive(Debug, Default)]
pub struct StateLogger;

impl ConnectionStateSubscriber for StateLogger {
    fn on_state_change(&self, chain_id: &ChainId, state: &ConnectionState) {
        match state {
            ConnectionState::Connected { url } => {
                tracing::info!(chain = %chain_id, %url, "chain connected");
            }
            ConnectionState::WaitingReconnect { url } => {
                tracing::warn!(chain = %chain_id, %url, "chain dropped, awaiting reconnect");
            }
            ConnectionState::Connecting { url } => {
                tracing::debug!(chain = %chain_id, %url, "dialing chain");
            }
            ConnectionState::NotConnected { .. } => {
                tracing::info!(chain = %chain_id, "chain disconnected");
            }
        }
    }
}

/// Per-chain lists of weak subscriber references.
///
/// Lives inside the pool's single registry lock; all methods are plain
/// synchronous mutations.
#[derive(Debug, Default)]
pub(crate) struct SubscriberRegistry {
    entries: HashMap<ChainId, Vec<Weak<dyn ConnectionStateSubscriber>>>,
}

fn same_subscriber(
    existing: &Weak<dyn ConnectionStateSubscriber>,
    candidate: &Arc<dyn ConnectionStateSubscriber>,
) -> bool {
    // Compare data addresses only; vtable pointers are not stable enough
    // for identity.
    std::ptr::addr_eq(existing.as_ptr(), Arc::as_ptr(candidate))
}

impl SubscriberRegistry {
    /// Registers a subscriber for a chain. Returns `false` (and leaves the
    /// registry untouched) when the same instance is already registered.
    /// Dead entries for the chain are pruned as a side effect.
    pub(crate) fn add(
        &mut self,
        chain_id: &ChainId,
        subscriber: &Arc<dyn ConnectionStateSubscriber>,
    ) -> bool {
        let list = self.entries.entry(chain_id.clone()).or_default();
        list.retain(|entry| entry.strong_count() > 0);
        if list.iter().any(|entry| same_subscriber(entry, subscriber)) {
            return false;
        }
        list.push(Arc::downgrade(subscriber));
        true
    }

    /// Removes a subscriber from a chain by reference identity. Safe to
    /// call for a never-subscribed instance. Dead entries for the chain are
    /// pruned as a side effect.
    pub(crate) fn remove(
        &mut self,
        chain_id: &ChainId,
        subscriber: &Arc<dyn ConnectionStateSubscriber>,
    ) {
        if let Some(list) = self.entries.get_mut(chain_id) {
            list.retain(|entry| {
                entry.strong_count() > 0 && !same_subscriber(entry, subscriber)
            });
            if list.is_empty() {
                self.entries.remove(chain_id);
            }
        }
    }

    /// Snapshot of a chain's subscriber list for fan-out. Dead entries are
    /// kept (they are skipped at delivery), matching the lazy-cleanup
    /// contract.
    pub(crate) fn snapshot(&self, chain_id: &ChainId) -> Vec<Weak<dyn ConnectionStateSubscriber>> {
        self.entries.get(chain_id).cloned().unwrap_or_default()
    }

    /// Number of registered entries for a chain, dead or alive.
    #[cfg(test)]
    pub(crate) fn entry_count(&self, chain_id: &ChainId) -> usize {
        self.entries.get(chain_id).map_or(0, Vec::len)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Probe {
        seen: Mutex<Vec<ConnectionState>>,
    }

    impl ConnectionStateSubscriber for Probe {
        fn on_state_change(&self, _chain_id: &ChainId, state: &ConnectionState) {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(state.clone());
            }
        }
    }

    fn subscriber() -> Arc<dyn ConnectionStateSubscriber> {
        Arc::new(Probe::default())
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let mut registry = SubscriberRegistry::default();
        let chain = ChainId::from("polkadot");
        let sub = subscriber();

        assert!(registry.add(&chain, &sub));
        assert!(!registry.add(&chain, &sub));
        assert_eq!(registry.entry_count(&chain), 1);
    }

    #[test]
    fn distinct_instances_coexist() {
        let mut registry = SubscriberRegistry::default();
        let chain = ChainId::from("polkadot");
        let first = subscriber();
        let second = subscriber();

        assert!(registry.add(&chain, &first));
        assert!(registry.add(&chain, &second));
        assert_eq!(registry.entry_count(&chain), 2);
    }

    #[test]
    fn remove_is_identity_based() {
        let mut registry = SubscriberRegistry::default();
        let chain = ChainId::from("polkadot");
        let kept = subscriber();
        let removed = subscriber();
        registry.add(&chain, &kept);
        registry.add(&chain, &removed);

        registry.remove(&chain, &removed);

        assert_eq!(registry.entry_count(&chain), 1);
        let survivors = registry.snapshot(&chain);
        assert!(survivors
            .iter()
            .any(|entry| same_subscriber(entry, &kept)));
    }

    #[test]
    fn remove_of_unknown_subscriber_is_noop() {
        let mut registry = SubscriberRegistry::default();
        let chain = ChainId::from("polkadot");
        registry.remove(&chain, &subscriber());
        assert_eq!(registry.entry_count(&chain), 0);
    }

    #[test]
    fn snapshot_keeps_dead_entries_until_next_mutation() {
        let mut registry = SubscriberRegistry::default();
        let chain = ChainId::from("polkadot");
        let short_lived = subscriber();
        registry.add(&chain, &short_lived);
        drop(short_lived);

        // Dead entry survives snapshots...
        assert_eq!(registry.snapshot(&chain).len(), 1);
        assert!(registry
            .snapshot(&chain)
            .iter()
            .all(|entry| entry.upgrade().is_none()));

        // ...and is pruned by the next explicit mutation.
        let fresh = subscriber();
        registry.add(&chain, &fresh);
        assert_eq!(registry.entry_count(&chain), 1);
    }

    #[test]
    fn chains_are_isolated() {
        let mut registry = SubscriberRegistry::default();
        let sub = subscriber();
        registry.add(&ChainId::from("polkadot"), &sub);

        assert!(registry.snapshot(&ChainId::from("kusama")).is_empty());
    }
}
